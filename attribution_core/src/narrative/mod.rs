//! Narrative & History Assembler - death typing, message rendering,
//! statistics.
//!
//! Death typing works as follows:
//! 1. Killer and victim are the same name: **Suicide**
//! 2. This killer has never killed this victim this session: **FirstKill**
//! 3. The most recent such kill was inside the retaliation window:
//!    **Retaliation**
//! 4. Inside the old-retaliation window: **RetaliationOld**
//! 5. Anything else, including an unknown cause: **Accident**

mod history;
mod templates;

pub use history::*;
pub use templates::*;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use engine_surface::Timestamp;

use crate::location::{LocationZone, LocationZoneResult};
use crate::resolver::{DeathCause, KillerInfo};

/// How a death reads against the victim's session history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathType {
    Suicide,
    FirstKill,
    Retaliation,
    RetaliationOld,
    Accident,
}

/// Classifies death types and renders the final message.
pub struct NarrativeAssembler {
    retaliation_window: Duration,
    old_retaliation_window: Duration,
    templates: HashMap<DeathType, Vec<String>>,
    phrases: HashMap<LocationZone, Vec<String>>,
    marker: String,
}

impl NarrativeAssembler {
    /// Create an assembler with the given windows, template sets, and
    /// narration marker.
    pub fn new(
        retaliation_window: Duration,
        old_retaliation_window: Duration,
        templates: HashMap<DeathType, Vec<String>>,
        phrases: HashMap<LocationZone, Vec<String>>,
        marker: impl Into<String>,
    ) -> Self {
        Self {
            retaliation_window,
            old_retaliation_window,
            templates,
            phrases,
            marker: marker.into(),
        }
    }

    /// Classify the death type from the victim's session history.
    pub fn classify(
        &self,
        victim: &str,
        killer: &KillerInfo,
        history: &DeathHistory,
        now: Timestamp,
    ) -> DeathType {
        if killer.cause == DeathCause::Suicide || killer.killer_name == victim {
            return DeathType::Suicide;
        }
        if killer.cause == DeathCause::Unknown {
            return DeathType::Accident;
        }

        match history.last_kill_by(victim, &killer.killer_name) {
            None => DeathType::FirstKill,
            Some(at) if now.since(at) <= self.retaliation_window => DeathType::Retaliation,
            Some(at) if now.since(at) <= self.old_retaliation_window => DeathType::RetaliationOld,
            Some(_) => DeathType::Accident,
        }
    }

    /// Render the final message: a random template for the death type, the
    /// fixed substitution order, the classified location phrase, and the
    /// narration marker prefix.
    ///
    /// The phrase substitutes into the location placeholder when the chosen
    /// template has one, otherwise it is appended.
    pub fn render<R: Rng>(
        &self,
        rng: &mut R,
        victim: &str,
        killer: &KillerInfo,
        death_type: DeathType,
        location: &LocationZoneResult,
    ) -> String {
        let phrase = location_phrase(rng, location, &self.phrases);
        let set = self
            .templates
            .get(&death_type)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let template = pick_template(rng, set);

        let vars = MessageVars {
            victim,
            killer: &killer.killer_name,
            weapon: &killer.weapon,
            location: &phrase,
        };
        let mut message = render_template(template, &vars);

        if !mentions_location(template) {
            message.push(' ');
            message.push_str(&phrase);
        }

        if self.marker.is_empty() {
            message
        } else {
            format!("{} {}", self.marker, message)
        }
    }
}
