//! Pipeline configuration - safe defaults with a TOML overlay.
//!
//! The external configuration provider hands the pipeline a TOML document;
//! every field has a safe default, so a partial document overlays only what
//! it names and a missing document means [`PipelineConfig::default`]. A
//! document that fails to parse at all is a [`crate::PipelineError`] and the
//! caller is expected to fall back to the defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::location::{LocationZone, ZoneThresholds};
use crate::narrative::DeathType;
use crate::PipelineError;

/// Everything the pipeline reads from the configuration provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Ring-buffer slots per victim.
    pub buffer_capacity: usize,

    /// Seconds a ring-buffer record stays queryable.
    pub retention_secs: u64,

    /// Seconds between opportunistic buffer sweeps.
    pub cleanup_interval_secs: u64,

    /// Validity window of the damage-type cache, seconds.
    pub type_cache_secs: u64,

    /// Ring-buffer lookback used by killer resolution, seconds.
    pub ring_window_secs: u64,

    /// Oxygen level at or below which a death reads as asphyxiation.
    pub oxygen_threshold: f32,

    pub zones: ZoneThresholds,

    /// Seconds within which a repeat kill reads as retaliation.
    pub retaliation_secs: u64,

    /// Seconds within which a repeat kill still reads as an old grudge.
    pub old_retaliation_secs: u64,

    /// Message templates per death type.
    pub templates: HashMap<DeathType, Vec<String>>,

    /// Location phrasings per zone; `{body}` resolves to the nearest body.
    pub phrases: HashMap<LocationZone, Vec<String>>,

    /// Glyph prefixed to rendered messages so the external chat filter can
    /// recognize already-narrated death lines and skip re-relaying them.
    pub marker: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 20,
            retention_secs: 15,
            cleanup_interval_secs: 30,
            type_cache_secs: 2,
            ring_window_secs: 5,
            oxygen_threshold: 0.05,
            zones: ZoneThresholds::default(),
            retaliation_secs: 3_600,
            old_retaliation_secs: 86_400,
            templates: default_templates(),
            phrases: default_phrases(),
            marker: "\u{2620}".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document over the defaults.
    pub fn from_toml_str(doc: &str) -> Result<Self, PipelineError> {
        Ok(toml::from_str(doc)?)
    }

    /// Ring-buffer retention window.
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    /// Opportunistic sweep interval.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    /// Type-cache validity window.
    pub fn type_cache_window(&self) -> Duration {
        Duration::from_secs(self.type_cache_secs)
    }

    /// Ring-buffer lookback for killer resolution.
    pub fn ring_window(&self) -> Duration {
        Duration::from_secs(self.ring_window_secs)
    }

    /// Retaliation window.
    pub fn retaliation_window(&self) -> Duration {
        Duration::from_secs(self.retaliation_secs)
    }

    /// Old-retaliation window.
    pub fn old_retaliation_window(&self) -> Duration {
        Duration::from_secs(self.old_retaliation_secs)
    }
}

fn default_templates() -> HashMap<DeathType, Vec<String>> {
    let mut templates = HashMap::new();
    templates.insert(
        DeathType::Suicide,
        vec![
            "{victim} took their own life".to_string(),
            "{victim} pressed the wrong button".to_string(),
        ],
    );
    templates.insert(
        DeathType::FirstKill,
        vec![
            "{victim} was slain by {killer}".to_string(),
            "{killer} claimed first blood on {victim}".to_string(),
        ],
    );
    templates.insert(
        DeathType::Retaliation,
        vec![
            "{killer} got their revenge on {victim}".to_string(),
            "{killer} repaid {victim} in kind".to_string(),
        ],
    );
    templates.insert(
        DeathType::RetaliationOld,
        vec!["{killer} finally settled an old score with {victim}".to_string()],
    );
    templates.insert(
        DeathType::Accident,
        vec![
            "{victim} died".to_string(),
            "{victim} met an unfortunate end".to_string(),
        ],
    );
    templates
}

fn default_phrases() -> HashMap<LocationZone, Vec<String>> {
    let mut phrases = HashMap::new();
    phrases.insert(
        LocationZone::OnSurface,
        vec![
            "on the surface of {body}".to_string(),
            "planetside on {body}".to_string(),
        ],
    );
    phrases.insert(
        LocationZone::LowOrbit,
        vec![
            "in low orbit above {body}".to_string(),
            "skimming the skies of {body}".to_string(),
        ],
    );
    phrases.insert(
        LocationZone::HighOrbit,
        vec![
            "in high orbit above {body}".to_string(),
            "far above {body}".to_string(),
        ],
    );
    phrases.insert(
        LocationZone::InnerSystem,
        vec!["in the inner system".to_string()],
    );
    phrases.insert(
        LocationZone::OuterSpace,
        vec!["in open space beyond the planets".to_string()],
    );
    phrases.insert(
        LocationZone::DeepSpace,
        vec![
            "in deep space".to_string(),
            "in the deep black".to_string(),
        ],
    );
    phrases.insert(
        LocationZone::Unknown,
        vec!["somewhere unknown".to_string()],
    );
    phrases
}
