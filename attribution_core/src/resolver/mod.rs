//! Attribution Resolver - the killer-resolution cascade.
//!
//! Five stages run in order and the first to produce a [`KillerInfo`] wins:
//!
//! 1. **Type cache** (window ≤2 s): the cached damage-type tag through a
//!    fixed lookup table
//! 2. **Ring buffer** (window ≤5 s): the newest damage record, dispatched on
//!    the attacker's resolved capability
//! 3. **Introspection**: the host's last-attacker probe, same dispatch
//! 4. **Vital stats**: near-zero oxygen reads as asphyxiation
//! 5. **Terminal**: "Environment" - the cascade always yields a result
//!
//! Attacker entities can be destroyed moments after the death notification
//! fires, so every stage resolves immediately within the callback; nothing
//! is deferred to a later tick. A stage that cannot read its signal logs the
//! miss and falls through - no fault propagates to the host.

mod tags;

pub use tags::*;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use engine_surface::{
    AttackerProbe, CharacterSnapshot, EntityCapability, EntityId, EntityResolver, Owner, Timestamp,
    VitalMonitor,
};

use crate::capture::{DamageLog, DamageRecord, TypeCache};

/// Resolved cause buckets for a death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    Player,
    Turret,
    Collision,
    Oxygen,
    Fall,
    Pressure,
    Suicide,
    Grinding,
    Environment,
    Unknown,
}

/// Terminal result of the cascade.
///
/// Always produced; "Environment" and "Unknown" are valid answers, not
/// errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KillerInfo {
    pub cause: DeathCause,
    pub killer_name: String,

    /// Weapon or source label for message composition.
    pub weapon: String,

    /// Player or faction that owned the attacking turret, when attributable.
    pub turret_owner: Option<String>,

    /// Whether the killing structure belonged to an AI-run faction.
    pub is_npc_faction: bool,
    pub npc_faction_tag: Option<String>,
}

impl KillerInfo {
    fn base(cause: DeathCause, killer_name: impl Into<String>, weapon: impl Into<String>) -> Self {
        Self {
            cause,
            killer_name: killer_name.into(),
            weapon: weapon.into(),
            turret_owner: None,
            is_npc_faction: false,
            npc_faction_tag: None,
        }
    }

    /// A kill credited to a player character.
    pub fn player(name: impl Into<String>) -> Self {
        Self::base(DeathCause::Player, name, "Weapon")
    }

    /// An environmental cause where the hazard doubles as the source label.
    pub fn environmental(cause: DeathCause, label: &str) -> Self {
        Self::base(cause, label, label)
    }

    /// A death attributed to colliding with a grid.
    pub fn collision(grid_name: impl Into<String>) -> Self {
        Self::base(DeathCause::Collision, grid_name, "Collision")
    }

    /// Asphyxiation inferred from the victim's vitals.
    pub fn oxygen_depletion() -> Self {
        Self::environmental(DeathCause::Oxygen, "Oxygen Depletion")
    }

    /// The terminal classification; never fails.
    pub fn environment() -> Self {
        Self::base(DeathCause::Environment, "Environment", "Accident")
    }

    /// An explicitly unknown cause.
    pub fn unknown() -> Self {
        Self::base(DeathCause::Unknown, "Unknown", "Unknown")
    }
}

/// Runs the cascade against the capture buffers and host adapters.
pub struct AttributionResolver {
    type_cache_window: Duration,
    ring_window: Duration,
    oxygen_threshold: f32,
    entities: Arc<dyn EntityResolver>,
    vitals: Arc<dyn VitalMonitor>,
    probe: Arc<dyn AttackerProbe>,
}

impl AttributionResolver {
    /// Create a resolver with the given windows and host adapters.
    pub fn new(
        type_cache_window: Duration,
        ring_window: Duration,
        oxygen_threshold: f32,
        entities: Arc<dyn EntityResolver>,
        vitals: Arc<dyn VitalMonitor>,
        probe: Arc<dyn AttackerProbe>,
    ) -> Self {
        Self {
            type_cache_window,
            ring_window,
            oxygen_threshold,
            entities,
            vitals,
            probe,
        }
    }

    /// Run the cascade. Total: always returns a `KillerInfo`.
    pub fn resolve(
        &self,
        victim: &CharacterSnapshot,
        log: &DamageLog,
        cache: &TypeCache,
        now: Timestamp,
    ) -> KillerInfo {
        if let Some(info) = self.from_type_cache(victim, cache, now) {
            return info;
        }
        if let Some(info) = self.from_ring_buffer(victim, log, now) {
            return info;
        }
        if let Some(info) = self.from_introspection(victim) {
            return info;
        }
        if let Some(info) = self.from_vitals(victim) {
            return info;
        }

        log::debug!(
            "no damage signal resolved for {}; terminal classification",
            victim.name
        );
        KillerInfo::environment()
    }

    /// Stage 1: the short-lived type cache through the fixed tag table.
    fn from_type_cache(
        &self,
        victim: &CharacterSnapshot,
        cache: &TypeCache,
        now: Timestamp,
    ) -> Option<KillerInfo> {
        let entry = cache.recent(victim.id, now)?;
        if now.since(entry.timestamp) > self.type_cache_window {
            return None;
        }
        match cause_for_tag(&entry.tag) {
            Some(info) => Some(info),
            None => {
                log::debug!("damage tag `{}` has no cause mapping", entry.tag);
                None
            }
        }
    }

    /// Stage 2: the newest ring-buffer record, dispatched on capability.
    fn from_ring_buffer(
        &self,
        victim: &CharacterSnapshot,
        log: &DamageLog,
        now: Timestamp,
    ) -> Option<KillerInfo> {
        let record = log.last_damage(victim.id, now, self.ring_window)?;
        self.classify_attacker(record.attacker)
            .or_else(|| self.from_record_names(&record))
    }

    /// Stage 3: the host's introspective last-attacker probe.
    fn from_introspection(&self, victim: &CharacterSnapshot) -> Option<KillerInfo> {
        let id = self.probe.try_last_attacker(victim.id)?;
        self.classify_attacker(id)
    }

    /// Stage 4: a victim with no breath left suffocated.
    fn from_vitals(&self, victim: &CharacterSnapshot) -> Option<KillerInfo> {
        let oxygen = self.vitals.oxygen_level(victim.id)?;
        if oxygen <= self.oxygen_threshold {
            Some(KillerInfo::oxygen_depletion())
        } else {
            None
        }
    }

    /// Capability dispatch shared by the ring-buffer and introspection
    /// stages.
    fn classify_attacker(&self, id: EntityId) -> Option<KillerInfo> {
        if id.is_nil() {
            return None;
        }
        let Some(entity) = self.entities.resolve_entity(id) else {
            log::debug!("attacker entity {} is no longer resolvable", id);
            return None;
        };

        match &entity.capability {
            EntityCapability::Character { name, .. } => Some(KillerInfo::player(name.clone())),
            EntityCapability::Turret { owner, .. } => {
                let weapon = entity
                    .capability
                    .turret_weapon_label()
                    .unwrap_or_else(|| "Turret".to_string());
                Some(classify_turret(weapon, owner.as_ref()))
            }
            EntityCapability::Grid { display_name } => Some(KillerInfo::collision(
                display_name.clone().unwrap_or_else(|| "a ship".to_string()),
            )),
        }
    }

    /// The attacker entity is gone; fall back to the names capture resolved
    /// at damage time.
    fn from_record_names(&self, record: &DamageRecord) -> Option<KillerInfo> {
        if record.attacker_name.is_empty() {
            return None;
        }
        log::debug!(
            "attributing via capture-time names: {} (entity {} gone)",
            record.attacker_name,
            record.attacker
        );
        let mut info = KillerInfo::player(record.attacker_name.clone());
        info.turret_owner = record.owner_name.clone();
        Some(info)
    }
}

/// Resolve a turret kill through its owner.
fn classify_turret(weapon: String, owner: Option<&Owner>) -> KillerInfo {
    match owner {
        Some(Owner::Player { name, .. }) => KillerInfo {
            cause: DeathCause::Turret,
            killer_name: name.clone(),
            weapon,
            turret_owner: Some(name.clone()),
            is_npc_faction: false,
            npc_faction_tag: None,
        },
        Some(Owner::Faction(faction)) if faction.is_npc() => KillerInfo {
            cause: DeathCause::Turret,
            killer_name: faction.name.clone(),
            weapon,
            turret_owner: None,
            is_npc_faction: true,
            npc_faction_tag: Some(faction.tag.clone()),
        },
        Some(Owner::Faction(faction)) => KillerInfo {
            cause: DeathCause::Turret,
            killer_name: faction.name.clone(),
            weapon,
            turret_owner: Some(faction.name.clone()),
            is_npc_faction: false,
            npc_faction_tag: None,
        },
        None => KillerInfo {
            cause: DeathCause::Turret,
            killer_name: weapon.clone(),
            weapon,
            turret_owner: None,
            is_npc_faction: false,
            npc_faction_tag: None,
        },
    }
}
