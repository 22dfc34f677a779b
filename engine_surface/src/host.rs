//! Narrow adapter and observer interfaces toward the host engine.
//!
//! The pipeline reaches the engine only through these seams. Each one is
//! small enough to stub in tests and to swap out if the host grows a proper
//! accessor for something we currently probe for.

use glam::DVec3;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::damage::DamageInfo;
use crate::entities::{CharacterSnapshot, EntityId, ResolvedEntity};
use crate::world::{CelestialBody, Timestamp};

/// Entity-by-id lookup.
///
/// Resolution is moment-in-time: an id that resolves during damage capture
/// may be gone by the death notification.
pub trait EntityResolver: Send + Sync {
    fn resolve_entity(&self, id: EntityId) -> Option<ResolvedEntity>;
}

/// Vital-stat queries on a character.
pub trait VitalMonitor: Send + Sync {
    /// Current oxygen/breath level in `0.0..=1.0`, if the character still
    /// has a stat component to read.
    fn oxygen_level(&self, character: EntityId) -> Option<f32>;
}

/// Introspective last-attacker lookup on a victim.
///
/// Some host builds expose the damage dealer through one accessor, some
/// through another, some not at all; implementations try whatever this
/// platform has and report the first id recovered.
pub trait AttackerProbe: Send + Sync {
    fn try_last_attacker(&self, victim: EntityId) -> Option<EntityId>;
}

/// Tries an ordered list of candidate probes; the first hit wins.
#[derive(Default)]
pub struct ProbeChain {
    probes: Vec<Box<dyn AttackerProbe>>,
}

impl ProbeChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a candidate probe to the chain.
    pub fn with_probe(mut self, probe: Box<dyn AttackerProbe>) -> Self {
        self.probes.push(probe);
        self
    }

    /// Number of candidate probes in the chain.
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Check whether the chain has no probes.
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

impl AttackerProbe for ProbeChain {
    fn try_last_attacker(&self, victim: EntityId) -> Option<EntityId> {
        self.probes
            .iter()
            .find_map(|probe| probe.try_last_attacker(victim))
    }
}

/// Nearest-body enumeration over the host world.
pub trait BodyCatalog: Send + Sync {
    /// The registered large body nearest to `position`, if any exist.
    fn nearest_body(&self, position: DVec3) -> Option<CelestialBody>;
}

/// Session time source.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Process-monotonic clock counting from its creation.
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    /// Create a clock whose epoch is now.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.started.elapsed().as_millis() as u64)
    }
}

/// Manually advanced clock for tests.
#[derive(Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    /// Create a clock at session time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the clock to an absolute timestamp.
    pub fn set(&self, timestamp: Timestamp) {
        self.millis.store(timestamp.as_millis(), Ordering::SeqCst);
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

/// Observer for the host's pre-damage notification.
///
/// Called synchronously on the simulation thread for every damage event;
/// implementations must not block and must not panic into the host.
pub trait DamageObserver: Send + Sync {
    fn on_damage(&self, victim: EntityId, victim_name: &str, info: &DamageInfo);
}

/// Observer for the host's character-death notification.
///
/// May arrive on a different thread than damage capture.
pub trait DeathObserver: Send + Sync {
    fn on_death(&self, victim: &CharacterSnapshot);
}

/// Why a hook could not be registered.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("hook point `{0}` is unavailable in this host build")]
    Unavailable(&'static str),

    #[error("hook registration rejected: {0}")]
    Rejected(String),
}

/// Registration capability for the host's damage and death hook points.
pub trait HookPoints {
    fn install_damage_hook(&mut self, observer: Arc<dyn DamageObserver>) -> Result<(), HookError>;

    fn install_death_hook(&mut self, observer: Arc<dyn DeathObserver>) -> Result<(), HookError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe(Option<EntityId>);

    impl AttackerProbe for FixedProbe {
        fn try_last_attacker(&self, _victim: EntityId) -> Option<EntityId> {
            self.0
        }
    }

    #[test]
    fn test_probe_chain_first_hit_wins() {
        let chain = ProbeChain::new()
            .with_probe(Box::new(FixedProbe(None)))
            .with_probe(Box::new(FixedProbe(Some(EntityId::new(7)))))
            .with_probe(Box::new(FixedProbe(Some(EntityId::new(9)))));

        assert_eq!(chain.len(), 3);
        assert_eq!(
            chain.try_last_attacker(EntityId::new(1)),
            Some(EntityId::new(7))
        );
    }

    #[test]
    fn test_probe_chain_empty() {
        let chain = ProbeChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.try_last_attacker(EntityId::new(1)), None);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Timestamp::from_millis(0));

        clock.advance(Duration::from_secs(2));
        assert_eq!(clock.now(), Timestamp::from_millis(2_000));

        clock.set(Timestamp::from_millis(500));
        assert_eq!(clock.now(), Timestamp::from_millis(500));
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
