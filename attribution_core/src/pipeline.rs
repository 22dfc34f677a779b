//! The long-lived pipeline instance wired to the host hooks.
//!
//! One [`DeathPipeline`] is constructed per server session and shared by
//! reference with the hook layer; there are no process-wide singletons.
//! Both observer callbacks are synchronous and absorb their own faults: the
//! worst outcome of an internal failure is a generic death message, never a
//! suppressed death notification or an error escaping into the host.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use engine_surface::{
    AttackerProbe, BodyCatalog, CharacterSnapshot, Clock, DamageInfo, DamageObserver,
    DeathObserver, EntityCapability, EntityId, EntityResolver, HookPoints, Owner, Timestamp,
    VitalMonitor,
};

use crate::capture::{DamageLog, DamageRecord, TypeCache};
use crate::config::PipelineConfig;
use crate::events::{DeathHistoryEntry, DeathReport, EventSink};
use crate::location::LocationClassifier;
use crate::narrative::{DeathHistory, HistoryRecord, NarrativeAssembler, PlayerStats};
use crate::resolver::{AttributionResolver, KillerInfo};
use crate::PipelineError;

/// Host adapters the pipeline consumes, bundled to keep construction
/// readable.
pub struct HostAdapters {
    pub entities: Arc<dyn EntityResolver>,
    pub vitals: Arc<dyn VitalMonitor>,
    pub probe: Arc<dyn AttackerProbe>,
    pub bodies: Arc<dyn BodyCatalog>,
    pub clock: Arc<dyn Clock>,
    pub sink: Arc<dyn EventSink>,
}

/// The death attribution pipeline.
///
/// Owns every piece of shared mutable state (ring buffers, type cache,
/// session history, RNG) behind coarse locks, per the concurrency model:
/// damage capture arrives on the simulation thread while death
/// notifications may arrive elsewhere.
pub struct DeathPipeline {
    log: DamageLog,
    type_cache: TypeCache,
    resolver: AttributionResolver,
    classifier: LocationClassifier,
    assembler: NarrativeAssembler,
    history: Mutex<DeathHistory>,
    rng: Mutex<ChaCha8Rng>,
    entities: Arc<dyn EntityResolver>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
    degraded: AtomicBool,
}

impl DeathPipeline {
    /// Create a pipeline with an entropy-seeded RNG.
    pub fn new(config: PipelineConfig, adapters: HostAdapters) -> Self {
        Self::build(config, adapters, ChaCha8Rng::from_entropy())
    }

    /// Create a pipeline whose template and phrase selection is
    /// deterministic under `seed`.
    pub fn with_seed(config: PipelineConfig, adapters: HostAdapters, seed: u64) -> Self {
        Self::build(config, adapters, ChaCha8Rng::seed_from_u64(seed))
    }

    fn build(config: PipelineConfig, adapters: HostAdapters, rng: ChaCha8Rng) -> Self {
        let HostAdapters {
            entities,
            vitals,
            probe,
            bodies,
            clock,
            sink,
        } = adapters;

        let log = DamageLog::new(
            config.buffer_capacity,
            config.retention(),
            config.cleanup_interval(),
        );
        let type_cache = TypeCache::new(config.type_cache_window());
        let resolver = AttributionResolver::new(
            config.type_cache_window(),
            config.ring_window(),
            config.oxygen_threshold,
            entities.clone(),
            vitals,
            probe,
        );
        let classifier = LocationClassifier::new(config.zones.clone(), bodies);
        let assembler = NarrativeAssembler::new(
            config.retaliation_window(),
            config.old_retaliation_window(),
            config.templates.clone(),
            config.phrases.clone(),
            config.marker.clone(),
        );

        Self {
            log,
            type_cache,
            resolver,
            classifier,
            assembler,
            history: Mutex::new(DeathHistory::new()),
            rng: Mutex::new(rng),
            entities,
            clock,
            sink,
            degraded: AtomicBool::new(false),
        }
    }

    /// Install both observers on the host's hook points.
    ///
    /// Registration failure logs an error and degrades the pipeline to the
    /// terminal classification for every death; the feature dims, the
    /// server keeps running. The first failure is also returned so the
    /// embedding layer can surface it in its own diagnostics.
    pub fn attach(pipeline: &Arc<Self>, hooks: &mut dyn HookPoints) -> Result<(), PipelineError> {
        let mut first_failure = None;

        let damage_observer: Arc<dyn DamageObserver> = pipeline.clone();
        if let Err(err) = hooks.install_damage_hook(damage_observer) {
            log::error!("damage hook registration failed: {}", err);
            pipeline.degraded.store(true, Ordering::SeqCst);
            first_failure = Some(err);
        }
        let death_observer: Arc<dyn DeathObserver> = pipeline.clone();
        if let Err(err) = hooks.install_death_hook(death_observer) {
            log::error!("death hook registration failed: {}", err);
            pipeline.degraded.store(true, Ordering::SeqCst);
            first_failure.get_or_insert(err);
        }

        match first_failure {
            None => Ok(()),
            Some(err) => Err(err.into()),
        }
    }

    /// Whether killer resolution has been degraded to the terminal
    /// classification.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    fn lock_history(&self) -> MutexGuard<'_, DeathHistory> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_rng(&self) -> MutexGuard<'_, ChaCha8Rng> {
        self.rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Per-name session statistics, sorted by name.
    pub fn stats(&self) -> Vec<PlayerStats> {
        self.lock_history().stats()
    }

    /// Session statistics for one name.
    pub fn stats_for(&self, name: &str) -> PlayerStats {
        self.lock_history().stats_for(name)
    }

    /// Killers ranked by session kill count.
    pub fn top_killers(&self, limit: usize) -> Vec<(String, u32)> {
        self.lock_history().top_killers(limit)
    }

    /// Run the full death flow and hand the results downstream. Also
    /// returns the report for the embedding layer.
    pub fn handle_death(&self, victim: &CharacterSnapshot) -> DeathReport {
        let now = self.clock.now();

        let killer = if self.is_degraded() {
            KillerInfo::environment()
        } else {
            self.resolver
                .resolve(victim, &self.log, &self.type_cache, now)
        };
        let location = self.classifier.classify(victim);

        let mut history = self.lock_history();
        let death_type = self.assembler.classify(&victim.name, &killer, &history, now);
        let message = {
            let mut rng = self.lock_rng();
            self.assembler
                .render(&mut *rng, &victim.name, &killer, death_type, &location)
        };
        history.record(
            victim.name.clone(),
            HistoryRecord {
                killer: killer.killer_name.clone(),
                weapon: killer.weapon.clone(),
                timestamp: now,
                death_type,
            },
        );
        drop(history);

        let entry = DeathHistoryEntry::new(
            &victim.name,
            &killer.killer_name,
            &killer.weapon,
            now,
            death_type,
        );
        let report = DeathReport {
            killer,
            location,
            death_type,
            message,
        };

        log::info!(
            "{} death resolved: {:?} by {}",
            victim.name,
            report.death_type,
            report.killer.killer_name
        );
        self.sink.record_death(&report, &entry);
        report
    }

    /// Resolve the attacker now; it may be gone by the death notification.
    /// An unresolvable attacker records nothing.
    fn build_record(
        &self,
        victim: EntityId,
        victim_name: &str,
        info: &DamageInfo,
        now: Timestamp,
    ) -> Option<DamageRecord> {
        if info.attacker.is_nil() {
            return None;
        }
        let Some(entity) = self.entities.resolve_entity(info.attacker) else {
            log::debug!("attacker {} not resolvable at capture time", info.attacker);
            return None;
        };

        let attacker_name = match &entity.capability {
            EntityCapability::Character { name, .. } => name.clone(),
            EntityCapability::Turret { .. } => entity
                .capability
                .turret_weapon_label()
                .unwrap_or_else(|| "Turret".to_string()),
            EntityCapability::Grid { display_name } => display_name
                .clone()
                .unwrap_or_else(|| "a ship".to_string()),
        };

        let mut record = DamageRecord::new(
            victim,
            victim_name,
            info.attacker,
            attacker_name,
            info.tag.clone(),
            info.amount,
            now,
        );

        if let EntityCapability::Turret {
            owner: Some(owner), ..
        } = &entity.capability
        {
            match owner {
                Owner::Player { id, name } => record = record.with_owner(*id, name.clone()),
                Owner::Faction(faction) => record = record.with_faction_tag(faction.tag.clone()),
            }
        }

        Some(record)
    }
}

impl DamageObserver for DeathPipeline {
    fn on_damage(&self, victim: EntityId, victim_name: &str, info: &DamageInfo) {
        let now = self.clock.now();

        // The cache carries environmental signals that never resolve to an
        // attacker entity, so it is refreshed unconditionally.
        self.type_cache
            .update(victim, info.tag.clone(), info.attacker, now);

        if let Some(record) = self.build_record(victim, victim_name, info, now) {
            self.log.record(record);
        }

        if self.log.maybe_cleanup(now) {
            self.type_cache.sweep(now);
        }
    }
}

impl DeathObserver for DeathPipeline {
    fn on_death(&self, victim: &CharacterSnapshot) {
        self.handle_death(victim);
    }
}
