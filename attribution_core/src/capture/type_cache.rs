//! Short-lived damage-type cache - one entry per victim.
//!
//! The ring buffer only holds records whose attacker resolved; environmental
//! damage (vacuum, fall, squeeze) usually has no attacker entity at all.
//! The type cache keeps the single most recent damage-type tag per victim
//! for a couple of seconds as a low-fidelity, low-latency complement.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use engine_surface::{DamageTag, EntityId, Timestamp};

/// Most recent damage-type signal for one victim.
#[derive(Debug, Clone)]
pub struct TypeCacheEntry {
    pub tag: DamageTag,
    pub attacker: EntityId,
    pub timestamp: Timestamp,
}

/// One most-recent [`TypeCacheEntry`] per victim, valid for a short window.
#[derive(Debug)]
pub struct TypeCache {
    window: Duration,
    entries: Mutex<HashMap<EntityId, TypeCacheEntry>>,
}

impl TypeCache {
    /// Create a cache whose entries stay valid for `window`.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<EntityId, TypeCacheEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the victim's entry with the latest signal.
    pub fn update(&self, victim: EntityId, tag: DamageTag, attacker: EntityId, now: Timestamp) {
        self.lock().insert(
            victim,
            TypeCacheEntry {
                tag,
                attacker,
                timestamp: now,
            },
        );
    }

    /// The victim's entry if it is still inside the validity window.
    pub fn recent(&self, victim: EntityId, now: Timestamp) -> Option<TypeCacheEntry> {
        self.lock()
            .get(&victim)
            .filter(|entry| now.since(entry.timestamp) <= self.window)
            .cloned()
    }

    /// Drop entries that fell out of the validity window.
    pub fn sweep(&self, now: Timestamp) {
        self.lock()
            .retain(|_, entry| now.since(entry.timestamp) <= self.window);
    }

    /// Number of cached entries, fresh or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VICTIM: EntityId = EntityId(1);

    fn cache() -> TypeCache {
        TypeCache::new(Duration::from_secs(2))
    }

    #[test]
    fn test_fresh_entry_is_returned() {
        let cache = cache();
        cache.update(
            VICTIM,
            DamageTag::Fall,
            EntityId::nil(),
            Timestamp::from_millis(1_000),
        );

        let entry = cache.recent(VICTIM, Timestamp::from_millis(2_500)).unwrap();
        assert_eq!(entry.tag, DamageTag::Fall);
    }

    #[test]
    fn test_stale_entry_is_ignored() {
        let cache = cache();
        cache.update(
            VICTIM,
            DamageTag::Fall,
            EntityId::nil(),
            Timestamp::from_millis(1_000),
        );

        assert!(cache.recent(VICTIM, Timestamp::from_millis(4_000)).is_none());
    }

    #[test]
    fn test_update_overwrites() {
        let cache = cache();
        cache.update(
            VICTIM,
            DamageTag::Fall,
            EntityId::nil(),
            Timestamp::from_millis(1_000),
        );
        cache.update(
            VICTIM,
            DamageTag::LowPressure,
            EntityId::nil(),
            Timestamp::from_millis(1_500),
        );

        let entry = cache.recent(VICTIM, Timestamp::from_millis(2_000)).unwrap();
        assert_eq!(entry.tag, DamageTag::LowPressure);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_sweep_drops_expired() {
        let cache = cache();
        cache.update(
            VICTIM,
            DamageTag::Fall,
            EntityId::nil(),
            Timestamp::from_millis(1_000),
        );
        cache.update(
            EntityId::new(2),
            DamageTag::Heat,
            EntityId::nil(),
            Timestamp::from_millis(9_000),
        );

        cache.sweep(Timestamp::from_millis(10_000));
        assert_eq!(cache.len(), 1);
        assert!(cache.recent(VICTIM, Timestamp::from_millis(10_000)).is_none());
    }
}
