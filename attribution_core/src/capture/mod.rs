//! Damage Capture module - bounded per-victim ring buffers of recent damage.
//!
//! Capture runs on the host's simulation thread for every damage event, so
//! the write path is one lock, one slot write, one cursor bump. Records age
//! out of queries as soon as they leave the retention window and out of
//! memory on the next periodic sweep; a victim whose bucket empties
//! completely is dropped, which keeps the log bounded by live combat rather
//! than by session length.

mod type_cache;

pub use type_cache::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use engine_surface::{DamageTag, EntityId, PlayerId, Timestamp};

/// One captured damage event against a trackable victim.
///
/// Ownership fields are resolved at capture time because the attacker may
/// not be resolvable later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageRecord {
    pub victim: EntityId,
    pub victim_name: String,
    pub attacker: EntityId,
    pub attacker_name: String,
    pub tag: DamageTag,
    pub amount: f32,
    pub timestamp: Timestamp,

    /// Player that owned the attacking block, when one was resolvable.
    pub owner_id: Option<PlayerId>,
    pub owner_name: Option<String>,

    /// Tag of the faction that owned the attacking block, when any.
    pub faction_tag: Option<String>,
}

impl DamageRecord {
    /// Create a record with no ownership information.
    pub fn new(
        victim: EntityId,
        victim_name: impl Into<String>,
        attacker: EntityId,
        attacker_name: impl Into<String>,
        tag: DamageTag,
        amount: f32,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            victim,
            victim_name: victim_name.into(),
            attacker,
            attacker_name: attacker_name.into(),
            tag,
            amount,
            timestamp,
            owner_id: None,
            owner_name: None,
            faction_tag: None,
        }
    }

    /// Attach the owning player resolved at capture time.
    pub fn with_owner(mut self, id: PlayerId, name: impl Into<String>) -> Self {
        self.owner_id = Some(id);
        self.owner_name = Some(name.into());
        self
    }

    /// Attach the owning faction tag resolved at capture time.
    pub fn with_faction_tag(mut self, tag: impl Into<String>) -> Self {
        self.faction_tag = Some(tag.into());
        self
    }
}

/// Fixed-size circular bucket of records for one victim.
#[derive(Debug)]
struct Bucket {
    slots: Vec<Option<DamageRecord>>,
    cursor: usize,
}

impl Bucket {
    fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            cursor: 0,
        }
    }

    fn write(&mut self, record: DamageRecord) {
        let len = self.slots.len();
        self.slots[self.cursor] = Some(record);
        self.cursor = (self.cursor + 1) % len;
    }

    /// Scan backward from the cursor; first record inside the window wins.
    fn newest_within(&self, now: Timestamp, window: Duration) -> Option<&DamageRecord> {
        let len = self.slots.len();
        for step in 1..=len {
            let idx = (self.cursor + len - step) % len;
            if let Some(record) = &self.slots[idx] {
                if now.since(record.timestamp) <= window {
                    return Some(record);
                }
            }
        }
        None
    }

    fn all_within(&self, now: Timestamp, window: Duration) -> Vec<DamageRecord> {
        self.slots
            .iter()
            .flatten()
            .filter(|record| now.since(record.timestamp) <= window)
            .cloned()
            .collect()
    }

    fn expire(&mut self, now: Timestamp, retention: Duration) {
        for slot in &mut self.slots {
            if let Some(record) = slot {
                if now.since(record.timestamp) > retention {
                    *slot = None;
                }
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

#[derive(Debug)]
struct LogState {
    buckets: HashMap<EntityId, Bucket>,
    last_cleanup: Timestamp,
}

/// Per-victim ring buffers over recent damage, behind one coarse lock.
#[derive(Debug)]
pub struct DamageLog {
    capacity: usize,
    retention: Duration,
    cleanup_interval: Duration,
    state: Mutex<LogState>,
}

impl DamageLog {
    /// Create a log with `capacity` slots per victim.
    pub fn new(capacity: usize, retention: Duration, cleanup_interval: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            retention,
            cleanup_interval,
            state: Mutex::new(LogState {
                buckets: HashMap::new(),
                last_cleanup: Timestamp::default(),
            }),
        }
    }

    // A poisoned lock only means some writer panicked mid-call; the map is
    // still structurally sound, so capture keeps going.
    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write a record into the victim's bucket, overwriting the oldest slot
    /// once the bucket is full.
    pub fn record(&self, record: DamageRecord) {
        let mut state = self.lock();
        let capacity = self.capacity;
        state
            .buckets
            .entry(record.victim)
            .or_insert_with(|| Bucket::new(capacity))
            .write(record);
    }

    /// The newest record for `victim` inside `window`, if any.
    pub fn last_damage(
        &self,
        victim: EntityId,
        now: Timestamp,
        window: Duration,
    ) -> Option<DamageRecord> {
        let state = self.lock();
        state
            .buckets
            .get(&victim)
            .and_then(|bucket| bucket.newest_within(now, window))
            .cloned()
    }

    /// Every record for `victim` inside `window`, unordered.
    pub fn damages_within(
        &self,
        victim: EntityId,
        now: Timestamp,
        window: Duration,
    ) -> Vec<DamageRecord> {
        let state = self.lock();
        state
            .buckets
            .get(&victim)
            .map(|bucket| bucket.all_within(now, window))
            .unwrap_or_default()
    }

    /// Run a sweep if the cleanup interval has elapsed since the last one.
    /// Returns whether a sweep ran.
    pub fn maybe_cleanup(&self, now: Timestamp) -> bool {
        {
            let state = self.lock();
            if now.since(state.last_cleanup) < self.cleanup_interval {
                return false;
            }
        }
        self.cleanup(now);
        true
    }

    /// Null records older than the retention window and drop buckets that
    /// became fully empty.
    pub fn cleanup(&self, now: Timestamp) {
        let mut state = self.lock();
        let before = state.buckets.len();

        for bucket in state.buckets.values_mut() {
            bucket.expire(now, self.retention);
        }
        state.buckets.retain(|_, bucket| !bucket.is_empty());
        state.last_cleanup = now;

        let dropped = before - state.buckets.len();
        if dropped > 0 {
            log::trace!("damage log sweep dropped {} idle victim buckets", dropped);
        }
    }

    /// Number of victims currently holding at least one buffered record.
    pub fn tracked_victims(&self) -> usize {
        self.lock().buckets.len()
    }
}
