//! Pipeline outputs - history entries, death reports, and the event sink.
//!
//! The pipeline owns no wire format or file layout; finished records are
//! handed to external collaborators through [`EventSink`] and forgotten.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use engine_surface::Timestamp;

use crate::location::LocationZoneResult;
use crate::narrative::DeathType;
use crate::resolver::KillerInfo;

/// Unique identifier for death history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Create a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Record handed to the external persistence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeathHistoryEntry {
    pub id: EventId,
    pub victim: String,
    pub killer: String,
    pub weapon: String,
    pub timestamp: Timestamp,
    pub death_type: DeathType,
}

impl DeathHistoryEntry {
    /// Create an entry with a fresh id.
    pub fn new(
        victim: impl Into<String>,
        killer: impl Into<String>,
        weapon: impl Into<String>,
        timestamp: Timestamp,
        death_type: DeathType,
    ) -> Self {
        Self {
            id: EventId::new(),
            victim: victim.into(),
            killer: killer.into(),
            weapon: weapon.into(),
            timestamp,
            death_type,
        }
    }
}

/// Finished narrative handed to the external event-logging/relay
/// collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeathReport {
    pub killer: KillerInfo,
    pub location: LocationZoneResult,
    pub death_type: DeathType,
    pub message: String,
}

/// Downstream delivery seam.
///
/// Delivery is fire-and-forget: implementations must not block the death
/// callback and get no way to report failure back into the pipeline.
pub trait EventSink: Send + Sync {
    fn record_death(&self, report: &DeathReport, entry: &DeathHistoryEntry);
}

/// Default sink: emits both records as JSON lines through the log facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record_death(&self, report: &DeathReport, entry: &DeathHistoryEntry) {
        match serde_json::to_string(report) {
            Ok(line) => log::info!(target: "epitaph::events", "report {}", line),
            Err(err) => log::warn!("death report not serializable: {}", err),
        }
        match serde_json::to_string(entry) {
            Ok(line) => log::info!(target: "epitaph::events", "entry {}", line),
            Err(err) => log::warn!("history entry not serializable: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationZone;

    #[test]
    fn test_event_ids_are_unique() {
        assert_ne!(EventId::new(), EventId::new());
    }

    #[test]
    fn test_history_entry_builder() {
        let entry = DeathHistoryEntry::new(
            "Dagger",
            "Warlord",
            "Gatling Turret",
            Timestamp::from_millis(1_000),
            DeathType::FirstKill,
        );

        assert_eq!(entry.victim, "Dagger");
        assert_eq!(entry.killer, "Warlord");
        assert_eq!(entry.death_type, DeathType::FirstKill);
    }

    #[test]
    fn test_report_serializes() {
        let report = DeathReport {
            killer: KillerInfo::player("Warlord"),
            location: LocationZoneResult {
                zone: LocationZone::InnerSystem,
                nearest_body: None,
                distance_km: 2_000.0,
                grid: None,
            },
            death_type: DeathType::FirstKill,
            message: "Dagger was slain by Warlord".to_string(),
        };

        let line = serde_json::to_string(&report).unwrap();
        assert!(line.contains("\"Warlord\""));
        assert!(line.contains("InnerSystem"));
    }
}
