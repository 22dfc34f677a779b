//! Victim snapshot delivered by the host's character-death notification.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::EntityId;

/// Last-known state of a character at the moment of death.
///
/// Attacker entities can be destroyed moments after the death notification
/// fires, so everything the attribution cascade needs from the victim is
/// captured up front rather than re-queried later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub id: EntityId,
    pub name: String,

    /// World position in meters.
    pub position: DVec3,

    /// Display name of the grid the character is structurally attached to,
    /// if any (seated in a cockpit, magnetized to a hull).
    pub attached_grid: Option<String>,
}

impl CharacterSnapshot {
    /// Create a snapshot with the given identity.
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            position: DVec3::ZERO,
            attached_grid: None,
        }
    }

    /// Set the last-known world position.
    pub fn with_position(mut self, position: DVec3) -> Self {
        self.position = position;
        self
    }

    /// Set the grid the character was attached to.
    pub fn with_grid(mut self, grid: impl Into<String>) -> Self {
        self.attached_grid = Some(grid.into());
        self
    }

    /// Check whether the character was attached to a grid.
    pub fn is_aboard_grid(&self) -> bool {
        self.attached_grid.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_builder() {
        let snapshot = CharacterSnapshot::new(EntityId::new(1), "Dagger")
            .with_position(DVec3::new(1.0, 2.0, 3.0))
            .with_grid("Red Falcon");

        assert_eq!(snapshot.name, "Dagger");
        assert_eq!(snapshot.position.y, 2.0);
        assert!(snapshot.is_aboard_grid());
    }

    #[test]
    fn test_snapshot_defaults() {
        let snapshot = CharacterSnapshot::new(EntityId::new(1), "Dagger");
        assert_eq!(snapshot.position, DVec3::ZERO);
        assert!(!snapshot.is_aboard_grid());
    }
}
