//! Capability surface of resolved entities.
//!
//! The pipeline never sees the engine's object model. When it resolves an
//! entity id it gets back one of the capabilities below, which is exactly
//! the information killer resolution dispatches on.

use serde::{Deserialize, Serialize};

use super::{EntityId, PlayerId};

/// Turret family keywords recognized in block sub-type strings, checked in
/// this order.
const TURRET_FAMILIES: [&str; 6] = [
    "Gatling",
    "Missile",
    "Interior",
    "Rocket",
    "Autocannon",
    "Artillery",
];

/// An entity id together with what the engine says it can do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedEntity {
    pub id: EntityId,
    pub capability: EntityCapability,
}

impl ResolvedEntity {
    /// Pair an id with its capability.
    pub fn new(id: EntityId, capability: EntityCapability) -> Self {
        Self { id, capability }
    }
}

/// What a resolved entity is capable of, as far as attribution cares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityCapability {
    /// A player-controlled character.
    Character {
        name: String,
        player_id: Option<PlayerId>,
    },

    /// An automated weapon block.
    Turret {
        /// Engine sub-type string, e.g. `LargeGatlingTurret`.
        subtype: String,
        /// Name the builder gave the block, if any.
        custom_name: Option<String>,
        owner: Option<Owner>,
    },

    /// A structural grid (ship or station).
    Grid { display_name: Option<String> },
}

impl EntityCapability {
    /// Check whether this entity is a player-controlled character.
    pub fn is_character(&self) -> bool {
        matches!(self, EntityCapability::Character { .. })
    }

    /// Weapon label for a turret: the first recognized family keyword in the
    /// sub-type string, else the block's custom name, else the raw sub-type.
    ///
    /// Returns `None` for non-turret capabilities.
    pub fn turret_weapon_label(&self) -> Option<String> {
        let EntityCapability::Turret {
            subtype,
            custom_name,
            ..
        } = self
        else {
            return None;
        };

        for family in TURRET_FAMILIES {
            if subtype.contains(family) {
                return Some(format!("{} Turret", family));
            }
        }

        Some(custom_name.clone().unwrap_or_else(|| subtype.clone()))
    }
}

/// Who owns an automated block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Owner {
    /// Owned directly by a player.
    Player { id: PlayerId, name: String },

    /// Owned by a faction.
    Faction(FactionInfo),
}

/// Faction identity as reported by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactionInfo {
    /// Short faction tag, e.g. `SPRT`.
    pub tag: String,
    pub name: String,

    /// Whether the faction accepts human members. AI-run factions do not.
    pub accepts_humans: bool,
}

impl FactionInfo {
    /// Create a faction record.
    pub fn new(tag: impl Into<String>, name: impl Into<String>, accepts_humans: bool) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
            accepts_humans,
        }
    }

    /// Check whether this faction is AI-run.
    pub fn is_npc(&self) -> bool {
        !self.accepts_humans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turret_family_label() {
        let turret = EntityCapability::Turret {
            subtype: "LargeGatlingTurret".to_string(),
            custom_name: Some("Port Defense".to_string()),
            owner: None,
        };

        // Family keyword wins over the custom name
        assert_eq!(turret.turret_weapon_label().unwrap(), "Gatling Turret");
    }

    #[test]
    fn test_turret_custom_name_fallback() {
        let turret = EntityCapability::Turret {
            subtype: "ModdedPlasmaBlaster".to_string(),
            custom_name: Some("Old Faithful".to_string()),
            owner: None,
        };

        assert_eq!(turret.turret_weapon_label().unwrap(), "Old Faithful");
    }

    #[test]
    fn test_turret_subtype_fallback() {
        let turret = EntityCapability::Turret {
            subtype: "ModdedPlasmaBlaster".to_string(),
            custom_name: None,
            owner: None,
        };

        assert_eq!(turret.turret_weapon_label().unwrap(), "ModdedPlasmaBlaster");
    }

    #[test]
    fn test_non_turret_has_no_weapon_label() {
        let character = EntityCapability::Character {
            name: "Dagger".to_string(),
            player_id: None,
        };

        assert!(character.turret_weapon_label().is_none());
        assert!(character.is_character());
    }

    #[test]
    fn test_npc_faction() {
        let npc = FactionInfo::new("SPRT", "Space Pirates", false);
        let human = FactionInfo::new("RED", "Red Fleet", true);

        assert!(npc.is_npc());
        assert!(!human.is_npc());
    }
}
