//! Damage taxonomy: the engine's damage-type tags and pre-damage payload.

use serde::{Deserialize, Serialize};

use crate::entities::EntityId;

/// Damage-type tags the host engine attaches to damage events.
///
/// The engine transports these as raw strings; unrecognized tags are
/// preserved in [`DamageTag::Other`] rather than rejected, so a modded
/// damage source still flows through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageTag {
    // Atmosphere and vitals
    LowPressure,
    Asphyxia,
    Hunger,

    // Gravity and structure
    Fall,
    Deformation,
    Squeeze,

    // Thermal and radiation
    Heat,
    Temperature,
    Fire,
    Radioactivity,

    // World hazards
    Weather,
    OutOfBounds,
    Environment,

    // Creatures
    Wolf,
    Spider,

    // Tools and weapons
    Grind,
    Bullet,
    Explosion,

    // Deliberate
    Suicide,

    /// A tag this build does not recognize.
    Other(String),
}

impl DamageTag {
    /// Parse an engine tag string. The engine spells squeeze damage
    /// `Squeez`; both spellings are accepted.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "LowPressure" => DamageTag::LowPressure,
            "Asphyxia" => DamageTag::Asphyxia,
            "Hunger" => DamageTag::Hunger,
            "Fall" => DamageTag::Fall,
            "Deformation" => DamageTag::Deformation,
            "Squeez" | "Squeeze" => DamageTag::Squeeze,
            "Heat" => DamageTag::Heat,
            "Temperature" => DamageTag::Temperature,
            "Fire" => DamageTag::Fire,
            "Radioactivity" => DamageTag::Radioactivity,
            "Weather" => DamageTag::Weather,
            "OutOfBounds" => DamageTag::OutOfBounds,
            "Environment" => DamageTag::Environment,
            "Wolf" => DamageTag::Wolf,
            "Spider" => DamageTag::Spider,
            "Grind" => DamageTag::Grind,
            "Bullet" => DamageTag::Bullet,
            "Explosion" => DamageTag::Explosion,
            "Suicide" => DamageTag::Suicide,
            other => DamageTag::Other(other.to_string()),
        }
    }

    /// The canonical engine spelling of this tag.
    pub fn as_str(&self) -> &str {
        match self {
            DamageTag::LowPressure => "LowPressure",
            DamageTag::Asphyxia => "Asphyxia",
            DamageTag::Hunger => "Hunger",
            DamageTag::Fall => "Fall",
            DamageTag::Deformation => "Deformation",
            DamageTag::Squeeze => "Squeez",
            DamageTag::Heat => "Heat",
            DamageTag::Temperature => "Temperature",
            DamageTag::Fire => "Fire",
            DamageTag::Radioactivity => "Radioactivity",
            DamageTag::Weather => "Weather",
            DamageTag::OutOfBounds => "OutOfBounds",
            DamageTag::Environment => "Environment",
            DamageTag::Wolf => "Wolf",
            DamageTag::Spider => "Spider",
            DamageTag::Grind => "Grind",
            DamageTag::Bullet => "Bullet",
            DamageTag::Explosion => "Explosion",
            DamageTag::Suicide => "Suicide",
            DamageTag::Other(s) => s,
        }
    }
}

impl std::fmt::Display for DamageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload of a pre-damage notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageInfo {
    /// Entity dealing the damage; nil when the engine has no attacker.
    pub attacker: EntityId,
    pub tag: DamageTag,
    pub amount: f32,
}

impl DamageInfo {
    /// Create a damage payload.
    pub fn new(attacker: EntityId, tag: DamageTag, amount: f32) -> Self {
        Self {
            attacker,
            tag,
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tags() {
        assert_eq!(DamageTag::parse("Fall"), DamageTag::Fall);
        assert_eq!(DamageTag::parse("LowPressure"), DamageTag::LowPressure);
        assert_eq!(DamageTag::parse("Deformation"), DamageTag::Deformation);
    }

    #[test]
    fn test_parse_squeeze_spellings() {
        assert_eq!(DamageTag::parse("Squeez"), DamageTag::Squeeze);
        assert_eq!(DamageTag::parse("Squeeze"), DamageTag::Squeeze);
    }

    #[test]
    fn test_parse_unknown_tag() {
        let tag = DamageTag::parse("PlasmaStorm");
        assert_eq!(tag, DamageTag::Other("PlasmaStorm".to_string()));
        assert_eq!(tag.as_str(), "PlasmaStorm");
    }

    #[test]
    fn test_round_trip() {
        for raw in ["Fall", "Asphyxia", "Grind", "OutOfBounds", "Wolf"] {
            assert_eq!(DamageTag::parse(raw).as_str(), raw);
        }
    }
}
