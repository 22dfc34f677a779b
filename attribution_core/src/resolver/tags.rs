//! Fixed damage-tag lookup table - first stage of the cascade.

use engine_surface::DamageTag;

use super::{DeathCause, KillerInfo};

/// Map a cached damage-type tag to a terminal cause bucket.
///
/// Unrecognized tags return `None` and the cascade falls through to the
/// ring-buffer stage.
pub fn cause_for_tag(tag: &DamageTag) -> Option<KillerInfo> {
    let info = match tag {
        DamageTag::LowPressure | DamageTag::Asphyxia => {
            KillerInfo::environmental(DeathCause::Oxygen, "Vacuum")
        }
        DamageTag::Fall => KillerInfo::environmental(DeathCause::Fall, "Gravity"),
        DamageTag::Deformation => KillerInfo::environmental(DeathCause::Collision, "Collision"),
        DamageTag::Heat | DamageTag::Temperature | DamageTag::Fire => {
            KillerInfo::environmental(DeathCause::Pressure, "Heat")
        }
        DamageTag::Radioactivity => KillerInfo::environmental(DeathCause::Pressure, "Radiation"),
        DamageTag::Suicide => KillerInfo::environmental(DeathCause::Suicide, "Self"),
        DamageTag::Grind => KillerInfo::environmental(DeathCause::Grinding, "Grinder"),
        DamageTag::Wolf => KillerInfo::environmental(DeathCause::Environment, "Wolf"),
        DamageTag::Spider => KillerInfo::environmental(DeathCause::Environment, "Spider"),
        DamageTag::Hunger => KillerInfo::environmental(DeathCause::Environment, "Starvation"),
        DamageTag::Weather => KillerInfo::environmental(DeathCause::Environment, "Weather"),
        DamageTag::Squeeze => KillerInfo::environmental(DeathCause::Pressure, "Pressure"),
        DamageTag::OutOfBounds => {
            KillerInfo::environmental(DeathCause::Environment, "Map Boundary")
        }
        _ => return None,
    };
    Some(info)
}
