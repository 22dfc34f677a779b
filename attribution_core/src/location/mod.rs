//! Location Classifier - spatial-zone classification for death positions.
//!
//! Classification is total: any finite position lands in exactly one zone,
//! and malformed input degrades to [`LocationZone::Unknown`] rather than an
//! error. Near a registered celestial body the zone follows the ratio of
//! distance to body radius; away from every body it follows distance from
//! the world origin.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use engine_surface::{BodyCatalog, CharacterSnapshot};

/// Spatial buckets a death can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationZone {
    OnSurface,
    LowOrbit,
    HighOrbit,
    InnerSystem,
    OuterSpace,
    DeepSpace,
    Unknown,
}

/// Where a death happened, for narration and relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationZoneResult {
    pub zone: LocationZone,

    /// Resolved name of the nearest registered body, when one was found.
    pub nearest_body: Option<String>,

    /// Distance in kilometers: to the nearest body's center when one was
    /// found, otherwise from the world origin.
    pub distance_km: f64,

    /// Grid the victim was structurally attached to, for message
    /// composition.
    pub grid: Option<String>,
}

impl LocationZoneResult {
    fn unknown(grid: Option<String>) -> Self {
        Self {
            zone: LocationZone::Unknown,
            nearest_body: None,
            distance_km: 0.0,
            grid,
        }
    }
}

/// Distance thresholds for zone classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneThresholds {
    /// Distance/radius ratio at or below which a death is on the surface.
    pub surface_multiplier: f64,

    /// Ratio at or below which a death is in low orbit.
    pub low_orbit_multiplier: f64,

    /// Ratio at or below which a death is in high orbit.
    pub high_orbit_multiplier: f64,

    /// Origin distance below which open space counts as the inner system.
    pub inner_system_max_km: f64,

    /// Origin distance below which open space counts as outer space;
    /// everything beyond is deep space.
    pub outer_space_max_km: f64,
}

impl Default for ZoneThresholds {
    fn default() -> Self {
        Self {
            surface_multiplier: 1.15,
            low_orbit_multiplier: 1.5,
            high_orbit_multiplier: 3.0,
            inner_system_max_km: 5_000.0,
            outer_space_max_km: 50_000.0,
        }
    }
}

/// Classifies death positions against the host's body catalog.
pub struct LocationClassifier {
    thresholds: ZoneThresholds,
    bodies: Arc<dyn BodyCatalog>,
}

impl LocationClassifier {
    /// Create a classifier over the given body catalog.
    pub fn new(thresholds: ZoneThresholds, bodies: Arc<dyn BodyCatalog>) -> Self {
        Self { thresholds, bodies }
    }

    /// Classify the victim's last position. Total: always yields a zone.
    pub fn classify(&self, victim: &CharacterSnapshot) -> LocationZoneResult {
        let position = victim.position;
        let grid = victim.attached_grid.clone();

        if !position.is_finite() {
            log::debug!("non-finite death position for {}", victim.name);
            return LocationZoneResult::unknown(grid);
        }

        if let Some(body) = self.bodies.nearest_body(position) {
            if body.radius > 0.0 {
                let distance = body.distance_to(position);
                let ratio = distance / body.radius;
                let name = body.resolved_name();

                let zone = if ratio <= self.thresholds.surface_multiplier {
                    Some(LocationZone::OnSurface)
                } else if ratio <= self.thresholds.low_orbit_multiplier {
                    Some(LocationZone::LowOrbit)
                } else if ratio <= self.thresholds.high_orbit_multiplier {
                    Some(LocationZone::HighOrbit)
                } else {
                    None
                };

                if let Some(zone) = zone {
                    return LocationZoneResult {
                        zone,
                        nearest_body: Some(name),
                        distance_km: distance / 1_000.0,
                        grid,
                    };
                }

                // Too far from the body to count as its orbit; fall through
                // to origin bands but keep the body for context.
                let origin_km = position.length() / 1_000.0;
                return LocationZoneResult {
                    zone: self.origin_zone(origin_km),
                    nearest_body: Some(name),
                    distance_km: distance / 1_000.0,
                    grid,
                };
            }
        }

        let origin_km = position.length() / 1_000.0;
        LocationZoneResult {
            zone: self.origin_zone(origin_km),
            nearest_body: None,
            distance_km: origin_km,
            grid,
        }
    }

    fn origin_zone(&self, origin_km: f64) -> LocationZone {
        if origin_km < self.thresholds.inner_system_max_km {
            LocationZone::InnerSystem
        } else if origin_km < self.thresholds.outer_space_max_km {
            LocationZone::OuterSpace
        } else {
            LocationZone::DeepSpace
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_surface::{CelestialBody, EntityId};
    use glam::DVec3;

    struct OneBody(Option<CelestialBody>);

    impl BodyCatalog for OneBody {
        fn nearest_body(&self, _position: DVec3) -> Option<CelestialBody> {
            self.0.clone()
        }
    }

    fn classifier(body: Option<CelestialBody>) -> LocationClassifier {
        LocationClassifier::new(ZoneThresholds::default(), Arc::new(OneBody(body)))
    }

    fn victim_at(position: DVec3) -> CharacterSnapshot {
        CharacterSnapshot::new(EntityId::new(1), "Dagger").with_position(position)
    }

    fn earthlike() -> CelestialBody {
        CelestialBody::new(DVec3::ZERO, 60_000.0).with_canonical_name("EarthLike")
    }

    #[test]
    fn test_ratio_one_is_on_surface() {
        let result = classifier(Some(earthlike())).classify(&victim_at(DVec3::new(
            60_000.0, 0.0, 0.0,
        )));

        assert_eq!(result.zone, LocationZone::OnSurface);
        assert_eq!(result.nearest_body.as_deref(), Some("EarthLike"));
        assert_eq!(result.distance_km, 60.0);
    }

    #[test]
    fn test_ratio_two_is_high_orbit() {
        let result = classifier(Some(earthlike()))
            .classify(&victim_at(DVec3::new(120_000.0, 0.0, 0.0)));

        assert_eq!(result.zone, LocationZone::HighOrbit);
    }

    #[test]
    fn test_ratio_just_above_surface_is_low_orbit() {
        let result = classifier(Some(earthlike()))
            .classify(&victim_at(DVec3::new(80_000.0, 0.0, 0.0)));

        assert_eq!(result.zone, LocationZone::LowOrbit);
    }

    #[test]
    fn test_no_body_close_to_origin_is_inner_system() {
        // 2000 km from origin, under the 5000 km inner-system boundary
        let result =
            classifier(None).classify(&victim_at(DVec3::new(2_000_000.0, 0.0, 0.0)));

        assert_eq!(result.zone, LocationZone::InnerSystem);
        assert!(result.nearest_body.is_none());
        assert_eq!(result.distance_km, 2_000.0);
    }

    #[test]
    fn test_no_body_origin_bands() {
        let c = classifier(None);

        let outer = c.classify(&victim_at(DVec3::new(10_000_000.0, 0.0, 0.0)));
        assert_eq!(outer.zone, LocationZone::OuterSpace);

        let deep = c.classify(&victim_at(DVec3::new(80_000_000.0, 0.0, 0.0)));
        assert_eq!(deep.zone, LocationZone::DeepSpace);
    }

    #[test]
    fn test_far_from_body_falls_through_to_origin_bands() {
        // Ratio 10 against the body, but only 600 km from origin
        let body = CelestialBody::new(DVec3::ZERO, 60_000.0).with_canonical_name("EarthLike");
        let result =
            classifier(Some(body)).classify(&victim_at(DVec3::new(600_000.0, 0.0, 0.0)));

        assert_eq!(result.zone, LocationZone::InnerSystem);
        assert_eq!(result.nearest_body.as_deref(), Some("EarthLike"));
    }

    #[test]
    fn test_non_finite_position_is_unknown() {
        let result = classifier(Some(earthlike()))
            .classify(&victim_at(DVec3::new(f64::NAN, 0.0, 0.0)));

        assert_eq!(result.zone, LocationZone::Unknown);
    }

    #[test]
    fn test_grid_context_is_carried_through() {
        let victim = CharacterSnapshot::new(EntityId::new(1), "Dagger")
            .with_position(DVec3::new(60_000.0, 0.0, 0.0))
            .with_grid("Red Falcon");

        let result = classifier(Some(earthlike())).classify(&victim);
        assert_eq!(result.grid.as_deref(), Some("Red Falcon"));
    }
}
