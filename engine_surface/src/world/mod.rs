//! World-facing types: session time and celestial bodies.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Milliseconds of session time.
///
/// All retention-window checks compare timestamps produced by the same
/// [`crate::host::Clock`], so the epoch is whatever that clock started at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Create a timestamp from milliseconds of session time.
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Milliseconds of session time.
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier`; zero if `earlier` is in the future.
    pub fn since(&self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl std::ops::Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp(self.0.saturating_add(rhs.as_millis() as u64))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// A large celestial body registered with the host world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CelestialBody {
    /// Center of the body in world coordinates (meters).
    pub center: DVec3,

    /// Body radius in meters.
    pub radius: f64,

    /// The name the world designer gave the body.
    pub canonical_name: Option<String>,

    /// Name shown in the engine UI, when it differs.
    pub display_name: Option<String>,

    /// Identifier of the body's storage entry, e.g. `Planet EarthLike-12345`.
    pub storage_name: Option<String>,
}

impl CelestialBody {
    /// Create a body at `center` with the given radius in meters.
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self {
            center,
            radius,
            canonical_name: None,
            display_name: None,
            storage_name: None,
        }
    }

    /// Set the designer-given name.
    pub fn with_canonical_name(mut self, name: impl Into<String>) -> Self {
        self.canonical_name = Some(name.into());
        self
    }

    /// Set the UI display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set the storage identifier.
    pub fn with_storage_name(mut self, name: impl Into<String>) -> Self {
        self.storage_name = Some(name.into());
        self
    }

    /// Distance from `position` to the body's center, in meters.
    pub fn distance_to(&self, position: DVec3) -> f64 {
        self.center.distance(position)
    }

    /// Resolve a printable name: the canonical name, then the display name,
    /// then a cleaned storage identifier, defaulting to `"Unknown Planet"`.
    pub fn resolved_name(&self) -> String {
        if let Some(name) = non_empty(&self.canonical_name) {
            return name;
        }
        if let Some(name) = non_empty(&self.display_name) {
            return name;
        }
        if let Some(raw) = non_empty(&self.storage_name) {
            if let Some(cleaned) = clean_storage_name(&raw) {
                return cleaned;
            }
        }
        "Unknown Planet".to_string()
    }
}

fn non_empty(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Turn a storage identifier like `Planet EarthLike-12345` into `EarthLike`:
/// strip the `Planet ` prefix, cut the first `-` suffix, trim trailing digits.
fn clean_storage_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let without_prefix = trimmed.strip_prefix("Planet ").unwrap_or(trimmed);
    let without_suffix = without_prefix
        .split('-')
        .next()
        .unwrap_or(without_prefix)
        .trim_end_matches(|c: char| c.is_ascii_digit())
        .trim();

    if without_suffix.is_empty() {
        None
    } else {
        Some(without_suffix.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_since() {
        let earlier = Timestamp::from_millis(1_000);
        let later = Timestamp::from_millis(3_500);

        assert_eq!(later.since(earlier), Duration::from_millis(2_500));
        // A future timestamp reads as zero elapsed, not a panic
        assert_eq!(earlier.since(later), Duration::ZERO);
    }

    #[test]
    fn test_timestamp_add() {
        let t = Timestamp::from_millis(1_000) + Duration::from_secs(2);
        assert_eq!(t.as_millis(), 3_000);
    }

    #[test]
    fn test_resolved_name_prefers_canonical() {
        let body = CelestialBody::new(DVec3::ZERO, 60_000.0)
            .with_canonical_name("Aridia")
            .with_display_name("Aridia (Desert)")
            .with_storage_name("Planet Aridia-99881");

        assert_eq!(body.resolved_name(), "Aridia");
    }

    #[test]
    fn test_resolved_name_display_fallback() {
        let body = CelestialBody::new(DVec3::ZERO, 60_000.0)
            .with_display_name("Aridia (Desert)")
            .with_storage_name("Planet Aridia-99881");

        assert_eq!(body.resolved_name(), "Aridia (Desert)");
    }

    #[test]
    fn test_resolved_name_cleans_storage_identifier() {
        let body =
            CelestialBody::new(DVec3::ZERO, 60_000.0).with_storage_name("Planet EarthLike-12345");

        assert_eq!(body.resolved_name(), "EarthLike");
    }

    #[test]
    fn test_resolved_name_default() {
        let body = CelestialBody::new(DVec3::ZERO, 60_000.0).with_canonical_name("   ");
        assert_eq!(body.resolved_name(), "Unknown Planet");
    }

    #[test]
    fn test_distance_to() {
        let body = CelestialBody::new(DVec3::new(100.0, 0.0, 0.0), 50.0);
        assert_eq!(body.distance_to(DVec3::ZERO), 100.0);
    }
}
