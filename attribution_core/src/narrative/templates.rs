//! Message templates - placeholder substitution and location phrasing.

use rand::Rng;
use std::collections::HashMap;

use crate::location::{LocationZone, LocationZoneResult};

/// Used when no template is configured for a death type.
pub const FALLBACK_TEMPLATE: &str = "{victim} died";

/// Used when no phrasing is configured for a zone.
const FALLBACK_PHRASE: &str = "somewhere in space";

/// Values substituted into a death message template.
#[derive(Debug, Clone, Copy)]
pub struct MessageVars<'a> {
    pub victim: &'a str,
    pub killer: &'a str,
    pub weapon: &'a str,
    pub location: &'a str,
}

/// Substitute placeholders in a fixed order: the named forms (`{victim}`,
/// `{killer}`, `{weapon}`, `{location}`) in one pass, then the legacy
/// positional forms (`{0}` killer, `{1}` victim, `{2}` weapon, `{3}`
/// location) in a second pass.
///
/// Because the positional pass runs over already-substituted text, a value
/// that itself contains `{0}`-style text gets rewritten again. That matches
/// the templates shipped with older configs and is kept for compatibility.
pub fn render_template(template: &str, vars: &MessageVars<'_>) -> String {
    let mut message = template.to_string();

    for (placeholder, value) in [
        ("{victim}", vars.victim),
        ("{killer}", vars.killer),
        ("{weapon}", vars.weapon),
        ("{location}", vars.location),
    ] {
        message = message.replace(placeholder, value);
    }

    for (placeholder, value) in [
        ("{0}", vars.killer),
        ("{1}", vars.victim),
        ("{2}", vars.weapon),
        ("{3}", vars.location),
    ] {
        message = message.replace(placeholder, value);
    }

    message
}

/// Whether a template references the location in either placeholder style.
pub fn mentions_location(template: &str) -> bool {
    template.contains("{location}") || template.contains("{3}")
}

/// Pick a template uniformly at random, falling back when the set is empty.
pub fn pick_template<'a, R: Rng>(rng: &mut R, set: &'a [String]) -> &'a str {
    if set.is_empty() {
        FALLBACK_TEMPLATE
    } else {
        &set[rng.gen_range(0..set.len())]
    }
}

/// Randomized location phrase for the classified zone.
///
/// The wording rolls per call; only the zone category is meaningful. `{body}`
/// resolves to the nearest body's name and a grid attachment is appended
/// when present.
pub fn location_phrase<R: Rng>(
    rng: &mut R,
    location: &LocationZoneResult,
    phrases: &HashMap<LocationZone, Vec<String>>,
) -> String {
    let template = phrases
        .get(&location.zone)
        .filter(|set| !set.is_empty())
        .map(|set| set[rng.gen_range(0..set.len())].as_str())
        .unwrap_or(FALLBACK_PHRASE);

    let body = location.nearest_body.as_deref().unwrap_or("an unnamed world");
    let mut phrase = template.replace("{body}", body);

    if let Some(grid) = &location.grid {
        phrase.push_str(" aboard ");
        phrase.push_str(grid);
    }

    phrase
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn vars<'a>() -> MessageVars<'a> {
        MessageVars {
            victim: "A",
            killer: "B",
            weapon: "W",
            location: "L",
        }
    }

    #[test]
    fn test_named_placeholders() {
        let rendered = render_template("{victim} was destroyed by {killer} using {weapon}", &vars());
        assert_eq!(rendered, "A was destroyed by B using W");
    }

    #[test]
    fn test_positional_placeholders() {
        let rendered = render_template("{0} destroyed {1} with {2} {3}", &vars());
        assert_eq!(rendered, "B destroyed A with W L");
    }

    #[test]
    fn test_mixed_placeholders() {
        let rendered = render_template("{victim} fell to {0}", &vars());
        assert_eq!(rendered, "A fell to B");
    }

    #[test]
    fn test_positional_pass_rewrites_substituted_text() {
        // Legacy order: a value containing positional text is rewritten by
        // the second pass
        let vars = MessageVars {
            victim: "A",
            killer: "{2}",
            weapon: "W",
            location: "L",
        };
        let rendered = render_template("{killer} got {victim}", &vars);
        assert_eq!(rendered, "W got A");
    }

    #[test]
    fn test_mentions_location() {
        assert!(mentions_location("{victim} died {location}"));
        assert!(mentions_location("{0} killed {1} {3}"));
        assert!(!mentions_location("{victim} died"));
    }

    #[test]
    fn test_pick_template_empty_set_falls_back() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(pick_template(&mut rng, &[]), FALLBACK_TEMPLATE);
    }

    #[test]
    fn test_pick_template_is_seed_deterministic() {
        let set: Vec<String> = (0..10).map(|i| format!("template {}", i)).collect();

        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..20 {
            assert_eq!(pick_template(&mut a, &set), pick_template(&mut b, &set));
        }
    }

    #[test]
    fn test_location_phrase_substitutes_body() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut phrases = HashMap::new();
        phrases.insert(
            LocationZone::OnSurface,
            vec!["on the surface of {body}".to_string()],
        );

        let location = LocationZoneResult {
            zone: LocationZone::OnSurface,
            nearest_body: Some("EarthLike".to_string()),
            distance_km: 60.0,
            grid: None,
        };

        assert_eq!(
            location_phrase(&mut rng, &location, &phrases),
            "on the surface of EarthLike"
        );
    }

    #[test]
    fn test_location_phrase_appends_grid() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut phrases = HashMap::new();
        phrases.insert(LocationZone::DeepSpace, vec!["in deep space".to_string()]);

        let location = LocationZoneResult {
            zone: LocationZone::DeepSpace,
            nearest_body: None,
            distance_km: 90_000.0,
            grid: Some("Red Falcon".to_string()),
        };

        assert_eq!(
            location_phrase(&mut rng, &location, &phrases),
            "in deep space aboard Red Falcon"
        );
    }

    #[test]
    fn test_location_phrase_unconfigured_zone_falls_back() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let location = LocationZoneResult {
            zone: LocationZone::Unknown,
            nearest_body: None,
            distance_km: 0.0,
            grid: None,
        };

        assert_eq!(
            location_phrase(&mut rng, &location, &HashMap::new()),
            FALLBACK_PHRASE
        );
    }
}
