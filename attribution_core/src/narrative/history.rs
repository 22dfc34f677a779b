//! Session death history and rolling statistics.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use engine_surface::Timestamp;

use super::DeathType;

/// One prior death, as remembered for the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub killer: String,
    pub weapon: String,
    pub timestamp: Timestamp,
    pub death_type: DeathType,
}

/// In-memory per-victim index of this session's deaths.
///
/// The durable record lives with the external event store; this index only
/// answers the questions narration and statistics need (has this killer
/// killed this victim before, and when).
#[derive(Debug, Default)]
pub struct DeathHistory {
    deaths: HashMap<String, Vec<HistoryRecord>>,
}

impl DeathHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a death of `victim` to the session history.
    pub fn record(&mut self, victim: impl Into<String>, record: HistoryRecord) {
        self.deaths.entry(victim.into()).or_default().push(record);
    }

    /// Most recent time `killer` killed `victim` this session, if ever.
    pub fn last_kill_by(&self, victim: &str, killer: &str) -> Option<Timestamp> {
        self.deaths
            .get(victim)?
            .iter()
            .filter(|record| record.killer == killer)
            .map(|record| record.timestamp)
            .max()
    }

    /// All recorded deaths of `victim`, oldest first.
    pub fn deaths_of(&self, victim: &str) -> &[HistoryRecord] {
        self.deaths
            .get(victim)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total deaths recorded this session.
    pub fn total_deaths(&self) -> usize {
        self.deaths.values().map(Vec::len).sum()
    }

    /// Per-name tallies over the session, sorted by name.
    ///
    /// Suicides count as deaths, not as kills.
    pub fn stats(&self) -> Vec<PlayerStats> {
        let mut by_name: HashMap<&str, PlayerStats> = HashMap::new();

        for (victim, records) in &self.deaths {
            for record in records {
                by_name
                    .entry(victim.as_str())
                    .or_insert_with(|| PlayerStats::named(victim))
                    .deaths += 1;

                if record.killer != *victim {
                    by_name
                        .entry(record.killer.as_str())
                        .or_insert_with(|| PlayerStats::named(&record.killer))
                        .kills += 1;
                }
            }
        }

        let mut stats: Vec<_> = by_name.into_values().collect();
        stats.sort_by(|a, b| a.name.cmp(&b.name));
        stats
    }

    /// Tallies for one name.
    pub fn stats_for(&self, name: &str) -> PlayerStats {
        self.stats()
            .into_iter()
            .find(|stats| stats.name == name)
            .unwrap_or_else(|| PlayerStats::named(name))
    }

    /// Killers ranked by kill count, ties broken by name.
    pub fn top_killers(&self, limit: usize) -> Vec<(String, u32)> {
        let mut killers: Vec<_> = self
            .stats()
            .into_iter()
            .filter(|stats| stats.kills > 0)
            .map(|stats| (stats.name, stats.kills))
            .collect();

        killers.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        killers.truncate(limit);
        killers
    }
}

/// Deaths and kills for one name over the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub deaths: u32,
    pub kills: u32,
}

impl PlayerStats {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            deaths: 0,
            kills: 0,
        }
    }

    /// Kill/death ratio; a player with no deaths reports their kill count.
    pub fn kd_ratio(&self) -> f32 {
        if self.deaths == 0 {
            self.kills as f32
        } else {
            self.kills as f32 / self.deaths as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kill(killer: &str, at_millis: u64) -> HistoryRecord {
        HistoryRecord {
            killer: killer.to_string(),
            weapon: "Weapon".to_string(),
            timestamp: Timestamp::from_millis(at_millis),
            death_type: DeathType::FirstKill,
        }
    }

    #[test]
    fn test_last_kill_by() {
        let mut history = DeathHistory::new();
        history.record("Dagger", kill("Warlord", 1_000));
        history.record("Dagger", kill("Warlord", 9_000));
        history.record("Dagger", kill("Lurker", 5_000));

        assert_eq!(
            history.last_kill_by("Dagger", "Warlord"),
            Some(Timestamp::from_millis(9_000))
        );
        assert_eq!(history.last_kill_by("Dagger", "Nobody"), None);
        assert_eq!(history.last_kill_by("Nobody", "Warlord"), None);
    }

    #[test]
    fn test_stats_tally_kills_and_deaths() {
        let mut history = DeathHistory::new();
        history.record("Dagger", kill("Warlord", 1_000));
        history.record("Dagger", kill("Warlord", 2_000));
        history.record("Warlord", kill("Dagger", 3_000));

        let warlord = history.stats_for("Warlord");
        assert_eq!(warlord.kills, 2);
        assert_eq!(warlord.deaths, 1);

        let dagger = history.stats_for("Dagger");
        assert_eq!(dagger.kills, 1);
        assert_eq!(dagger.deaths, 2);
    }

    #[test]
    fn test_suicide_is_not_a_kill() {
        let mut history = DeathHistory::new();
        history.record("Dagger", kill("Dagger", 1_000));

        let dagger = history.stats_for("Dagger");
        assert_eq!(dagger.deaths, 1);
        assert_eq!(dagger.kills, 0);
    }

    #[test]
    fn test_kd_ratio_with_no_deaths_is_kill_count() {
        let mut history = DeathHistory::new();
        history.record("Dagger", kill("Warlord", 1_000));
        history.record("Dagger", kill("Warlord", 2_000));
        history.record("Dagger", kill("Warlord", 3_000));

        let warlord = history.stats_for("Warlord");
        assert_eq!(warlord.deaths, 0);
        assert_eq!(warlord.kd_ratio(), 3.0);
    }

    #[test]
    fn test_kd_ratio() {
        let stats = PlayerStats {
            name: "Dagger".to_string(),
            deaths: 4,
            kills: 2,
        };
        assert_eq!(stats.kd_ratio(), 0.5);
    }

    #[test]
    fn test_top_killers_ranked() {
        let mut history = DeathHistory::new();
        history.record("A", kill("Warlord", 1_000));
        history.record("B", kill("Warlord", 2_000));
        history.record("C", kill("Lurker", 3_000));

        let top = history.top_killers(10);
        assert_eq!(top[0], ("Warlord".to_string(), 2));
        assert_eq!(top[1], ("Lurker".to_string(), 1));

        let top_one = history.top_killers(1);
        assert_eq!(top_one.len(), 1);
    }

    #[test]
    fn test_total_deaths() {
        let mut history = DeathHistory::new();
        assert_eq!(history.total_deaths(), 0);

        history.record("A", kill("Warlord", 1_000));
        history.record("B", kill("Warlord", 2_000));
        assert_eq!(history.total_deaths(), 2);
    }
}
