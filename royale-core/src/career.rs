//! Lifetime career accumulators and the tier / GOAT-index formulas

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::rules::TournamentType;

/// Best finish recorded for a player who has never finished a tournament
pub const NO_FINISH: u32 = 999;

/// A top-10 tournament finish
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub placement: u32,
    #[serde(rename = "type")]
    pub kind: TournamentType,
    pub date: NaiveDate,
    pub earnings: u64,
}

/// Lifetime stats carried across tournaments, keyed by player name in the career book
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerStats {
    pub earnings: u64,
    pub kills: u32,
    pub tournaments: u32,
    pub wins: u32,
    pub cashcup_wins: u32,
    pub elite_series_wins: u32,
    pub reload_wins: u32,
    pub fncs_wins: u32,
    pub lan_wins: u32,
    pub victorycup_wins: u32,
    pub best_finish: u32,
    pub achievements: Vec<Achievement>,
}

impl Default for CareerStats {
    fn default() -> Self {
        Self {
            earnings: 0,
            kills: 0,
            tournaments: 0,
            wins: 0,
            cashcup_wins: 0,
            elite_series_wins: 0,
            reload_wins: 0,
            fncs_wins: 0,
            lan_wins: 0,
            victorycup_wins: 0,
            best_finish: NO_FINISH,
            achievements: Vec::new(),
        }
    }
}

/// Career stats for every player ever seen, by name
pub type CareerBook = BTreeMap<String, CareerStats>;

impl CareerStats {
    /// LAN plus FNCS titles
    pub fn major_wins(&self) -> u32 {
        self.lan_wins + self.fncs_wins
    }

    /// Bump the title counter for the bucket matching `kind`.
    ///
    /// Victory Cup titles are not tournament wins; their match wins are counted as they happen.
    pub fn record_title(&mut self, kind: TournamentType) {
        let bucket = match kind {
            TournamentType::VictoryCup => return,
            TournamentType::CashCup => &mut self.cashcup_wins,
            TournamentType::EliteSeries => &mut self.elite_series_wins,
            TournamentType::Reload => &mut self.reload_wins,
            TournamentType::Fncs => &mut self.fncs_wins,
            TournamentType::Lan => &mut self.lan_wins,
        };
        *bucket += 1;
        self.wins += 1;
    }

    fn tier_score(&self) -> f64 {
        self.earnings as f64 / 500_000.0
            + self.wins as f64 * 3.0
            + self.lan_wins as f64 * 8.0
            + self.fncs_wins as f64 * 7.0
            + self.elite_series_wins as f64 * 5.0
            + self.cashcup_wins as f64 * 2.0
            + self.tournaments as f64 * 0.15
            + self.kills as f64 / 1000.0
    }

    pub fn tier(&self) -> CareerTier {
        career_tier(self)
    }

    pub fn goat_index(&self) -> f64 {
        goat_index(self)
    }
}

/// Career tier, ordered lowest to highest
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CareerTier {
    Rookie,
    Challenger,
    Contender,
    Elite,
    Champion,
    Legend,
    Goat,
}

impl fmt::Display for CareerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CareerTier::Rookie => "Rookie",
            CareerTier::Challenger => "Challenger",
            CareerTier::Contender => "Contender",
            CareerTier::Elite => "Elite",
            CareerTier::Champion => "Champion",
            CareerTier::Legend => "Legend",
            CareerTier::Goat => "GOAT",
        };
        f.write_str(label)
    }
}

/// Categorical tier from a weighted sum of career counters
pub fn career_tier(stats: &CareerStats) -> CareerTier {
    let score = stats.tier_score();
    if score < 30.0 {
        CareerTier::Rookie
    } else if score < 45.0 {
        CareerTier::Challenger
    } else if score < 60.0 {
        CareerTier::Contender
    } else if score < 80.0 {
        CareerTier::Elite
    } else if score < 140.0 {
        CareerTier::Champion
    } else if score < 200.0 {
        CareerTier::Legend
    } else {
        CareerTier::Goat
    }
}

/// All-time ranking score, rounded to two decimals
pub fn goat_index(stats: &CareerStats) -> f64 {
    let top_tens = stats.achievements.iter().filter(|a| a.placement <= 10).count();
    let raw = stats.lan_wins as f64 * 120.0
        + stats.fncs_wins as f64 * 90.0
        + stats.elite_series_wins as f64 * 25.0
        + stats.reload_wins as f64 * 18.0
        + stats.cashcup_wins as f64 * 12.0
        + stats.victorycup_wins as f64 * 8.0
        + top_tens as f64 * 4.0
        + (stats.earnings as f64 / 100_000.0).min(60.0)
        + stats.tournaments as f64 * 0.75;
    (raw * 100.0).round() / 100.0
}

fn achievement_weight(a: &Achievement) -> f64 {
    let base = match a.placement {
        1 => 100.0,
        2 => 85.0,
        3 => 70.0,
        4 => 55.0,
        5 => 40.0,
        p => (40.0 - (p as f64 - 5.0) * 2.0).max(0.0),
    };
    let multiplier = match a.kind {
        TournamentType::Lan => 4.0,
        TournamentType::Fncs => 3.0,
        TournamentType::EliteSeries => 2.0,
        TournamentType::Reload => 1.5,
        TournamentType::CashCup => 1.0,
        TournamentType::VictoryCup => 0.5,
    };
    base * multiplier
}

/// Most prestigious finishes first
pub fn top_achievements(stats: &CareerStats, limit: usize) -> Vec<&Achievement> {
    let mut ranked: Vec<&Achievement> = stats.achievements.iter().collect();
    ranked.sort_by(|a, b| achievement_weight(b).total_cmp(&achievement_weight(a)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn achievement(placement: u32, kind: TournamentType) -> Achievement {
        Achievement {
            placement,
            kind,
            date: date(),
            earnings: 0,
        }
    }

    #[test]
    fn test_new_career_is_rookie() {
        let stats = CareerStats::default();
        assert_eq!(stats.tier(), CareerTier::Rookie);
        assert_eq!(stats.best_finish, NO_FINISH);
        assert_eq!(stats.goat_index(), 0.0);
    }

    #[test]
    fn test_tier_thresholds() {
        // 10 cash cup wins: 10 * 3.0 + 10 * 2.0 = 50 -> Contender
        let stats = CareerStats {
            wins: 10,
            cashcup_wins: 10,
            ..Default::default()
        };
        assert_eq!(career_tier(&stats), CareerTier::Contender);

        // 10 LAN wins: 10 * 3.0 + 10 * 8.0 = 110 -> Champion
        let stats = CareerStats {
            wins: 10,
            lan_wins: 10,
            ..Default::default()
        };
        assert_eq!(career_tier(&stats), CareerTier::Champion);

        let stats = CareerStats {
            wins: 20,
            lan_wins: 20,
            ..Default::default()
        };
        assert_eq!(career_tier(&stats), CareerTier::Goat);
        assert!(CareerTier::Goat > CareerTier::Legend);
    }

    #[test]
    fn test_goat_index_formula() {
        let stats = CareerStats {
            lan_wins: 1,
            fncs_wins: 1,
            victorycup_wins: 2,
            earnings: 250_000,
            tournaments: 4,
            achievements: vec![
                achievement(1, TournamentType::Lan),
                achievement(12, TournamentType::Fncs),
            ],
            ..Default::default()
        };
        // 120 + 90 + 16 + 4 + 2.5 + 3
        assert_eq!(goat_index(&stats), 235.5);
    }

    #[test]
    fn test_goat_index_caps_earnings() {
        let stats = CareerStats {
            earnings: 50_000_000,
            ..Default::default()
        };
        assert_eq!(goat_index(&stats), 60.0);
    }

    #[test]
    fn test_record_title_buckets() {
        let mut stats = CareerStats::default();
        stats.record_title(TournamentType::Fncs);
        stats.record_title(TournamentType::VictoryCup);
        assert_eq!(stats.fncs_wins, 1);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.victorycup_wins, 0);
        assert_eq!(stats.major_wins(), 1);
    }

    #[test]
    fn test_top_achievements_weighting() {
        let stats = CareerStats {
            achievements: vec![
                achievement(1, TournamentType::CashCup),
                achievement(3, TournamentType::Lan),
                achievement(2, TournamentType::VictoryCup),
            ],
            ..Default::default()
        };
        let top = top_achievements(&stats, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].kind, TournamentType::Lan);
        assert_eq!(top[1].kind, TournamentType::CashCup);
    }

    #[test]
    fn test_career_json_keys() {
        let json = r#"{"earnings": 500, "kills": 12, "best_finish": 3, "achievements": [
            {"placement": 3, "type": "CASH_CUP", "date": "2025-01-02", "earnings": 6000}
        ]}"#;
        let stats: CareerStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.earnings, 500);
        assert_eq!(stats.tournaments, 0);
        assert_eq!(stats.achievements[0].kind, TournamentType::CashCup);
    }
}
