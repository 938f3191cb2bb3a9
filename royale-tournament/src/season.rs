//! Season accumulators, champion selection and rollover

use std::cmp::Ordering;
use std::collections::BTreeMap;

use royale_core::Player;
use serde::{Deserialize, Serialize};

/// Standings archived per finished season
pub const ARCHIVED_STANDINGS: usize = 15;

/// One player's totals for the current season
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonLine {
    pub points: u64,
    pub wins: u32,
    pub elims: u32,
    pub earnings: u64,
}

impl SeasonLine {
    fn add(&mut self, player: &Player) {
        self.points += player.total_points as u64;
        self.wins += player.wins;
        self.elims += player.total_elims;
        self.earnings += player.tournament_earnings;
    }
}

/// Season ranking: earnings, points, wins, eliminations, all descending
fn season_cmp(a: &SeasonLine, b: &SeasonLine) -> Ordering {
    b.earnings
        .cmp(&a.earnings)
        .then_with(|| b.points.cmp(&a.points))
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| b.elims.cmp(&a.elims))
}

/// A finished season
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub season: u32,
    pub champion: String,
    pub leaderboard: Vec<(String, SeasonLine)>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonState {
    pub current_season: u32,
    pub tournaments_played: u32,
    pub tournaments_per_season: u32,
    pub season_players: BTreeMap<String, SeasonLine>,
    pub history: Vec<SeasonRecord>,
}

impl Default for SeasonState {
    fn default() -> Self {
        Self {
            current_season: 1,
            tournaments_played: 0,
            tournaments_per_season: 16,
            season_players: BTreeMap::new(),
            history: Vec::new(),
        }
    }
}

impl SeasonState {
    /// Add a finished tournament's totals and count it
    pub fn record_tournament(&mut self, players: &[Player]) {
        for p in players {
            self.season_players.entry(p.name.clone()).or_default().add(p);
        }
        self.tournaments_played += 1;
    }

    pub fn is_complete(&self) -> bool {
        self.tournaments_played >= self.tournaments_per_season
    }

    /// Current season standings, best first. Ties keep name order.
    pub fn standings(&self) -> Vec<(&str, &SeasonLine)> {
        let mut rows: Vec<(&str, &SeasonLine)> = self
            .season_players
            .iter()
            .map(|(name, line)| (name.as_str(), line))
            .collect();
        rows.sort_by(|a, b| season_cmp(a.1, b.1));
        rows
    }

    /// Fraction of the season played, in [0, 1]
    pub fn progress(&self) -> f64 {
        if self.tournaments_per_season == 0 {
            1.0
        } else {
            (self.tournaments_played as f64 / self.tournaments_per_season as f64).min(1.0)
        }
    }

    /// Close the season if it is complete.
    ///
    /// Crowns the champion, archives the top standings, advances the season number and resets
    /// the counters. Returns the archived record, or `None` if the season is still running or
    /// nobody played in it.
    pub fn end_season_if_complete(&mut self) -> Option<SeasonRecord> {
        if !self.is_complete() {
            return None;
        }

        let record = {
            let standings = self.standings();
            standings.first().map(|&(champion, _)| SeasonRecord {
                season: self.current_season,
                champion: champion.to_string(),
                leaderboard: standings
                    .iter()
                    .take(ARCHIVED_STANDINGS)
                    .map(|&(name, line)| (name.to_string(), line.clone()))
                    .collect(),
            })
        };

        if let Some(record) = &record {
            tracing::info!("Season {} champion: {}", record.season, record.champion);
            self.history.push(record.clone());
        }
        self.current_season += 1;
        self.tournaments_played = 0;
        self.season_players.clear();
        record
    }
}
