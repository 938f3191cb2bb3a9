//! Configuration types for tournament play
//!
//! Level 4 - Utilities and configuration

use royale_core::rules::{template, TournamentType};
use royale_core::{region_pool, Result, RoyaleError};
use serde::{Deserialize, Serialize};

/// Every key accepted by [`TournamentConfig::get`] and [`TournamentConfig::set`]
pub const CONFIG_KEYS: [&str; 14] = [
    "players",
    "matches",
    "elim_points",
    "poi_count",
    "min_poi_size",
    "max_poi_size",
    "storm_circles",
    "tournament_type",
    "archetype_switching",
    "walkouts",
    "killfeed_highlights",
    "show_win_tickers",
    "random_seed",
    "region",
];

/// Flat tournament configuration
///
/// The tournament type is kept as its raw tag: a bad tag is only fatal once a prize
/// table is needed, so a config edited by hand still loads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Lobby size
    pub players: usize,
    /// Matches per tournament
    pub matches: u32,
    /// Points per elimination
    pub elim_points: u32,
    /// Points of interest generated each match
    pub poi_count: usize,
    pub min_poi_size: u32,
    pub max_poi_size: u32,
    /// Storm circles per match (flavor only)
    pub storm_circles: u32,
    /// Tournament type tag, e.g. `CASH_CUP`
    pub tournament_type: String,
    /// Let underperforming players change archetype mid-tournament
    pub archetype_switching: bool,
    /// Hype lines for top players before the first match
    pub walkouts: bool,
    /// Flag eliminations involving the current top five
    pub killfeed_highlights: bool,
    /// Win % projections at halftime and before the final match
    pub show_win_tickers: bool,
    /// Seed for the next tournament
    pub random_seed: u64,
    /// Player pool region (`EU`, `NA` or `MIXED`)
    pub region: String,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            players: 100,
            matches: 6,
            elim_points: 2,
            poi_count: 14,
            min_poi_size: 1,
            max_poi_size: 3,
            storm_circles: 12,
            tournament_type: TournamentType::CashCup.tag().to_string(),
            archetype_switching: true,
            walkouts: false,
            killfeed_highlights: true,
            show_win_tickers: true,
            random_seed: 42,
            region: "EU".to_string(),
        }
    }
}

impl TournamentConfig {
    /// Config preset from a tournament template
    pub fn from_template(key: &str) -> Result<Self> {
        let mut config = Self::default();
        config.apply_template(key)?;
        Ok(config)
    }

    /// Set lobby size and match count
    pub fn with_size(mut self, players: usize, matches: u32) -> Self {
        self.players = players;
        self.matches = matches;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Set the tournament type
    pub fn with_type(mut self, kind: TournamentType) -> Self {
        self.tournament_type = kind.tag().to_string();
        self
    }

    /// Resolve the configured tournament type, failing on an unknown tag
    pub fn tournament_type(&self) -> Result<TournamentType> {
        TournamentType::from_tag(&self.tournament_type)
    }

    /// Late game: the last three matches (`matches - 2` onward), where leaders start forcing fights
    pub fn is_late_game(&self, match_number: u32) -> bool {
        match_number + 2 >= self.matches
    }

    /// Overwrite size, match count, storm circles, elim points and type from a template
    pub fn apply_template(&mut self, key: &str) -> Result<()> {
        let t = template(key)?;
        self.players = t.players;
        self.matches = t.matches;
        self.storm_circles = t.storm_circles;
        self.elim_points = t.elim_points;
        self.tournament_type = t.tournament_type.tag().to_string();
        if let Some(region) = t.region {
            self.region = region.to_string();
        }
        Ok(())
    }

    /// Read any key as a string
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "players" => self.players.to_string(),
            "matches" => self.matches.to_string(),
            "elim_points" => self.elim_points.to_string(),
            "poi_count" => self.poi_count.to_string(),
            "min_poi_size" => self.min_poi_size.to_string(),
            "max_poi_size" => self.max_poi_size.to_string(),
            "storm_circles" => self.storm_circles.to_string(),
            "tournament_type" => self.tournament_type.clone(),
            "archetype_switching" => self.archetype_switching.to_string(),
            "walkouts" => self.walkouts.to_string(),
            "killfeed_highlights" => self.killfeed_highlights.to_string(),
            "show_win_tickers" => self.show_win_tickers.to_string(),
            "random_seed" => self.random_seed.to_string(),
            "region" => self.region.clone(),
            _ => return None,
        };
        Some(value)
    }

    /// Parse and store a value for `key`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || RoyaleError::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let value = value.trim();

        match key {
            "players" => self.players = parse_at_least(value, 2).ok_or_else(invalid)?,
            "matches" => self.matches = parse_at_least(value, 1).ok_or_else(invalid)?,
            "elim_points" => self.elim_points = value.parse().map_err(|_| invalid())?,
            "poi_count" => self.poi_count = parse_at_least(value, 1).ok_or_else(invalid)?,
            "min_poi_size" => self.min_poi_size = parse_at_least(value, 1).ok_or_else(invalid)?,
            "max_poi_size" => self.max_poi_size = parse_at_least(value, 1).ok_or_else(invalid)?,
            "storm_circles" => self.storm_circles = value.parse().map_err(|_| invalid())?,
            "tournament_type" => {
                let kind = TournamentType::from_tag(value).map_err(|_| invalid())?;
                self.tournament_type = kind.tag().to_string();
            }
            "archetype_switching" => self.archetype_switching = parse_flag(value).ok_or_else(invalid)?,
            "walkouts" => self.walkouts = parse_flag(value).ok_or_else(invalid)?,
            "killfeed_highlights" => self.killfeed_highlights = parse_flag(value).ok_or_else(invalid)?,
            "show_win_tickers" => self.show_win_tickers = parse_flag(value).ok_or_else(invalid)?,
            "random_seed" => self.random_seed = value.parse().map_err(|_| invalid())?,
            "region" => {
                region_pool(value).map_err(|_| invalid())?;
                self.region = value.to_ascii_uppercase();
            }
            _ => return Err(RoyaleError::UnknownConfigKey(key.to_string())),
        }
        Ok(())
    }

    /// All keys with their current values, in declaration order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|&k| self.get(k).map(|v| (k, v)))
            .collect()
    }

    pub fn keys() -> &'static [&'static str] {
        &CONFIG_KEYS
    }
}

fn parse_at_least<T>(value: &str, min: T) -> Option<T>
where
    T: std::str::FromStr + PartialOrd,
{
    value.parse::<T>().ok().filter(|v| *v >= min)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}
