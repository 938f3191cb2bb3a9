//! Player records
//!
//! A `Player` is created fresh for every tournament. Transient per-match and per-tournament
//! state lives beside the `career` block, which is merged in from the career book when the
//! tournament starts and written back when it ends.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::archetype::Archetype;
use crate::career::CareerStats;

/// Player identifier, unique within a tournament
pub type PlayerId = u32;

/// Sentinel gap to the next player below for whoever ranks last
pub const NO_PLAYER_BELOW: u32 = 999;

/// Competitive context recomputed before every match
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StandingContext {
    /// 1-based leaderboard position
    pub rank: usize,
    pub points_to_first: u32,
    pub points_to_above: u32,
    pub points_to_below: u32,
    pub safety_margin: u32,
}

/// A tournament entrant
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub org: String,
    pub skill: f64,

    /// Archetype the player entered the tournament with
    pub archetype: Archetype,
    /// Archetype currently driving combat (differs after a switch)
    pub current_archetype: Archetype,
    pub has_switched_archetype: bool,

    // Tournament totals
    pub total_points: u32,
    pub total_elims: u32,
    pub wins: u32,
    pub placements: Vec<u32>,
    pub match_kills: Vec<u32>,
    pub tournament_earnings: u64,

    // Match state
    pub alive: bool,
    pub drop_poi: String,
    /// Left the tournament for good; takes the worst placements from then on
    pub forfeited: bool,

    // Strategy state
    pub confidence: f64,
    pub risk_tolerance: f64,
    pub grief_bias: f64,
    pub standing: StandingContext,
    /// Times this player eliminated each opponent
    pub rivals: FxHashMap<PlayerId, u32>,
    /// Times each opponent eliminated this player
    pub fear: FxHashMap<PlayerId, u32>,

    pub career: CareerStats,
}

impl Player {
    pub fn new(id: PlayerId, name: &str, skill: f64, archetype: Archetype, org: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            org: org.to_string(),
            skill,
            archetype,
            current_archetype: archetype,
            has_switched_archetype: false,
            total_points: 0,
            total_elims: 0,
            wins: 0,
            placements: Vec::new(),
            match_kills: Vec::new(),
            tournament_earnings: 0,
            alive: true,
            drop_poi: String::new(),
            forfeited: false,
            confidence: 0.0,
            risk_tolerance: 0.5,
            grief_bias: 0.0,
            standing: StandingContext::default(),
            rivals: FxHashMap::default(),
            fear: FxHashMap::default(),
            career: CareerStats::default(),
        }
    }

    /// Attach loaded career stats
    pub fn with_career(mut self, career: CareerStats) -> Self {
        self.career = career;
        self
    }

    /// Record one completed match
    pub fn add_match_result(&mut self, placement: u32, elims: u32, points: u32) {
        self.total_points += points;
        self.total_elims += elims;
        self.placements.push(placement);
        self.match_kills.push(elims);
        if placement == 1 {
            self.wins += 1;
        }
    }

    pub fn matches_played(&self) -> usize {
        self.placements.len()
    }

    /// Mean placement, 0.0 before the first match
    pub fn average_placement(&self) -> f64 {
        if self.placements.is_empty() {
            0.0
        } else {
            self.placements.iter().map(|&p| p as f64).sum::<f64>() / self.placements.len() as f64
        }
    }

    pub fn average_elims(&self) -> f64 {
        if self.placements.is_empty() {
            0.0
        } else {
            self.total_elims as f64 / self.placements.len() as f64
        }
    }

    /// Consecutive match wins ending with the most recent match
    pub fn win_streak(&self) -> u32 {
        self.placements.iter().rev().take_while(|&&p| p == 1).count() as u32
    }

    pub fn rivalry_against(&self, opponent: PlayerId) -> u32 {
        self.rivals.get(&opponent).copied().unwrap_or(0)
    }

    pub fn fear_of(&self, opponent: PlayerId) -> u32 {
        self.fear.get(&opponent).copied().unwrap_or(0)
    }

    /// Undo any archetype switch made during the tournament
    pub fn revert_archetype(&mut self) {
        self.current_archetype = self.archetype;
        self.has_switched_archetype = false;
    }
}

/// Record an elimination on both sides of the rivalry
pub fn register_elim(killer: &mut Player, victim: &mut Player) {
    *killer.rivals.entry(victim.id).or_insert(0) += 1;
    *victim.fear.entry(killer.id).or_insert(0) += 1;
}

/// Mutable access to two distinct players of a slice
///
/// # Panics
/// Panics if `a == b`
pub fn pair_mut(players: &mut [Player], a: usize, b: usize) -> (&mut Player, &mut Player) {
    assert_ne!(a, b, "a player cannot be paired with themselves");
    if a < b {
        let (left, right) = players.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = players.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
