//! Royale Core - Entity model and scoring rules
//!
//! This crate provides the building blocks of the battle-royale tournament simulator:
//! - Players, archetypes and points of interest
//! - Leaderboard ordering
//! - Placement points, prize tables and the tournament-type catalog
//! - Career accumulators with tier and GOAT-index scoring
//! - Regional roster pools

pub mod archetype;
pub mod career;
pub mod error;
pub mod player;
pub mod poi;
pub mod roster;
pub mod rules;
pub mod standings;

use rand_chacha::ChaCha8Rng;

/// The single random source threaded through a simulation run
pub type SimRng = ChaCha8Rng;

// Re-exports for convenient access
pub use archetype::{Archetype, ARCHETYPES};
pub use career::{career_tier, goat_index, top_achievements, Achievement, CareerBook, CareerStats, CareerTier};
pub use error::{Result, RoyaleError};
pub use player::{pair_mut, register_elim, Player, PlayerId, StandingContext};
pub use poi::{assign_drops, generate_pois, Poi};
pub use roster::{build_roster, display_name, region_pool};
pub use rules::{
    match_points, placement_points, prize_for_rank, template, PointsTable, TournamentTemplate,
    TournamentType,
};
pub use standings::{leaderboard_cmp, leaderboard_order};
