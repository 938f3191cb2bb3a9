//! Royale Tournament - Battle royale tournament simulation
//!
//! This crate provides the simulation engine:
//! - Match play from drops to the last player standing
//! - Tournament runs with prize payouts and career settlement
//! - Season accumulation and rollover
//! - Extension hooks ("mods") that perturb matches
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_tournament (orchestration)
//! - Level 2: play_match, settle_careers (phases)
//! - Level 3: run_combat, strategy updates, commentary (steps)
//! - Level 4: configuration, events, extensions

pub mod combat;
pub mod commentary;
pub mod config;
pub mod events;
pub mod extensions;
pub mod match_play;
pub mod season;
pub mod strategy;
pub mod tournament;

pub use combat::{run_combat, CombatOutcome, CombatSetup};
pub use commentary::{mvp_quote, victory_commentary, walkout_lines, win_ticker, TickerEntry, VictorySnapshot, WinTicker};
pub use config::{TournamentConfig, CONFIG_KEYS};
pub use events::{MatchEvent, SpawnFailure};
pub use extensions::{
    Extension, ExtensionSet, HookContext, PingDifference, RageQuit, StreamSniped, TechnicalIssues, ZeroBuildFlashback,
};
pub use match_play::{play_match, AbortReason, MatchOutcome, MatchReport, PlayerResult, StandingRow};
pub use season::{SeasonLine, SeasonRecord, SeasonState};
pub use tournament::{
    run_tournament, run_tournament_observed, settle_careers, FinalStanding, SeasonEnd, SimContext, TournamentReport,
    TournamentRun,
};
