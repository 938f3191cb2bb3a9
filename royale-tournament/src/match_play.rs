//! Match play - one match from the battle bus to the Victory Royale
//!
//! Level 2 - Phase-level implementation

use royale_core::{
    assign_drops, display_name, generate_pois, leaderboard_order, match_points, Player, PlayerId, Result, SimRng,
    TournamentType,
};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::combat::{run_combat, CombatSetup};
use crate::commentary::{ticker_due, victory_commentary, win_ticker, VictorySnapshot, WinTicker};
use crate::config::TournamentConfig;
use crate::events::{MatchEvent, SpawnFailure};
use crate::extensions::{ExtensionSet, HookContext};
use crate::strategy::{maybe_switch_archetype, update_confidence, update_player_strategy, update_tournament_context};

/// Players shown as "players to watch" before the bus launches
const WATCH_LIST_SIZE: usize = 3;
/// Players whose kills are highlighted in the feed
const HIGHLIGHT_SIZE: usize = 5;
/// Rows in the post-match leaderboard
const TOP_ROWS: usize = 10;

/// One player's line for a completed match
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub player: PlayerId,
    pub placement: u32,
    pub kills: u32,
    pub points: u32,
}

/// Cumulative leaderboard row after a match
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub player: PlayerId,
    pub name: String,
    pub rank: usize,
    /// Rank going into the match
    pub previous_rank: usize,
    pub points: u32,
    pub elims: u32,
    pub wins: u32,
}

impl StandingRow {
    /// Places gained (positive) or lost (negative) this match
    pub fn movement(&self) -> i64 {
        self.previous_rank as i64 - self.rank as i64
    }
}

/// Everything that happened in a completed match
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchReport {
    pub match_number: u32,
    pub total_matches: u32,
    pub winner: PlayerId,
    pub winner_name: String,
    pub commentary: String,
    /// Per-player results, in player order
    pub results: Vec<PlayerResult>,
    pub events: Vec<MatchEvent>,
    pub players_to_watch: Vec<PlayerId>,
    pub leaderboard: Vec<StandingRow>,
    pub ticker: Option<WinTicker>,
}

impl MatchReport {
    pub fn result_for(&self, player: PlayerId) -> Option<&PlayerResult> {
        self.results.iter().find(|r| r.player == player)
    }

    pub fn winner_result(&self) -> Option<&PlayerResult> {
        self.result_for(self.winner)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AbortReason {
    /// Fewer than two players were left after spawn events and forfeits
    TooFewPlayers { alive: usize },
    /// Nobody would fight anybody
    Stalled,
}

/// A match either completes with exactly one winner or is aborted with no results recorded
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchOutcome {
    Completed(MatchReport),
    Aborted {
        match_number: u32,
        reason: AbortReason,
        events: Vec<MatchEvent>,
    },
}

impl MatchOutcome {
    pub fn report(&self) -> Option<&MatchReport> {
        match self {
            MatchOutcome::Completed(report) => Some(report),
            MatchOutcome::Aborted { .. } => None,
        }
    }

    pub fn match_number(&self) -> u32 {
        match self {
            MatchOutcome::Completed(report) => report.match_number,
            MatchOutcome::Aborted { match_number, .. } => *match_number,
        }
    }
}

// ============================================================================
// Level 2 - Match phases
// ============================================================================

/// Play match `match_number` with the given lobby (Level 2 phase)
///
/// Fails only when the configured tournament type is unknown.
pub fn play_match(
    players: &mut [Player],
    match_number: u32,
    config: &TournamentConfig,
    extensions: &ExtensionSet,
    rng: &mut SimRng,
) -> Result<MatchOutcome> {
    let kind = config.tournament_type()?;
    let mut events = Vec::new();

    refresh_strategy(players, match_number, config.matches);
    {
        let mut ctx = hook_context(config, match_number, rng, &mut events);
        extensions.match_start(players, &mut ctx);
    }
    let players_to_watch = top_by_points(players, WATCH_LIST_SIZE);

    let pois = generate_pois(config.poi_count, config.min_poi_size, config.max_poi_size, rng);
    assign_drops(players, &pois, rng);

    let failed = run_spawn_hooks(players, match_number, config, extensions, rng, &mut events);
    let mut placements = assign_bottom_placements(players, &failed, &mut events);

    let alive: Vec<usize> = (0..players.len()).filter(|&i| players[i].alive).collect();
    if alive.len() < 2 {
        tracing::warn!("Match {} aborted: {} player(s) left after spawn", match_number, alive.len());
        return Ok(MatchOutcome::Aborted {
            match_number,
            reason: AbortReason::TooFewPlayers { alive: alive.len() },
            events,
        });
    }

    let setup = CombatSetup {
        config,
        extensions,
        match_number,
        late_game: config.is_late_game(match_number),
        lobby_size: players.len(),
        reboot: kind.rules().reboot,
        highlighted: if config.killfeed_highlights {
            top_by_points(players, HIGHLIGHT_SIZE).into_iter().collect()
        } else {
            FxHashSet::default()
        },
    };
    let snapshot = CombatSnapshot::take(players);
    let combat = run_combat(players, alive, &setup, &mut events, rng);
    let winner = match combat.winner {
        Some(winner) if !combat.stalled => winner,
        _ => {
            snapshot.restore(players);
            tracing::warn!("Match {} aborted: combat stalled", match_number);
            return Ok(MatchOutcome::Aborted {
                match_number,
                reason: AbortReason::Stalled,
                events,
            });
        }
    };

    for (slot, combat_placement) in placements.iter_mut().zip(&combat.placements) {
        if slot.is_none() {
            *slot = *combat_placement;
        }
    }
    let results = apply_results(players, &placements, &combat.kills, config.elim_points, kind);
    let winner_id = players[winner].id;

    if kind == TournamentType::VictoryCup {
        players[winner].career.victorycup_wins += 1;
    }

    {
        let mut ctx = hook_context(config, match_number, rng, &mut events);
        extensions.match_end(players, winner_id, &mut ctx);
    }
    update_confidence(players);
    if config.archetype_switching {
        run_archetype_switches(players, match_number, rng, &mut events);
    }

    let snapshot = VictorySnapshot::of(&players[winner], match_number, config.matches);
    let commentary = victory_commentary(&snapshot, rng);
    tracing::info!(
        "Match {}/{} won by {} ({} kills)",
        match_number,
        config.matches,
        players[winner].name,
        combat.kills[winner]
    );

    let ticker = if config.show_win_tickers && ticker_due(match_number, config.matches) {
        win_ticker(players, match_number, config.matches, config.elim_points, kind.tag())
    } else {
        None
    };

    Ok(MatchOutcome::Completed(MatchReport {
        match_number,
        total_matches: config.matches,
        winner: winner_id,
        winner_name: display_name(&players[winner]),
        commentary,
        results,
        events,
        players_to_watch,
        leaderboard: leaderboard_rows(players, TOP_ROWS),
        ticker,
    }))
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Standings context first, then every player's risk posture
fn refresh_strategy(players: &mut [Player], match_number: u32, total_matches: u32) {
    update_tournament_context(players);
    for p in players.iter_mut() {
        update_player_strategy(p, match_number, total_matches);
    }
}

/// Ask the extensions about every player still in the tournament; returns who failed to spawn
fn run_spawn_hooks(
    players: &mut [Player],
    match_number: u32,
    config: &TournamentConfig,
    extensions: &ExtensionSet,
    rng: &mut SimRng,
    events: &mut Vec<MatchEvent>,
) -> Vec<usize> {
    let mut failed = Vec::new();
    for (i, player) in players.iter_mut().enumerate() {
        if player.forfeited {
            player.alive = false;
            continue;
        }
        let reported = {
            let mut ctx = hook_context(config, match_number, rng, events);
            extensions.player_spawn(player, &mut ctx)
        };
        let failure = reported.or((!player.alive).then_some(SpawnFailure::Crash));
        if let Some(reason) = failure {
            player.alive = false;
            tracing::debug!("{} {}", player.name, reason.describe());
            events.push(MatchEvent::SpawnFailed {
                player: player.id,
                reason,
            });
            failed.push(i);
        }
    }
    failed
}

/// Worst placements for forfeiters, then for spawn failures, weakest last within each group
fn assign_bottom_placements(players: &[Player], failed: &[usize], events: &mut Vec<MatchEvent>) -> Vec<Option<u32>> {
    let mut placements = vec![None; players.len()];
    let mut next = players.len() as u32;

    let mut forfeiters: Vec<usize> = (0..players.len()).filter(|&i| players[i].forfeited).collect();
    let mut failed = failed.to_vec();
    forfeiters.sort_by(|&a, &b| players[a].skill.total_cmp(&players[b].skill));
    failed.sort_by(|&a, &b| players[a].skill.total_cmp(&players[b].skill));

    for &i in &forfeiters {
        placements[i] = Some(next);
        events.push(MatchEvent::Forfeited {
            player: players[i].id,
            placement: next,
        });
        next -= 1;
    }
    for &i in &failed {
        placements[i] = Some(next);
        next -= 1;
    }
    placements
}

/// Score the match and append it to every player's history
fn apply_results(
    players: &mut [Player],
    placements: &[Option<u32>],
    kills: &[u32],
    elim_points: u32,
    kind: TournamentType,
) -> Vec<PlayerResult> {
    let lobby = players.len() as u32;
    players
        .iter_mut()
        .enumerate()
        .map(|(i, p)| {
            let placement = placements[i].unwrap_or(lobby);
            let points = match_points(placement, kills[i], elim_points, kind.tag());
            p.add_match_result(placement, kills[i], points);
            PlayerResult {
                player: p.id,
                placement,
                kills: kills[i],
                points,
            }
        })
        .collect()
}

fn run_archetype_switches(players: &mut [Player], match_number: u32, rng: &mut SimRng, events: &mut Vec<MatchEvent>) {
    for p in players.iter_mut() {
        if let Some((from, to)) = maybe_switch_archetype(p, match_number, rng) {
            tracing::debug!("{} switches from {} to {}", p.name, from, to);
            events.push(MatchEvent::ArchetypeSwitched { player: p.id, from, to });
        }
    }
}

// ============================================================================
// Level 4 - Utilities
// ============================================================================

/// Player state that combat and fight hooks change, restored when a stalled match is thrown out
struct CombatSnapshot {
    saved: Vec<(f64, f64, FxHashMap<PlayerId, u32>, FxHashMap<PlayerId, u32>)>,
}

impl CombatSnapshot {
    fn take(players: &[Player]) -> Self {
        let saved = players
            .iter()
            .map(|p| (p.skill, p.confidence, p.rivals.clone(), p.fear.clone()))
            .collect();
        Self { saved }
    }

    fn restore(self, players: &mut [Player]) {
        for (p, (skill, confidence, rivals, fear)) in players.iter_mut().zip(self.saved) {
            p.skill = skill;
            p.confidence = confidence;
            p.rivals = rivals;
            p.fear = fear;
        }
    }
}

fn hook_context<'a>(
    config: &'a TournamentConfig,
    match_number: u32,
    rng: &'a mut SimRng,
    events: &'a mut Vec<MatchEvent>,
) -> HookContext<'a> {
    HookContext {
        config,
        match_number,
        rng,
        events,
    }
}

/// Ids of the `n` players with the most points; ties keep player order
fn top_by_points(players: &[Player], n: usize) -> Vec<PlayerId> {
    let mut order: Vec<usize> = (0..players.len()).collect();
    order.sort_by(|&a, &b| players[b].total_points.cmp(&players[a].total_points));
    order.into_iter().take(n).map(|i| players[i].id).collect()
}

fn leaderboard_rows(players: &[Player], n: usize) -> Vec<StandingRow> {
    leaderboard_order(players)
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(idx, i)| {
            let p = &players[i];
            StandingRow {
                player: p.id,
                name: display_name(p),
                rank: idx + 1,
                previous_rank: p.standing.rank,
                points: p.total_points,
                elims: p.total_elims,
                wins: p.wins,
            }
        })
        .collect()
}
