//! Tournament execution - roster, matches, career settlement and season rollup
//!
//! Level 1 - Orchestration and Level 2 - Phases

use chrono::NaiveDate;
use royale_core::{
    build_roster, display_name, leaderboard_order, prize_for_rank, region_pool, Achievement, Archetype,
    CareerBook, CareerTier, Player, PlayerId, Result, SimRng, TournamentType,
};
use serde::{Deserialize, Serialize};

use crate::commentary::{mvp_quote, walkout_lines};
use crate::config::TournamentConfig;
use crate::events::MatchEvent;
use crate::extensions::{ExtensionSet, HookContext};
use crate::match_play::{play_match, MatchOutcome};
use crate::season::{SeasonRecord, SeasonState};

/// Finishes that are logged as career achievements
const ACHIEVEMENT_CUTOFF: u32 = 10;

/// Everything a simulation run reads and mutates besides the players and the rng
pub struct SimContext {
    pub config: TournamentConfig,
    pub season: SeasonState,
    pub extensions: ExtensionSet,
    /// Date stamped on achievements
    pub date: NaiveDate,
}

impl SimContext {
    pub fn new(config: TournamentConfig, date: NaiveDate) -> Self {
        Self {
            config,
            season: SeasonState::default(),
            extensions: ExtensionSet::bundled(),
            date,
        }
    }

    pub fn with_season(mut self, season: SeasonState) -> Self {
        self.season = season;
        self
    }

    pub fn with_extensions(mut self, extensions: ExtensionSet) -> Self {
        self.extensions = extensions;
        self
    }
}

/// Final tournament line for one player
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinalStanding {
    pub rank: u32,
    pub player: PlayerId,
    pub name: String,
    pub display_name: String,
    pub org: String,
    pub archetype: Archetype,
    pub points: u32,
    pub elims: u32,
    pub wins: u32,
    pub average_placement: f64,
    pub earnings: u64,
    /// Career tier after this tournament
    pub tier: CareerTier,
}

/// A season that closed with this tournament
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonEnd {
    pub record: SeasonRecord,
    pub mvp_quote: String,
}

/// Result of a tournament
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentReport {
    pub tournament_type: TournamentType,
    pub label: String,
    pub date: NaiveDate,
    pub season: u32,
    /// Extension notes from the tournament start
    pub opening_notes: Vec<MatchEvent>,
    pub walkouts: Vec<(PlayerId, String)>,
    pub matches: Vec<MatchOutcome>,
    /// Final standings, best first
    pub standings: Vec<FinalStanding>,
    pub season_end: Option<SeasonEnd>,
}

impl TournamentReport {
    pub fn champion(&self) -> Option<&FinalStanding> {
        self.standings.first()
    }

    pub fn top_n(&self, n: usize) -> &[FinalStanding] {
        let n = n.min(self.standings.len());
        &self.standings[..n]
    }

    pub fn standing_for(&self, name: &str) -> Option<&FinalStanding> {
        self.standings.iter().find(|s| s.name == name)
    }

    pub fn completed_matches(&self) -> usize {
        self.matches.iter().filter(|m| m.report().is_some()).count()
    }
}

/// Report plus the updated state handed back to the caller
pub struct TournamentRun {
    pub report: TournamentReport,
    /// Input career book with every entrant's updated stats merged in
    pub careers: CareerBook,
    /// Final player records, in roster order
    pub players: Vec<Player>,
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Run a full tournament (Level 1 orchestration)
///
/// # Arguments
/// * `ctx` - Config, season state, extensions and date; the season is updated in place
/// * `careers` - Career stats loaded from storage, keyed by player name
/// * `rng` - The run's single random source
///
/// # Errors
/// Fails when the configured tournament type or region is unknown.
pub fn run_tournament(ctx: &mut SimContext, careers: &CareerBook, rng: &mut SimRng) -> Result<TournamentRun> {
    run_tournament_observed(ctx, careers, rng, |_| {})
}

/// Like [`run_tournament`], calling `on_match` after every match
pub fn run_tournament_observed<F>(
    ctx: &mut SimContext,
    careers: &CareerBook,
    rng: &mut SimRng,
    mut on_match: F,
) -> Result<TournamentRun>
where
    F: FnMut(&MatchOutcome),
{
    let kind = ctx.config.tournament_type()?;
    tracing::info!(
        "Starting {} with {} players over {} matches",
        kind.label(),
        ctx.config.players,
        ctx.config.matches
    );

    let (mut players, opening_notes) = enter_players(ctx, careers, rng)?;
    let walkouts = if ctx.config.walkouts {
        walkout_lines(&players, rng)
    } else {
        Vec::new()
    };

    let mut matches = Vec::with_capacity(ctx.config.matches as usize);
    let mut match_number = 1;
    while match_number <= ctx.config.matches {
        let outcome = play_match(&mut players, match_number, &ctx.config, &ctx.extensions, rng)?;
        on_match(&outcome);
        matches.push(outcome);
        match_number += 1;
    }

    let standings = settle_careers(&mut players, kind, ctx.date)?;
    for p in players.iter_mut() {
        p.revert_archetype();
    }
    if let Some(champion) = standings.first() {
        tracing::info!("{} champion: {} ({} pts)", kind.label(), champion.name, champion.points);
    }

    let season = ctx.season.current_season;
    let season_end = close_season(&mut ctx.season, &players, rng);

    let mut book = careers.clone();
    for p in &players {
        book.insert(p.name.clone(), p.career.clone());
    }

    Ok(TournamentRun {
        report: TournamentReport {
            tournament_type: kind,
            label: kind.label().to_string(),
            date: ctx.date,
            season,
            opening_notes,
            walkouts,
            matches,
            standings,
            season_end,
        },
        careers: book,
        players,
    })
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

/// Build the lobby, merge in career stats and run the tournament-start hooks
fn enter_players(
    ctx: &SimContext,
    careers: &CareerBook,
    rng: &mut SimRng,
) -> Result<(Vec<Player>, Vec<MatchEvent>)> {
    let pool = region_pool(&ctx.config.region)?;
    let mut players: Vec<Player> = build_roster(&pool, ctx.config.players, rng)
        .into_iter()
        .map(|p| {
            let career = careers.get(&p.name).cloned().unwrap_or_default();
            p.with_career(career)
        })
        .collect();

    let mut notes = Vec::new();
    let mut hook = HookContext {
        config: &ctx.config,
        match_number: 0,
        rng,
        events: &mut notes,
    };
    ctx.extensions.tournament_start(&mut players, &mut hook);
    Ok((players, notes))
}

/// Rank the final lobby and apply career deltas (Level 2 phase)
///
/// Every entrant plays one more tournament, adds their eliminations and prize money and may
/// improve their best finish. Top-10 finishes are logged as achievements and the winner's
/// title is counted in the bucket for `kind`.
pub fn settle_careers(players: &mut [Player], kind: TournamentType, date: NaiveDate) -> Result<Vec<FinalStanding>> {
    let order = leaderboard_order(players);
    let mut standings = Vec::with_capacity(order.len());

    for (idx, &i) in order.iter().enumerate() {
        let rank = idx as u32 + 1;
        let p = &mut players[i];
        let earned = prize_for_rank(rank, p.total_points, kind.tag())?;
        p.tournament_earnings = earned;

        let career = &mut p.career;
        career.tournaments += 1;
        career.kills += p.total_elims;
        career.best_finish = career.best_finish.min(rank);
        career.earnings += earned;
        if rank <= ACHIEVEMENT_CUTOFF {
            career.achievements.push(Achievement {
                placement: rank,
                kind,
                date,
                earnings: earned,
            });
        }
        if rank == 1 {
            career.record_title(kind);
        }

        standings.push(FinalStanding {
            rank,
            player: p.id,
            name: p.name.clone(),
            display_name: display_name(p),
            org: p.org.clone(),
            archetype: p.archetype,
            points: p.total_points,
            elims: p.total_elims,
            wins: p.wins,
            average_placement: p.average_placement(),
            earnings: earned,
            tier: p.career.tier(),
        });
    }
    Ok(standings)
}

/// Add the tournament to the season and roll the season over when it is complete
fn close_season(season: &mut SeasonState, players: &[Player], rng: &mut SimRng) -> Option<SeasonEnd> {
    season.record_tournament(players);
    let record = season.end_season_if_complete()?;
    let mvp_quote = mvp_quote(&record.champion, rng);
    Some(SeasonEnd { record, mvp_quote })
}
