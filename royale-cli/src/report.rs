//! Text rendering for match events, standings, tickers and careers
//!
//! Level 4 - Formatting utilities

use royale_core::{top_achievements, CareerStats, PlayerId};
use royale_tournament::{
    AbortReason, FinalStanding, MatchEvent, MatchOutcome, MatchReport, SeasonEnd, SeasonState, StandingRow,
    TournamentReport, WinTicker,
};

/// Leaderboard rows printed after each match
const LEADERBOARD_ROWS: usize = 10;
/// Final standings printed after a tournament
const FINAL_ROWS: usize = 25;
const ACHIEVEMENT_ROWS: usize = 10;

/// Display names by player id for one tournament
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    pub fn from_report(report: &TournamentReport) -> Self {
        let mut names = vec![String::new(); report.standings.len()];
        for s in &report.standings {
            if let Some(slot) = names.get_mut(s.player as usize) {
                *slot = s.display_name.clone();
            }
        }
        Self { names }
    }

    pub fn name(&self, id: PlayerId) -> &str {
        self.names.get(id as usize).map_or("?", String::as_str)
    }
}

// ============================================================================
// Tournament
// ============================================================================

pub fn print_tournament(report: &TournamentReport, quiet: bool) {
    let roster = Roster::from_report(report);

    println!("\n=== {} | Season {} | {} ===", report.label, report.season, report.date);
    if !quiet {
        for note in &report.opening_notes {
            println!("  {}", describe_event(note, &roster));
        }
        for (player, line) in &report.walkouts {
            println!("  WALKOUT {}: {}", roster.name(*player), line);
        }
        for outcome in &report.matches {
            print_match(outcome, &roster);
        }
    }

    print_final_standings(&report.standings, if quiet { LEADERBOARD_ROWS } else { FINAL_ROWS });
    if let Some(end) = &report.season_end {
        print_season_end(end);
    }
}

pub fn print_match(outcome: &MatchOutcome, roster: &Roster) {
    match outcome {
        MatchOutcome::Completed(report) => print_completed_match(report, roster),
        MatchOutcome::Aborted {
            match_number,
            reason,
            events,
        } => {
            println!("\n--- Match {} ---", match_number);
            for event in events {
                println!("  {}", describe_event(event, roster));
            }
            let why = match reason {
                AbortReason::TooFewPlayers { alive } => format!("only {} player(s) made it in", alive),
                AbortReason::Stalled => "nobody would take a fight".to_string(),
            };
            println!("  MATCH ABORTED: {}, no results recorded", why);
        }
    }
}

fn print_completed_match(report: &MatchReport, roster: &Roster) {
    println!("\n--- Match {}/{} ---", report.match_number, report.total_matches);
    if !report.players_to_watch.is_empty() {
        let watch: Vec<&str> = report.players_to_watch.iter().map(|&id| roster.name(id)).collect();
        println!("  Players to watch: {}", watch.join(", "));
    }

    for event in &report.events {
        if is_headline(event) {
            println!("  {}", describe_event(event, roster));
        }
    }

    let kills = report.winner_result().map_or(0, |r| r.kills);
    println!("  VICTORY ROYALE: {} ({} elims)", roster.name(report.winner), kills);
    println!("  \"{}\"", report.commentary);

    print_leaderboard(&report.leaderboard);
    if let Some(ticker) = &report.ticker {
        print_ticker(ticker);
    }
}

/// Events worth a line in the match log. Plain eliminations only show when highlighted.
fn is_headline(event: &MatchEvent) -> bool {
    match event {
        MatchEvent::Eliminated { highlight, .. } => *highlight,
        MatchEvent::Rebooted { .. } => false,
        _ => true,
    }
}

pub fn describe_event(event: &MatchEvent, roster: &Roster) -> String {
    match event {
        MatchEvent::SpawnFailed { player, reason } => format!("{} {}", roster.name(*player), reason.describe()),
        MatchEvent::Forfeited { player, placement } => {
            format!("{} has left the tournament (#{})", roster.name(*player), placement)
        }
        MatchEvent::RebootsDisabled { remaining } => format!("Reboots disabled with {} players left", remaining),
        MatchEvent::Eliminated {
            killer,
            victim,
            placement,
            ..
        } => format!("{} eliminated {} (#{})", roster.name(*killer), roster.name(*victim), placement),
        MatchEvent::Rebooted {
            killer,
            victim,
            reboots_left,
        } => format!(
            "{} knocked {}, who reboots ({} left)",
            roster.name(*killer),
            roster.name(*victim),
            reboots_left
        ),
        MatchEvent::ExtensionNote { extension, text, .. } => format!("[{}] {}", extension, text),
        MatchEvent::ArchetypeSwitched { player, from, to } => {
            format!("{} switches from {} to {}", roster.name(*player), from, to)
        }
    }
}

fn print_leaderboard(rows: &[StandingRow]) {
    println!("  {:>3}  {:<24} {:>5} {:>5} {:>4}", "#", "Player", "Pts", "Elims", "Wins");
    for row in rows.iter().take(LEADERBOARD_ROWS) {
        println!(
            "  {:>3}  {:<24} {:>5} {:>5} {:>4}  {}",
            row.rank,
            row.name,
            row.points,
            row.elims,
            row.wins,
            movement_marker(row.movement())
        );
    }
}

fn movement_marker(movement: i64) -> String {
    match movement {
        0 => "-".to_string(),
        m if m > 0 => format!("+{}", m),
        m => m.to_string(),
    }
}

fn print_ticker(ticker: &WinTicker) {
    println!("  Win % ({} match(es) left):", ticker.remaining);
    for entry in &ticker.entries {
        println!("    {:<24} {:>5.1}%  ({} pts)", entry.name, entry.chance, entry.points);
    }
}

fn print_final_standings(standings: &[FinalStanding], rows: usize) {
    println!("\n=== Final Standings ===");
    println!(
        "{:>3}  {:<24} {:>5} {:>5} {:>4} {:>7} {:>10}  {}",
        "#", "Player", "Pts", "Elims", "Wins", "AvgPl", "Earnings", "Tier"
    );
    for s in standings.iter().take(rows) {
        println!(
            "{:>3}  {:<24} {:>5} {:>5} {:>4} {:>7.1} {:>10}  {}",
            s.rank,
            s.display_name,
            s.points,
            s.elims,
            s.wins,
            s.average_placement,
            format_money(s.earnings),
            s.tier
        );
    }
}

fn print_season_end(end: &SeasonEnd) {
    println!("\n*** SEASON {} COMPLETE ***", end.record.season);
    println!("Season MVP: {}", end.record.champion);
    println!("\"{}\"", end.mvp_quote);
    for (i, (name, line)) in end.record.leaderboard.iter().enumerate() {
        println!(
            "{:>3}  {:<24} {:>10} {:>6} pts {:>3} wins",
            i + 1,
            name,
            format_money(line.earnings),
            line.points,
            line.wins
        );
    }
}

// ============================================================================
// Season and career
// ============================================================================

pub fn print_season(season: &SeasonState, region: &str) {
    println!(
        "=== Season {} ({}) | {}/{} tournaments ({:.0}%) ===",
        season.current_season,
        region,
        season.tournaments_played,
        season.tournaments_per_season,
        season.progress() * 100.0
    );
    for (i, (name, line)) in season.standings().iter().take(FINAL_ROWS).enumerate() {
        println!(
            "{:>3}  {:<24} {:>10} {:>6} pts {:>3} wins {:>4} elims",
            i + 1,
            name,
            format_money(line.earnings),
            line.points,
            line.wins,
            line.elims
        );
    }
    for record in season.history.iter().rev() {
        println!("Season {} champion: {}", record.season, record.champion);
    }
}

pub fn print_career(name: &str, stats: &CareerStats) {
    println!("=== {} ===", name);
    println!("Tier:        {}", stats.tier());
    println!("GOAT index:  {:.1}", stats.goat_index());
    println!("Earnings:    {}", format_money(stats.earnings));
    println!("Tournaments: {}", stats.tournaments);
    println!("Wins:        {} ({} majors)", stats.wins, stats.major_wins());
    println!(
        "  LAN {} | FNCS {} | Elite {} | Cash Cup {} | Reload {} | Victory Cup match wins {}",
        stats.lan_wins,
        stats.fncs_wins,
        stats.elite_series_wins,
        stats.cashcup_wins,
        stats.reload_wins,
        stats.victorycup_wins
    );
    println!("Kills:       {}", stats.kills);
    if stats.tournaments > 0 {
        println!("Best finish: #{}", stats.best_finish);
    }

    let top = top_achievements(stats, ACHIEVEMENT_ROWS);
    if !top.is_empty() {
        println!("Top achievements:");
        for a in top {
            println!(
                "  #{:<3} {:<13} {}  {}",
                a.placement,
                a.kind.label(),
                a.date,
                format_money(a.earnings)
            );
        }
    }
}

/// `$1,234,567`
pub fn format_money(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
