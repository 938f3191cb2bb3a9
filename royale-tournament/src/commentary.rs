//! Caster commentary and win % projections
//!
//! Line choice is driven by explicit snapshots of the winner, never by state read back off
//! the player after the fact.

use rand::seq::SliceRandom;
use rand::Rng;
use royale_core::{display_name, placement_points, CareerTier, Player, PlayerId};
use serde::{Deserialize, Serialize};

/// Entries shown in a win % ticker
pub const TICKER_SIZE: usize = 6;

/// Players shown in walkouts
pub const WALKOUT_COUNT: usize = 15;

const OPENING_WIN: &[&str] = &[
    "Opens the tournament with a massive statement.",
    "First game. First win. You couldn't script it better.",
    "Sets the tone early. This lobby has been warned.",
    "Coming in hot! {name} steals a win in the first game.",
    "First blood? Nah, first ROYALE. {name} is cooking!",
    "Lobby's still waking up, and they're already winning.",
];

const LAST_GASP_FIRST_WIN: &[&str] = &[
    "Leaves it until the final game and delivers.",
    "First win in the LAST possible moment.",
    "When it mattered most, they showed up.",
    "Saved it for the final game. Ice cold!",
    "{name} just wins in dramatic fashion. Someone cue the music.",
];

const BREAKTHROUGH_WIN: &[&str] = &[
    "Gets the monkey off their back.",
    "Finally breaks through with their first win.",
    "That pressure has been building all tournament.",
    "{name} proves why they're still in the race.",
    "Took a few tries, but they finally cracked it.",
    "Took you long enough, {name}...",
];

const DOUBLE_STREAK: &[&str] = &[
    "Back-to-back wins.",
    "Two games. Two victories. Unreal pace.",
    "Back-to-back! {name} is on FIRE!",
    "Double trouble. They're untouchable!",
];

const TRIPLE_STREAK: &[&str] = &[
    "That's three wins in a row.",
    "Absolute control of the tournament.",
    "This is starting to feel inevitable.",
    "Three games, zero mercy, infinite swagger.",
];

const LONG_STREAK: &[&str] = &[
    "{streak} wins in a row. This is unreal.",
    "Every fight feels unfair.",
    "Historic-level dominance right here.",
    "{streak} in a row. The rest of the lobby is just renting space.",
];

const FINAL_GAME_WIN: &[&str] = &[
    "Closes out the tournament with a huge win.",
    "Final game, final statement.",
    "They saved something special for the end.",
    "That win will be remembered.",
];

const REPEAT_WIN: &[&str] = &[
    "That's win number {wins} of the tournament.",
    "Keeps themselves firmly in the title race.",
    "Consistency like this wins tournaments.",
    "{name} just casually reminds everyone who's boss.",
    "Momentum is officially theirs.",
    "Yup, {name}'s getting nerfed next update.",
];

const LEGEND_LINES: &[&str] = &[
    "This is why their name is etched into history.",
    "That's not luck. That's legacy.",
    "They've done this before. Many times.",
    "Another chapter in an already stacked career.",
];

const GOAT_LINES: &[&str] = &[
    "Different tier. Different rules.",
    "The GOAT does GOAT things.",
    "They make greatness look casual.",
    "They're not chasing history. They *are* history.",
];

const WALKOUT_LINES: &[&str] = &[
    "Domination is key for {name}! Eyes on the prize today, no stopping at 2nd place!",
    "Watch out, {name} is coming in hot. Expect a masterclass in elimination!",
    "The crowd is cheering! {name} is ready to turn this tournament upside down!",
    "All eyes on {name}! Every move counts in this tournament!",
    "They say fortune favors the bold. {name} is ready to prove it!",
    "{name} is ready to snatch the crown. Will anyone stand in their way?",
    "Rumor has it {name} eats elimination points for breakfast!",
    "The LAN gods favor {name}. Will they answer the call?",
    "{name} walks in like royalty. The throne is up for grabs!",
    "RNG, beware! {name} laughs in the face of chance!",
    "Shields? What shields? {name} melts 'em on sight!",
    "Lobby panic mode: {name} just stepped onto the stage!",
    "Lightning in human form: {name} just entered the arena!",
    "Silent but deadly: {name} just entered the battlefield.",
    "Full send or bust. {name} is locked and loaded.",
];

const MVP_QUOTES: &[&str] = &[
    "{name} just proved why they're built different.",
    "{name}: 'I didn't hear no bell.'",
    "{name} carrying the lobby like it's solos.",
    "The crown fits. Always did.",
    "{name} walked so the rest could place 2nd.",
    "{name}: still undefeated in vibes.",
];

/// What the casters know about a match winner when the match ends
#[derive(Clone, Debug, PartialEq)]
pub struct VictorySnapshot {
    pub name: String,
    /// Match wins this tournament, including this one
    pub wins: u32,
    /// Consecutive match wins ending with this one
    pub streak: u32,
    pub match_number: u32,
    pub total_matches: u32,
    pub tier: CareerTier,
}

impl VictorySnapshot {
    pub fn of(winner: &Player, match_number: u32, total_matches: u32) -> Self {
        Self {
            name: winner.name.clone(),
            wins: winner.wins,
            streak: winner.win_streak(),
            match_number,
            total_matches,
            tier: winner.career.tier(),
        }
    }
}

fn pick<R: Rng + ?Sized>(lines: &[&'static str], rng: &mut R) -> &'static str {
    lines.choose(rng).copied().unwrap_or_default()
}

fn fill(line: &str, snapshot: &VictorySnapshot) -> String {
    line.replace("{name}", &snapshot.name)
        .replace("{wins}", &snapshot.wins.to_string())
        .replace("{streak}", &snapshot.streak.to_string())
}

/// Line pool for a snapshot, before any legacy flourish
fn victory_pool(s: &VictorySnapshot) -> &'static [&'static str] {
    let final_match = s.match_number == s.total_matches;
    if s.wins <= 1 {
        if s.match_number == 1 {
            OPENING_WIN
        } else if final_match {
            LAST_GASP_FIRST_WIN
        } else {
            BREAKTHROUGH_WIN
        }
    } else if s.streak >= 2 {
        match s.streak {
            2 => DOUBLE_STREAK,
            3 => TRIPLE_STREAK,
            _ => LONG_STREAK,
        }
    } else if final_match {
        FINAL_GAME_WIN
    } else {
        REPEAT_WIN
    }
}

/// Caster line for a match winner
///
/// Legends and GOATs sometimes get a legacy line, alone or appended.
pub fn victory_commentary<R: Rng + ?Sized>(snapshot: &VictorySnapshot, rng: &mut R) -> String {
    let base = fill(pick(victory_pool(snapshot), rng), snapshot);

    let legacy = match snapshot.tier {
        CareerTier::Goat => Some((GOAT_LINES, 0.35)),
        CareerTier::Legend => Some((LEGEND_LINES, 0.22)),
        _ => None,
    };
    if let Some((lines, chance)) = legacy {
        if rng.gen::<f64>() < chance {
            let line = pick(lines, rng);
            return if rng.gen::<f64>() < 0.5 {
                line.to_string()
            } else {
                format!("{} {}", base, line)
            };
        }
    }
    base
}

// ============================================================================
// Win % ticker
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickerEntry {
    pub player: PlayerId,
    pub name: String,
    /// Win chance in percent, clamped to [0.5, 99.5]
    pub chance: f64,
    pub points: u32,
    pub projected: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WinTicker {
    pub match_number: u32,
    pub total_matches: u32,
    pub remaining: u32,
    pub entries: Vec<TickerEntry>,
}

/// Whether a ticker is due after `match_number`: at halftime and before the final match
pub fn ticker_due(match_number: u32, total_matches: u32) -> bool {
    match_number == total_matches / 2 || match_number + 1 == total_matches
}

/// Points a player is projected to finish on
pub fn projected_points(player: &Player, remaining: u32, elim_points: u32, tag: &str) -> f64 {
    let avg_place = player.average_placement().round() as u32;
    let per_match = placement_points(avg_place, tag) as f64
        + player.average_elims() * elim_points as f64
        + player.confidence * 0.15 * elim_points as f64;
    player.total_points as f64 + per_match * remaining as f64
}

/// Softmax win projection over players with at least one match played
pub fn win_ticker(
    players: &[Player],
    match_number: u32,
    total_matches: u32,
    elim_points: u32,
    tag: &str,
) -> Option<WinTicker> {
    let remaining = total_matches.checked_sub(match_number).filter(|&r| r > 0)?;
    let mut projections: Vec<(f64, &Player)> = players
        .iter()
        .filter(|p| p.matches_played() > 0)
        .map(|p| (projected_points(p, remaining, elim_points, tag), p))
        .collect();
    if projections.is_empty() {
        return None;
    }

    let mean_points =
        projections.iter().map(|(_, p)| p.total_points as f64).sum::<f64>() / projections.len() as f64;
    let scale = (mean_points / 2.0).max(1.0);
    // shifting by the max keeps exp() finite and leaves the softmax unchanged
    let max = projections.iter().map(|(proj, _)| *proj).fold(f64::MIN, f64::max);
    let total: f64 = projections.iter().map(|(proj, _)| ((proj - max) / scale).exp()).sum();

    projections.sort_by(|a, b| b.0.total_cmp(&a.0));
    let entries = projections
        .iter()
        .take(TICKER_SIZE)
        .map(|&(proj, p)| TickerEntry {
            player: p.id,
            name: display_name(p),
            chance: (((proj - max) / scale).exp() / total * 100.0).clamp(0.5, 99.5),
            points: p.total_points,
            projected: proj,
        })
        .collect();

    Some(WinTicker {
        match_number,
        total_matches,
        remaining,
        entries,
    })
}

// ============================================================================
// Walkouts and season MVP
// ============================================================================

/// Hype lines for a sample of the top players, each line used once
pub fn walkout_lines<R: Rng + ?Sized>(players: &[Player], rng: &mut R) -> Vec<(PlayerId, String)> {
    let stars: Vec<&Player> = players
        .iter()
        .filter(|p| (90.0..=113.0).contains(&p.skill))
        .collect();
    let mut lines = WALKOUT_LINES.to_vec();
    lines.shuffle(rng);

    stars
        .choose_multiple(rng, WALKOUT_COUNT)
        .zip(lines)
        .map(|(p, line)| (p.id, line.replace("{name}", &p.name)))
        .collect()
}

pub fn mvp_quote<R: Rng + ?Sized>(champion: &str, rng: &mut R) -> String {
    pick(MVP_QUOTES, rng).replace("{name}", champion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use royale_core::Archetype;

    fn snapshot(wins: u32, streak: u32, match_number: u32, tier: CareerTier) -> VictorySnapshot {
        VictorySnapshot {
            name: "Peterbot".to_string(),
            wins,
            streak,
            match_number,
            total_matches: 6,
            tier,
        }
    }

    #[test]
    fn test_pool_selection() {
        assert_eq!(victory_pool(&snapshot(1, 1, 1, CareerTier::Rookie)), OPENING_WIN);
        assert_eq!(victory_pool(&snapshot(1, 1, 6, CareerTier::Rookie)), LAST_GASP_FIRST_WIN);
        assert_eq!(victory_pool(&snapshot(1, 1, 3, CareerTier::Rookie)), BREAKTHROUGH_WIN);
        assert_eq!(victory_pool(&snapshot(2, 2, 2, CareerTier::Rookie)), DOUBLE_STREAK);
        assert_eq!(victory_pool(&snapshot(3, 3, 3, CareerTier::Rookie)), TRIPLE_STREAK);
        assert_eq!(victory_pool(&snapshot(5, 5, 5, CareerTier::Rookie)), LONG_STREAK);
        // two wins that are not back to back
        assert_eq!(victory_pool(&snapshot(2, 1, 4, CareerTier::Rookie)), REPEAT_WIN);
        assert_eq!(victory_pool(&snapshot(2, 1, 6, CareerTier::Rookie)), FINAL_GAME_WIN);
    }

    #[test]
    fn test_commentary_fills_placeholders() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..50 {
            let line = victory_commentary(&snapshot(4, 4, 4, CareerTier::Rookie), &mut rng);
            assert!(!line.is_empty());
            assert!(!line.contains('{'));
        }
    }

    #[test]
    fn test_goat_gets_legacy_lines() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let legacy = (0..200)
            .map(|_| victory_commentary(&snapshot(2, 1, 4, CareerTier::Goat), &mut rng))
            .filter(|line| GOAT_LINES.iter().any(|g| line.ends_with(g)))
            .count();
        assert!(legacy > 30 && legacy < 120, "legacy lines: {}", legacy);

        let rookie_legacy = (0..200)
            .map(|_| victory_commentary(&snapshot(2, 1, 4, CareerTier::Rookie), &mut rng))
            .filter(|line| GOAT_LINES.iter().chain(LEGEND_LINES).any(|g| line.ends_with(g)))
            .count();
        assert_eq!(rookie_legacy, 0);
    }

    #[test]
    fn test_ticker_schedule() {
        assert!(ticker_due(3, 6));
        assert!(ticker_due(5, 6));
        assert!(!ticker_due(4, 6));
        assert!(!ticker_due(6, 6));
    }

    fn scored(id: u32, placements: &[u32], elims: u32, points: u32) -> Player {
        let mut p = Player::new(id, &format!("P{}", id), 90.0, Archetype::Strategist, "Free Agent");
        for &pl in placements {
            p.add_match_result(pl, 0, 0);
        }
        p.total_elims = elims;
        p.total_points = points;
        p
    }

    #[test]
    fn test_projection() {
        let p = scored(0, &[1, 3], 4, 120);
        // avg placement 2 -> 53, avg elims 2 * 2 = 4, confidence 0
        assert!((projected_points(&p, 3, 2, "CASH_CUP") - (120.0 + 57.0 * 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_win_ticker() {
        let players: Vec<Player> = (0..10)
            .map(|i| scored(i, &[i + 1, i + 1, i + 1], 10 - i, 150 - i * 10))
            .collect();
        let ticker = win_ticker(&players, 3, 6, 2, "CASH_CUP").unwrap();

        assert_eq!(ticker.remaining, 3);
        assert_eq!(ticker.entries.len(), TICKER_SIZE);
        assert_eq!(ticker.entries[0].player, 0);
        assert!(ticker.entries.windows(2).all(|w| w[0].chance >= w[1].chance));
        assert!(ticker.entries.iter().all(|e| (0.5..=99.5).contains(&e.chance)));

        assert!(win_ticker(&players, 6, 6, 2, "CASH_CUP").is_none());
        let fresh = vec![Player::new(0, "New", 80.0, Archetype::Rat, "Free Agent")];
        assert!(win_ticker(&fresh, 1, 6, 2, "CASH_CUP").is_none());
    }

    #[test]
    fn test_walkouts_use_distinct_lines() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let players: Vec<Player> = (0..40)
            .map(|i| Player::new(i, &format!("Star{}", i), 80.0 + i as f64, Archetype::Fragger, "Free Agent"))
            .collect();
        let lines = walkout_lines(&players, &mut rng);

        assert_eq!(lines.len(), WALKOUT_COUNT);
        let stars: Vec<PlayerId> = lines.iter().map(|(id, _)| *id).collect();
        assert!(stars.iter().all(|&id| (10..=33).contains(&id)));
        for (id, line) in &lines {
            assert!(line.contains(&format!("Star{}", id)));
        }
    }

    #[test]
    fn test_mvp_quote_names_champion() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..10 {
            let quote = mvp_quote("Swizzy", &mut rng);
            assert!(!quote.contains("{name}"));
        }
    }
}
