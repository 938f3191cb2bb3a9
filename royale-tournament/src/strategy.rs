//! Strategy engine - standings context, risk posture, confidence and archetype switching
//!
//! Level 3 - Steps

use rand::Rng;
use royale_core::player::NO_PLAYER_BELOW;
use royale_core::{leaderboard_order, Archetype, Player};

/// Earliest match after which a switch may be evaluated
const SWITCH_FROM_MATCH: u32 = 3;
const SWITCH_BASE_CHANCE: f64 = 0.12;
const SWITCH_RAMP_PER_MATCH: f64 = 0.06;
const SWITCH_MAX_CHANCE: f64 = 0.45;

/// Recompute every player's rank and point gaps from the current leaderboard
pub fn update_tournament_context(players: &mut [Player]) {
    let order = leaderboard_order(players);
    let Some(&leader) = order.first() else {
        return;
    };
    let leader_points = players[leader].total_points;
    let points: Vec<u32> = order.iter().map(|&i| players[i].total_points).collect();

    for (idx, &i) in order.iter().enumerate() {
        let own = points[idx];
        let ctx = &mut players[i].standing;
        ctx.rank = idx + 1;
        ctx.points_to_first = leader_points.saturating_sub(own);
        ctx.points_to_above = if idx == 0 { 0 } else { points[idx - 1].saturating_sub(own) };
        ctx.points_to_below = points
            .get(idx + 1)
            .map_or(NO_PLAYER_BELOW, |&below| own.saturating_sub(below));
        ctx.safety_margin = ctx.points_to_below;
    }
}

/// Derive risk tolerance and grief bias from the player's standing and tournament progress
pub fn update_player_strategy(player: &mut Player, match_number: u32, total_matches: u32) {
    let pressure = match_number as f64 / total_matches.max(1) as f64;
    let ctx = &player.standing;
    let mut risk = 0.4;

    if ctx.points_to_first > 40 {
        risk += 0.2;
    }
    if ctx.points_to_first > 0 && ctx.points_to_first <= 30 {
        risk += 0.35;
    }

    if ctx.safety_margin >= 60 {
        player.grief_bias = 0.7;
        risk += 0.15;
    } else if ctx.safety_margin <= 15 {
        player.grief_bias = 0.1;
        risk -= 0.2;
    } else {
        player.grief_bias = 0.3;
    }

    risk += pressure * 0.25;
    player.risk_tolerance = risk.clamp(0.2, 1.0);
}

/// Decay confidence and nudge it by leaderboard percentile
pub fn update_confidence(players: &mut [Player]) {
    let order = leaderboard_order(players);
    let total = order.len() as f64;

    for (idx, &i) in order.iter().enumerate() {
        let percentile = idx as f64 / total;
        let p = &mut players[i];
        p.confidence *= 0.9;

        p.confidence += if percentile < 0.05 {
            0.05
        } else if percentile < 0.15 {
            0.03
        } else if percentile < 0.30 {
            0.015
        } else if percentile > 0.95 {
            -0.06
        } else if percentile > 0.85 {
            -0.035
        } else if percentile > 0.70 {
            -0.02
        } else {
            0.0
        };

        p.confidence = p.confidence.clamp(-1.0, 1.0);
    }
}

/// Placing well below what the player's skill predicts, without the eliminations to show for it
pub fn is_underperforming(player: &Player, match_number: u32) -> bool {
    let played = player.matches_played();
    if match_number < SWITCH_FROM_MATCH || played < SWITCH_FROM_MATCH as usize {
        return false;
    }
    let expected = 50.0 - (player.skill - 80.0);
    player.average_placement() > expected + 12.0 && (player.total_elims as f64) < 1.2 * played as f64
}

/// Switch chance, ramping with matches past the threshold
pub fn switch_chance(match_number: u32) -> f64 {
    let over = match_number.saturating_sub(SWITCH_FROM_MATCH) as f64;
    (SWITCH_BASE_CHANCE + over * SWITCH_RAMP_PER_MATCH).min(SWITCH_MAX_CHANCE)
}

/// Maybe move an underperforming player to the opposite archetype.
///
/// Returns `(from, to)` when a switch happened. A player switches at most once per tournament.
pub fn maybe_switch_archetype<R: Rng + ?Sized>(
    player: &mut Player,
    match_number: u32,
    rng: &mut R,
) -> Option<(Archetype, Archetype)> {
    if player.has_switched_archetype || !is_underperforming(player, match_number) {
        return None;
    }
    if rng.gen::<f64>() > switch_chance(match_number) {
        return None;
    }

    let from = player.current_archetype;
    let to = from.switch_target()?;
    player.current_archetype = to;
    player.has_switched_archetype = true;
    Some((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn player(id: u32, points: u32) -> Player {
        let mut p = Player::new(id, &format!("P{}", id), 90.0, Archetype::Fragger, "Free Agent");
        p.total_points = points;
        p
    }

    #[test]
    fn test_context_gaps() {
        let mut players = vec![player(0, 50), player(1, 120), player(2, 80)];
        update_tournament_context(&mut players);

        let leader = &players[1].standing;
        assert_eq!(leader.rank, 1);
        assert_eq!(leader.points_to_first, 0);
        assert_eq!(leader.points_to_above, 0);
        assert_eq!(leader.points_to_below, 40);
        assert_eq!(leader.safety_margin, 40);

        let middle = &players[2].standing;
        assert_eq!(middle.rank, 2);
        assert_eq!(middle.points_to_first, 40);
        assert_eq!(middle.points_to_above, 40);
        assert_eq!(middle.points_to_below, 30);

        let last = &players[0].standing;
        assert_eq!(last.rank, 3);
        assert_eq!(last.points_to_first, 70);
        assert_eq!(last.points_to_below, NO_PLAYER_BELOW);
        assert_eq!(last.safety_margin, NO_PLAYER_BELOW);
    }

    #[test]
    fn test_context_empty_lobby() {
        let mut players: Vec<Player> = Vec::new();
        update_tournament_context(&mut players);
    }

    #[test]
    fn test_strategy_close_to_lead() {
        let mut p = player(0, 0);
        p.standing.points_to_first = 20;
        p.standing.safety_margin = 30;
        update_player_strategy(&mut p, 3, 6);
        // 0.4 + 0.35 + 0.5 * 0.25
        assert!((p.risk_tolerance - 0.875).abs() < 1e-9);
        assert_eq!(p.grief_bias, 0.3);
    }

    #[test]
    fn test_strategy_safe_leader() {
        let mut p = player(0, 0);
        p.standing.points_to_first = 0;
        p.standing.safety_margin = 999;
        update_player_strategy(&mut p, 1, 6);
        assert_eq!(p.grief_bias, 0.7);
        assert!((p.risk_tolerance - (0.55 + 0.25 / 6.0)).abs() < 1e-9);
    }

    #[test]
    fn test_risk_tolerance_is_clamped() {
        let mut p = player(0, 0);
        p.standing.points_to_first = 0;
        p.standing.safety_margin = 0;
        update_player_strategy(&mut p, 0, 6);
        assert_eq!(p.risk_tolerance, 0.2);
        assert_eq!(p.grief_bias, 0.1);

        p.standing.points_to_first = 45;
        p.standing.safety_margin = 70;
        update_player_strategy(&mut p, 6, 6);
        assert_eq!(p.risk_tolerance, 1.0);
    }

    #[test]
    fn test_confidence_buckets() {
        let mut players: Vec<Player> = (0..100).map(|i| player(i, 1000 - i * 10)).collect();
        update_confidence(&mut players);
        assert!((players[0].confidence - 0.05).abs() < 1e-12);
        assert!((players[10].confidence - 0.03).abs() < 1e-12);
        assert!((players[20].confidence - 0.015).abs() < 1e-12);
        assert_eq!(players[50].confidence, 0.0);
        assert!((players[75].confidence + 0.02).abs() < 1e-12);
        assert!((players[90].confidence + 0.035).abs() < 1e-12);
        assert!((players[99].confidence + 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let mut players = vec![player(0, 10), player(1, 0)];
        players[0].confidence = 1.0;
        players[1].confidence = -1.0;
        for _ in 0..50 {
            update_confidence(&mut players);
            assert!(players.iter().all(|p| (-1.0..=1.0).contains(&p.confidence)));
        }
    }

    fn struggling(skill: f64) -> Player {
        let mut p = Player::new(0, "Slump", skill, Archetype::Fragger, "Free Agent");
        for _ in 0..3 {
            p.add_match_result(80, 0, 0);
        }
        p
    }

    #[test]
    fn test_underperforming() {
        let p = struggling(100.0);
        assert!(!is_underperforming(&p, 2));
        assert!(is_underperforming(&p, 3));

        // a weak player is expected to place badly
        let p = struggling(20.0);
        assert!(!is_underperforming(&p, 3));

        let mut p = struggling(100.0);
        p.total_elims = 4;
        assert!(!is_underperforming(&p, 3));
    }

    #[test]
    fn test_switch_chance_ramp() {
        assert!((switch_chance(3) - 0.12).abs() < 1e-12);
        assert!((switch_chance(5) - 0.24).abs() < 1e-12);
        assert_eq!(switch_chance(20), 0.45);
    }

    #[test]
    fn test_switch_happens_at_most_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut p = struggling(100.0);
        let mut switches = 0;
        for m in 3..40 {
            if let Some((from, to)) = maybe_switch_archetype(&mut p, m, &mut rng) {
                assert_eq!(from, Archetype::Fragger);
                assert_eq!(to, Archetype::Passive);
                switches += 1;
            }
        }
        assert_eq!(switches, 1);
        assert!(p.has_switched_archetype);
    }

    #[test]
    fn test_unclassified_never_switches() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut p = struggling(100.0);
        p.current_archetype = Archetype::Unclassified;
        for m in 3..40 {
            assert_eq!(maybe_switch_archetype(&mut p, m, &mut rng), None);
        }
        assert!(!p.has_switched_archetype);
    }
}
