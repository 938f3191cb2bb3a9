//! Leaderboard ordering

use std::cmp::Ordering;

use crate::player::Player;

/// Composite leaderboard order: points, wins, eliminations (all descending), then lower
/// average placement first. Players equal on every key keep their relative order.
pub fn leaderboard_cmp(a: &Player, b: &Player) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| b.total_elims.cmp(&a.total_elims))
        .then_with(|| a.average_placement().total_cmp(&b.average_placement()))
}

/// Indices into `players` in leaderboard order
pub fn leaderboard_order(players: &[Player]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..players.len()).collect();
    order.sort_by(|&a, &b| leaderboard_cmp(&players[a], &players[b]));
    order
}
