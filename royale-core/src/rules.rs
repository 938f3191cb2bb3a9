//! Scoring rules - placement points, prize tables and the tournament-type catalog
//!
//! Everything here is a pure function of its arguments.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, RoyaleError};

// ============================================================================
// Tournament types
// ============================================================================

/// Tournament type, selecting both the prize table and the placement table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentType {
    CashCup,
    EliteSeries,
    Fncs,
    Lan,
    VictoryCup,
    Reload,
}

pub const TOURNAMENT_TYPES: [TournamentType; 6] = [
    TournamentType::CashCup,
    TournamentType::EliteSeries,
    TournamentType::Fncs,
    TournamentType::Lan,
    TournamentType::VictoryCup,
    TournamentType::Reload,
];

impl TournamentType {
    /// Resolve a configuration tag such as `"CASH_CUP"`
    pub fn from_tag(tag: &str) -> Result<Self> {
        TOURNAMENT_TYPES
            .iter()
            .copied()
            .find(|t| t.tag().eq_ignore_ascii_case(tag.trim()))
            .ok_or_else(|| RoyaleError::UnknownTournamentType(tag.to_string()))
    }

    pub fn tag(self) -> &'static str {
        match self {
            TournamentType::CashCup => "CASH_CUP",
            TournamentType::EliteSeries => "ELITE_SERIES",
            TournamentType::Fncs => "FNCS",
            TournamentType::Lan => "LAN",
            TournamentType::VictoryCup => "VICTORY_CUP",
            TournamentType::Reload => "RELOAD",
        }
    }

    pub fn label(self) -> &'static str {
        self.rules().label
    }

    pub fn rules(self) -> &'static TournamentRules {
        match self {
            TournamentType::CashCup => &CASH_CUP,
            TournamentType::EliteSeries => &ELITE_SERIES,
            TournamentType::Fncs => &FNCS,
            TournamentType::Lan => &LAN,
            TournamentType::VictoryCup => &VICTORY_CUP,
            TournamentType::Reload => &RELOAD,
        }
    }

    /// The next type in catalog order, wrapping around
    pub fn cycle(self) -> Self {
        let idx = TOURNAMENT_TYPES.iter().position(|&t| t == self).unwrap_or(0);
        TOURNAMENT_TYPES[(idx + 1) % TOURNAMENT_TYPES.len()]
    }
}

impl fmt::Display for TournamentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Inclusive rank range paying a fixed prize
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrizeBand {
    pub first: u32,
    pub last: u32,
    pub prize: u64,
}

const fn band(first: u32, last: u32, prize: u64) -> PrizeBand {
    PrizeBand { first, last, prize }
}

/// How a tournament pays out
#[derive(Clone, Copy, Debug)]
pub enum Payout {
    /// Fixed cash per rank range
    Bands(&'static [PrizeBand]),
    /// Only match wins score; money follows total points
    PerPoint { points_per_win: u32, money_per_point: u64 },
}

/// Reboot-on-kill behaviour
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RebootRules {
    /// Tokens each player holds when a match starts
    pub starting_reboots: u32,
    /// Reboots switch off once this fraction of the lobby (rounded up) remains
    pub cutoff_fraction: f64,
}

impl RebootRules {
    pub fn cutoff(&self, lobby_size: usize) -> usize {
        (lobby_size as f64 * self.cutoff_fraction).ceil() as usize
    }
}

/// Static rules for one tournament type
#[derive(Clone, Copy, Debug)]
pub struct TournamentRules {
    pub label: &'static str,
    pub payout: Payout,
    pub points_table: PointsTable,
    pub reboot: Option<RebootRules>,
}

static CASH_CUP_BANDS: [PrizeBand; 15] = [
    band(1, 1, 10_000),
    band(2, 2, 8_000),
    band(3, 3, 6_000),
    band(4, 4, 4_000),
    band(5, 5, 3_250),
    band(6, 6, 2_800),
    band(7, 7, 2_000),
    band(8, 8, 1_500),
    band(9, 9, 1_000),
    band(10, 10, 850),
    band(11, 25, 500),
    band(26, 50, 250),
    band(51, 75, 100),
    band(76, 90, 50),
    band(91, 100, 0),
];

static CASH_CUP: TournamentRules = TournamentRules {
    label: "CASH CUP",
    payout: Payout::Bands(&CASH_CUP_BANDS),
    points_table: PointsTable::Standard,
    reboot: None,
};

static ELITE_SERIES_BANDS: [PrizeBand; 15] = [
    band(1, 1, 40_000),
    band(2, 2, 30_000),
    band(3, 3, 22_500),
    band(4, 4, 16_000),
    band(5, 5, 13_000),
    band(6, 6, 10_500),
    band(7, 7, 8_000),
    band(8, 8, 6_500),
    band(9, 9, 5_000),
    band(10, 10, 4_000),
    band(11, 25, 2_000),
    band(26, 50, 1_000),
    band(51, 75, 500),
    band(76, 90, 250),
    band(91, 100, 0),
];

static ELITE_SERIES: TournamentRules = TournamentRules {
    label: "ELITE SERIES",
    payout: Payout::Bands(&ELITE_SERIES_BANDS),
    points_table: PointsTable::Standard,
    reboot: None,
};

static FNCS_BANDS: [PrizeBand; 15] = [
    band(1, 1, 100_000),
    band(2, 2, 80_000),
    band(3, 3, 60_000),
    band(4, 4, 40_000),
    band(5, 5, 32_500),
    band(6, 6, 28_000),
    band(7, 7, 20_000),
    band(8, 8, 15_000),
    band(9, 9, 10_000),
    band(10, 10, 8_500),
    band(11, 25, 5_000),
    band(26, 50, 2_500),
    band(51, 75, 1_000),
    band(76, 90, 500),
    band(91, 100, 0),
];

static FNCS: TournamentRules = TournamentRules {
    label: "FNCS",
    payout: Payout::Bands(&FNCS_BANDS),
    points_table: PointsTable::Standard,
    reboot: None,
};

static LAN_BANDS: [PrizeBand; 11] = [
    band(1, 1, 250_000),
    band(2, 2, 175_000),
    band(3, 3, 125_000),
    band(4, 4, 100_000),
    band(5, 5, 80_000),
    band(6, 10, 60_000),
    band(11, 20, 40_000),
    band(21, 50, 20_000),
    band(51, 75, 10_000),
    band(76, 90, 5_000),
    band(91, 100, 2_500),
];

static LAN: TournamentRules = TournamentRules {
    label: "LAN EVENT",
    payout: Payout::Bands(&LAN_BANDS),
    points_table: PointsTable::Standard,
    reboot: None,
};

static VICTORY_CUP: TournamentRules = TournamentRules {
    label: "VICTORY CUP",
    payout: Payout::PerPoint {
        points_per_win: 100,
        money_per_point: 4,
    },
    points_table: PointsTable::Standard,
    reboot: None,
};

static RELOAD_BANDS: [PrizeBand; 9] = [
    band(1, 1, 50_000),
    band(2, 2, 35_000),
    band(3, 3, 25_000),
    band(4, 4, 18_000),
    band(5, 5, 14_000),
    band(6, 10, 10_000),
    band(11, 20, 5_000),
    band(21, 30, 2_500),
    band(31, 40, 1_000),
];

static RELOAD: TournamentRules = TournamentRules {
    label: "RELOAD",
    payout: Payout::Bands(&RELOAD_BANDS),
    points_table: PointsTable::Reload,
    reboot: Some(RebootRules {
        starting_reboots: 0,
        cutoff_fraction: 0.5,
    }),
};

// ============================================================================
// Placement points
// ============================================================================

/// Placement -> points mapping
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointsTable {
    /// 1:60, 2:53, 3:49, 4..=49: 51-p, 50:1, beyond: 0
    Standard,
    /// 1:60, 2:50, 3:40, 4:35, 5:30, 6..=10: 32-p, 11..=30: 31-p, beyond: 0
    Reload,
}

impl PointsTable {
    /// Total over every tag: `RELOAD` picks the reboot table, anything else the standard one
    pub fn for_tag(tag: &str) -> Self {
        match TournamentType::from_tag(tag) {
            Ok(kind) => kind.rules().points_table,
            Err(_) => PointsTable::Standard,
        }
    }

    pub fn points(self, placement: u32) -> u32 {
        match self {
            PointsTable::Standard => match placement {
                1 => 60,
                2 => 53,
                3 => 49,
                4..=49 => 51 - placement,
                50 => 1,
                _ => 0,
            },
            PointsTable::Reload => match placement {
                1 => 60,
                2 => 50,
                3 => 40,
                4 => 35,
                5 => 30,
                6..=10 => 32 - placement,
                11..=30 => 31 - placement,
                _ => 0,
            },
        }
    }
}

/// Placement points for a placement under the table selected by `tag`
pub fn placement_points(placement: u32, tag: &str) -> u32 {
    PointsTable::for_tag(tag).points(placement)
}

/// Points a player earns from one match.
///
/// Points-based tournaments give a flat bonus to the match winner and nothing else.
pub fn match_points(placement: u32, kills: u32, elim_points: u32, tag: &str) -> u32 {
    if let Ok(kind) = TournamentType::from_tag(tag) {
        if let Payout::PerPoint { points_per_win, .. } = kind.rules().payout {
            return if placement == 1 { points_per_win } else { 0 };
        }
    }
    placement_points(placement, tag) + kills * elim_points
}

// ============================================================================
// Prizes
// ============================================================================

/// Prize money for a final tournament rank.
///
/// Fails when the tag names no known prize table.
pub fn prize_for_rank(rank: u32, total_points: u32, tag: &str) -> Result<u64> {
    let kind = TournamentType::from_tag(tag)?;
    Ok(match kind.rules().payout {
        Payout::PerPoint { money_per_point, .. } => total_points as u64 * money_per_point,
        Payout::Bands(bands) => bands
            .iter()
            .find(|b| b.first <= rank && rank <= b.last)
            .map(|b| b.prize)
            .unwrap_or(0),
    })
}

/// Check that prize bands are ordered, non-overlapping and cover `1..=lobby_size`
pub fn bands_cover(bands: &[PrizeBand], lobby_size: u32) -> bool {
    let mut next = 1;
    for b in bands {
        if b.first != next || b.last < b.first {
            return false;
        }
        next = b.last + 1;
    }
    next > lobby_size
}

// ============================================================================
// Templates
// ============================================================================

/// Preset configuration for a tournament type
#[derive(Clone, Copy, Debug)]
pub struct TournamentTemplate {
    pub key: &'static str,
    pub label: &'static str,
    pub players: usize,
    pub matches: u32,
    pub storm_circles: u32,
    pub elim_points: u32,
    pub tournament_type: TournamentType,
    pub region: Option<&'static str>,
}

pub const TEMPLATES: [TournamentTemplate; 6] = [
    TournamentTemplate {
        key: "CASH_CUP",
        label: "CASH CUP",
        players: 100,
        matches: 6,
        storm_circles: 12,
        elim_points: 2,
        tournament_type: TournamentType::CashCup,
        region: None,
    },
    TournamentTemplate {
        key: "ELITE_SERIES",
        label: "ELITE SERIES",
        players: 100,
        matches: 8,
        storm_circles: 12,
        elim_points: 3,
        tournament_type: TournamentType::EliteSeries,
        region: None,
    },
    TournamentTemplate {
        key: "FNCS",
        label: "FNCS GRAND FINALS",
        players: 100,
        matches: 12,
        storm_circles: 12,
        elim_points: 3,
        tournament_type: TournamentType::Fncs,
        region: None,
    },
    TournamentTemplate {
        key: "LAN",
        label: "LAN EVENT",
        players: 100,
        matches: 12,
        storm_circles: 12,
        elim_points: 4,
        tournament_type: TournamentType::Lan,
        region: Some("MIXED"),
    },
    TournamentTemplate {
        key: "VICTORY_CUP",
        label: "VICTORY CUP",
        players: 100,
        matches: 4,
        storm_circles: 12,
        elim_points: 0,
        tournament_type: TournamentType::VictoryCup,
        region: None,
    },
    TournamentTemplate {
        key: "RELOAD",
        label: "RELOAD",
        players: 40,
        matches: 8,
        storm_circles: 8,
        elim_points: 2,
        tournament_type: TournamentType::Reload,
        region: None,
    },
];

/// Look up a template by key
pub fn template(key: &str) -> Result<&'static TournamentTemplate> {
    TEMPLATES
        .iter()
        .find(|t| t.key.eq_ignore_ascii_case(key.trim()))
        .ok_or_else(|| RoyaleError::UnknownTemplate(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_values() {
        let t = PointsTable::Standard;
        assert_eq!(t.points(1), 60);
        assert_eq!(t.points(2), 53);
        assert_eq!(t.points(3), 49);
        assert_eq!(t.points(4), 47);
        assert_eq!(t.points(49), 2);
        assert_eq!(t.points(50), 1);
        assert_eq!(t.points(51), 0);
        assert_eq!(t.points(0), 0);
    }

    #[test]
    fn test_reload_table_values() {
        let t = PointsTable::Reload;
        assert_eq!(t.points(1), 60);
        assert_eq!(t.points(2), 50);
        assert_eq!(t.points(5), 30);
        assert_eq!(t.points(6), 26);
        assert_eq!(t.points(10), 22);
        assert_eq!(t.points(11), 20);
        assert_eq!(t.points(30), 1);
        assert_eq!(t.points(31), 0);
    }

    #[test]
    fn test_tables_are_non_increasing() {
        for table in [PointsTable::Standard, PointsTable::Reload] {
            for p in 1..120 {
                assert!(
                    table.points(p) >= table.points(p + 1),
                    "{:?} increases between {} and {}",
                    table,
                    p,
                    p + 1
                );
            }
        }
    }

    #[test]
    fn test_unknown_tag_uses_standard_table() {
        assert_eq!(PointsTable::for_tag("MYSTERY"), PointsTable::Standard);
        assert_eq!(PointsTable::for_tag("reload"), PointsTable::Reload);
        assert_eq!(placement_points(2, "MYSTERY"), 53);
    }

    #[test]
    fn test_match_points() {
        assert_eq!(match_points(1, 2, 2, "CASH_CUP"), 64);
        assert_eq!(match_points(50, 0, 2, "CASH_CUP"), 1);
        assert_eq!(match_points(1, 5, 0, "VICTORY_CUP"), 100);
        assert_eq!(match_points(2, 9, 0, "VICTORY_CUP"), 0);
    }

    #[test]
    fn test_prize_bands_cover_lobbies() {
        for kind in TOURNAMENT_TYPES {
            if let Payout::Bands(bands) = kind.rules().payout {
                let size = TEMPLATES
                    .iter()
                    .find(|t| t.tournament_type == kind)
                    .map(|t| t.players as u32)
                    .unwrap();
                assert!(bands_cover(bands, size), "{} bands leave gaps", kind);
            }
        }
    }

    #[test]
    fn test_prize_for_rank() {
        assert_eq!(prize_for_rank(1, 0, "CASH_CUP").unwrap(), 10_000);
        assert_eq!(prize_for_rank(30, 0, "FNCS").unwrap(), 2_500);
        assert_eq!(prize_for_rank(8, 0, "LAN").unwrap(), 60_000);
        assert_eq!(prize_for_rank(41, 0, "RELOAD").unwrap(), 0);
        assert_eq!(prize_for_rank(3, 250, "VICTORY_CUP").unwrap(), 1_000);
    }

    #[test]
    fn test_prize_total_is_stable() {
        let total = |tag: &str| -> u64 { (1..=100).map(|r| prize_for_rank(r, 0, tag).unwrap()).sum() };
        assert_eq!(total("ELITE_SERIES"), total("ELITE_SERIES"));
        // 39_400 for ranks 1-10, then the five banded ranges
        assert_eq!(total("CASH_CUP"), 39_400 + 7_500 + 6_250 + 2_500 + 750);
    }

    #[test]
    fn test_unknown_prize_table_is_fatal() {
        let err = prize_for_rank(1, 0, "MYSTERY").unwrap_err();
        assert!(matches!(err, RoyaleError::UnknownTournamentType(ref t) if t == "MYSTERY"));
    }

    #[test]
    fn test_reboot_cutoff() {
        let rules = TournamentType::Reload.rules().reboot.unwrap();
        assert_eq!(rules.cutoff(40), 20);
        assert_eq!(rules.cutoff(5), 3);
    }

    #[test]
    fn test_template_lookup() {
        let lan = template("lan").unwrap();
        assert_eq!(lan.region, Some("MIXED"));
        assert_eq!(lan.elim_points, 4);
        assert!(template("SOLO_CUP").is_err());
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(TournamentType::CashCup.cycle(), TournamentType::EliteSeries);
        assert_eq!(TournamentType::Reload.cycle(), TournamentType::CashCup);
    }
}
