//! Structured match and tournament events
//!
//! The simulation never renders anything. Everything a presentation layer may want to show
//! is emitted here as plain serializable data.

use royale_core::{Archetype, PlayerId};
use serde::{Deserialize, Serialize};

/// Why a player never made it into the fight
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpawnFailure {
    NoLoad,
    Crash,
}

impl SpawnFailure {
    pub fn describe(self) -> &'static str {
        match self {
            SpawnFailure::NoLoad => "didn't load in",
            SpawnFailure::Crash => "crashed",
        }
    }
}

/// Something that happened during a match, in order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    /// Player dropped out during spawn and takes a bottom placement
    SpawnFailed { player: PlayerId, reason: SpawnFailure },
    /// Player has left the tournament and takes one of the worst placements
    Forfeited { player: PlayerId, placement: u32 },
    /// Reboot tokens stop working from here on
    RebootsDisabled { remaining: usize },
    Eliminated {
        killer: PlayerId,
        victim: PlayerId,
        placement: u32,
        /// Killer or victim is in the current top five
        highlight: bool,
    },
    /// Loser spent a reboot token and stays in the match
    Rebooted {
        killer: PlayerId,
        victim: PlayerId,
        reboots_left: u32,
    },
    /// Flavor emitted by an extension
    ExtensionNote {
        extension: String,
        player: PlayerId,
        text: String,
    },
    ArchetypeSwitched {
        player: PlayerId,
        from: Archetype,
        to: Archetype,
    },
}

impl MatchEvent {
    /// Whether this event removed a player from the match for good
    pub fn is_elimination(&self) -> bool {
        matches!(self, MatchEvent::Eliminated { .. })
    }
}
