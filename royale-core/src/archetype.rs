//! Behavioral archetypes and their combat multipliers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Behavioral category influencing combat weighting
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Fragger,
    Passive,
    Strategist,
    Aggressive,
    Rat,
    /// Tag that did not match any known archetype. Every multiplier is neutral.
    #[serde(other)]
    Unclassified,
}

/// All archetypes a roster entry can carry
pub const ARCHETYPES: [Archetype; 5] = [
    Archetype::Fragger,
    Archetype::Passive,
    Archetype::Strategist,
    Archetype::Aggressive,
    Archetype::Rat,
];

impl Archetype {
    /// Parse a tag, mapping anything unknown to `Unclassified`
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "fragger" => Archetype::Fragger,
            "passive" => Archetype::Passive,
            "strategist" => Archetype::Strategist,
            "aggressive" => Archetype::Aggressive,
            "rat" => Archetype::Rat,
            _ => Archetype::Unclassified,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Archetype::Fragger => "Fragger",
            Archetype::Passive => "Passive",
            Archetype::Strategist => "Strategist",
            Archetype::Aggressive => "Aggressive",
            Archetype::Rat => "Rat",
            Archetype::Unclassified => "Unclassified",
        }
    }

    /// Offensive multiplier applied to skill when this player attacks
    pub fn attack_multiplier(self) -> f64 {
        match self {
            Archetype::Fragger => 1.2,
            Archetype::Aggressive => 1.35,
            Archetype::Passive => 0.8,
            _ => 1.0,
        }
    }

    /// Defensive multiplier applied to skill when this player is attacked
    pub fn defense_multiplier(self) -> f64 {
        match self {
            Archetype::Passive => 1.1,
            Archetype::Aggressive => 0.9,
            _ => 1.0,
        }
    }

    /// Archetype an underperforming player flips to. `None` means no switch exists.
    pub fn switch_target(self) -> Option<Archetype> {
        match self {
            Archetype::Aggressive => Some(Archetype::Strategist),
            Archetype::Fragger => Some(Archetype::Passive),
            Archetype::Passive => Some(Archetype::Aggressive),
            Archetype::Strategist => Some(Archetype::Fragger),
            Archetype::Rat => Some(Archetype::Aggressive),
            Archetype::Unclassified => None,
        }
    }
}

impl Default for Archetype {
    fn default() -> Self {
        Archetype::Strategist
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Archetype {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Archetype::from_tag(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tag_is_neutral() {
        let arch = Archetype::from_tag("Camper");
        assert_eq!(arch, Archetype::Unclassified);
        assert_eq!(arch.attack_multiplier(), 1.0);
        assert_eq!(arch.defense_multiplier(), 1.0);
        assert_eq!(arch.switch_target(), None);
    }

    #[test]
    fn test_tags_are_case_insensitive() {
        assert_eq!(Archetype::from_tag("fragger"), Archetype::Fragger);
        assert_eq!(Archetype::from_tag(" RAT "), Archetype::Rat);
        assert_eq!("Aggressive".parse::<Archetype>().unwrap(), Archetype::Aggressive);
    }

    #[test]
    fn test_switch_map() {
        assert_eq!(Archetype::Aggressive.switch_target(), Some(Archetype::Strategist));
        assert_eq!(Archetype::Strategist.switch_target(), Some(Archetype::Fragger));
        assert_eq!(Archetype::Fragger.switch_target(), Some(Archetype::Passive));
        assert_eq!(Archetype::Passive.switch_target(), Some(Archetype::Aggressive));
        assert_eq!(Archetype::Rat.switch_target(), Some(Archetype::Aggressive));
    }

    #[test]
    fn test_unknown_tag_deserializes() {
        let arch: Archetype = serde_json::from_str("\"Sniper\"").unwrap();
        assert_eq!(arch, Archetype::Unclassified);
    }
}
