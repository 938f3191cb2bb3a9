//! Points of interest and drop assignment
//!
//! Drops only group players for flavor; they never influence combat.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::player::Player;

const POI_NAMES: [&str; 14] = [
    "Sandy Strip",
    "Latte Landing",
    "Painted Palms",
    "Fore Fields",
    "Classified Canyon",
    "Sus Studios",
    "Lethal Labs",
    "Humble Hills",
    "Bumpy Bay",
    "Tiptop Terrace",
    "Wonkeeland",
    "Battlewood Boulevard",
    "Ripped Tides",
    "Clawsy Lodge",
];

/// A named drop location
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub name: String,
    /// Capacity weight, shared by every mini location
    pub size: u32,
    pub minis: Vec<String>,
}

impl Poi {
    pub fn new(name: &str, size: u32) -> Self {
        let minis = if size > 1 {
            (1..=size).map(|j| format!("{} - Mini-{}", name, j)).collect()
        } else {
            Vec::new()
        };
        Self {
            name: name.to_string(),
            size,
            minis,
        }
    }

    /// The POI and its minis, each with the POI's weight
    pub fn drop_zones(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        std::iter::once(self.name.as_str())
            .chain(self.minis.iter().map(String::as_str))
            .map(move |name| (name, self.size))
    }
}

/// Fresh map for one match. Sizes are drawn from `min_size..=max_size`.
pub fn generate_pois<R: Rng>(count: usize, min_size: u32, max_size: u32, rng: &mut R) -> Vec<Poi> {
    let (lo, hi) = (min_size.min(max_size), min_size.max(max_size));
    (0..count)
        .map(|i| {
            let size = rng.gen_range(lo..=hi);
            Poi::new(POI_NAMES[i % POI_NAMES.len()], size)
        })
        .collect()
}

/// Give every player a weighted random drop and mark them alive for the new match
pub fn assign_drops<R: Rng>(players: &mut [Player], pois: &[Poi], rng: &mut R) {
    let zones: Vec<(&str, u32)> = pois.iter().flat_map(|p| p.drop_zones()).collect();
    let picker = WeightedIndex::new(zones.iter().map(|&(_, size)| size.max(1))).ok();

    for player in players.iter_mut() {
        player.drop_poi = match &picker {
            Some(dist) => zones[dist.sample(rng)].0.to_string(),
            None => String::new(),
        };
        player.alive = true;
    }
}
