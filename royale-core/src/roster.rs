//! Regional player pools and roster construction

use rand::Rng;

use crate::archetype::Archetype;
use crate::error::{Result, RoyaleError};
use crate::player::{Player, PlayerId};

/// Organization for players without a team
pub const FREE_AGENT: &str = "Free Agent";

/// A pool entry: (name, base skill, archetype tag, organization)
pub type ProEntry = (&'static str, u32, &'static str, &'static str);

const EU_POOL: &[ProEntry] = &[
    ("Swizzy", 110, "Fragger", "Vitality"),
    ("Merstach", 109, "Fragger", "Gentle Mates"),
    ("Kami", 109, "Rat", FREE_AGENT),
    ("Vico", 108, "Fragger", "BIG"),
    ("Tjino", 108, "Aggressive", "HavoK"),
    ("PabloWingu", 108, "Aggressive", "HavoK"),
    ("Chap", 108, "Fragger", FREE_AGENT),
    ("Wox", 107, "Strategist", "HavoK"),
    ("Shxrk", 107, "Fragger", "BIG"),
    ("Pixie", 106, "Fragger", "HavoK"),
    ("t3eny", 106, "Aggressive", FREE_AGENT),
    ("MariusCOW", 105, "Aggressive", "Gentle Mates"),
    ("Flickzy", 105, "Aggressive", FREE_AGENT),
    ("Malibuca", 105, "Strategist", "BIG"),
    ("Vanyak3k", 105, "Passive", "Gentle Mates"),
    ("Scroll", 104, "Strategist", "Atlantic"),
    ("Charyy", 104, "Passive", FREE_AGENT),
    ("Japko", 104, "Fragger", "Falcons"),
    ("IDrop", 104, "Fragger", "HavoK"),
    ("Th0masHD", 103, "Strategist", "Virtus Pro"),
    ("Queasy", 103, "Rat", "Vitality"),
    ("Fredoxie", 103, "Strategist", FREE_AGENT),
    ("Setty", 102, "Passive", FREE_AGENT),
    ("Chico", 101, "Strategist", FREE_AGENT),
    ("MrSavage", 101, "Aggressive", "XSET"),
    ("P1ngfnz", 100, "Fragger", FREE_AGENT),
    ("Sky", 100, "Strategist", "Atlantic"),
    ("Tayson", 100, "Strategist", FREE_AGENT),
    ("Kurama", 99, "Fragger", "Solary"),
    ("Trulex", 98, "Strategist", FREE_AGENT),
    ("Werex", 98, "Strategist", "Lyost"),
    ("Akiira", 97, "Fragger", "Gentle Mates"),
    ("Rezon", 95, "Fragger", "WAVE"),
    ("Seyyto", 94, "Strategist", "K13"),
    ("Demus", 92, "Fragger", "T1"),
    ("Pixx", 90, "Passive", "HavoK"),
    ("Momsy", 89, "Strategist", "Lyost"),
    ("Vadeal", 87, "Passive", "WAVE"),
    ("Andilex", 86, "Fragger", "MGA"),
    ("Skvii", 85, "Strategist", FREE_AGENT),
    ("Huty", 84, "Strategist", "The One"),
    ("Artskill", 84, "Aggressive", FREE_AGENT),
    ("Dela", 83, "Aggressive", FREE_AGENT),
    ("Mongraal", 81, "Aggressive", FREE_AGENT),
    ("Wheat", 80, "Strategist", "FLC"),
    ("Predage", 80, "Passive", FREE_AGENT),
    ("NeFrizi", 79, "Strategist", "Detect"),
    ("JannisZ", 78, "Passive", "CGN"),
    ("S1neD", 78, "Strategist", "NTO Corp"),
    ("Juu", 76, "Strategist", "FataL"),
    ("iFr0zi", 70, "Rat", "MGA"),
];

const NA_POOL: &[ProEntry] = &[
    ("Peterbot", 113, "Fragger", "Falcons"),
    ("Cold", 109, "Aggressive", "Twisted Minds"),
    ("Ajerss", 108, "Fragger", "Gen.G"),
    ("Pollo", 108, "Fragger", "Falcons"),
    ("Higgs", 107, "Aggressive", "XSET"),
    ("Eomzo", 107, "Strategist", "Elite"),
    ("Muz", 106, "Fragger", "XSET"),
    ("Rapid", 106, "Strategist", "Xen"),
    ("Ritual", 105, "Fragger", "Gen.G"),
    ("Boltz", 105, "Aggressive", "Twisted Minds"),
    ("Clix", 104, "Fragger", "XSET"),
    ("Sphinx", 104, "Passive", FREE_AGENT),
    ("Acorn", 103, "Rat", "Twisted Minds"),
    ("Khanada", 103, "Fragger", "Dignitas"),
    ("Cooper", 102, "Fragger", "Dignitas"),
    ("Veno", 102, "Fragger", "XSET"),
    ("Threats", 102, "Aggressive", FREE_AGENT),
    ("Ark", 102, "Fragger", "Dignitas"),
    ("Rise", 101, "Rat", FREE_AGENT),
    ("Bugha", 101, "Strategist", FREE_AGENT),
    ("Josh", 101, "Fragger", FREE_AGENT),
    ("Avivv", 100, "Fragger", "2AM"),
    ("Reet", 100, "Strategist", FREE_AGENT),
    ("Shadow", 100, "Fragger", FREE_AGENT),
    ("Skqttles", 99, "Passive", FREE_AGENT),
    ("VerT", 99, "Strategist", "Void"),
    ("GMoney", 99, "Fragger", "2AM"),
    ("Mero", 95, "Fragger", "Xen"),
    ("EpikWhale", 95, "Strategist", FREE_AGENT),
    ("Bucke", 93, "Strategist", "Dignitas"),
    ("PXMP", 90, "Aggressive", "Elite"),
    ("Noxy", 87, "Passive", FREE_AGENT),
    ("Aminished", 87, "Strategist", "Past Bliss"),
    ("Brycx", 85, "Strategist", FREE_AGENT),
    ("Braydz", 85, "Fragger", FREE_AGENT),
    ("Chimp", 76, "Fragger", "Team Pulsar"),
    ("Channce", 76, "Fragger", "Team Pulsar"),
    ("Curve", 74, "Aggressive", FREE_AGENT),
    ("Deyy", 74, "Aggressive", FREE_AGENT),
    ("Vergo", 73, "Strategist", "Rising Legends"),
    ("Parz", 72, "Passive", FREE_AGENT),
    ("Seek", 72, "Aggressive", FREE_AGENT),
    ("Bacca", 71, "Fragger", FREE_AGENT),
    ("Dash", 70, "Fragger", "REIGN"),
    ("Mason", 70, "Strategist", "Void"),
    ("Kraez", 69, "Aggressive", "Cynapse"),
    ("Paper", 69, "Passive", FREE_AGENT),
    ("Noizy", 62, "Rat", "Monarcos"),
    ("Nekko", 58, "Rat", "Quantum"),
];

/// Short tags shown in front of player names
const ORG_TAGS: &[(&str, &str)] = &[
    ("Gentle Mates", "M8"),
    ("Falcons", "Falcon"),
    ("BIG", "BIG"),
    ("Solary", "Solary"),
    ("HavoK", "HvK"),
    ("Atlantic", "Atlantic"),
    ("Twisted Minds", "Twis"),
    ("XSET", "XSET"),
    ("Wave", "WAVE"),
    ("WAVE", "WAVE"),
    ("MGA", "MGA"),
    ("Detect", "Detect"),
    ("FataL", "FataL"),
    ("NTO Corp", "NTO"),
    ("CGN", "CGN"),
    ("Lyost", "Lyost"),
    ("FLC", "FLC"),
    ("The One", "One"),
];

/// Pool for a region tag (`EU`, `NA` or `MIXED`)
pub fn region_pool(region: &str) -> Result<Vec<ProEntry>> {
    match region.trim().to_ascii_uppercase().as_str() {
        "EU" => Ok(EU_POOL.to_vec()),
        "NA" => Ok(NA_POOL.to_vec()),
        "MIXED" => {
            // strongest of both regions, as seen at LAN events
            let mut pool: Vec<ProEntry> = EU_POOL.iter().chain(NA_POOL).copied().collect();
            pool.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            pool.truncate(EU_POOL.len().max(NA_POOL.len()));
            Ok(pool)
        }
        other => Err(RoyaleError::UnknownRegion(other.to_string())),
    }
}

/// Skill with up to 5% random variance, rounded and floored at 1
fn jittered_skill<R: Rng>(base: f64, rng: &mut R) -> f64 {
    let variance = rng.gen_range(-0.05..=0.05);
    (base * (1.0 + variance)).round().max(1.0)
}

/// Build a fresh lobby of `size` players: pool pros first, then fill players
pub fn build_roster<R: Rng>(pool: &[ProEntry], size: usize, rng: &mut R) -> Vec<Player> {
    let pros = pool.len().min(size);
    let mut players = Vec::with_capacity(size);

    for (i, &(name, skill, arch, org)) in pool.iter().take(pros).enumerate() {
        let skill = jittered_skill(skill as f64, rng);
        players.push(Player::new(i as PlayerId, name, skill, Archetype::from_tag(arch), org));
    }

    for i in pros..size {
        let base = rng.gen_range(1..=75) as f64;
        let skill = jittered_skill(base, rng);
        let name = format!("Fill_{}", i + 1);
        players.push(Player::new(i as PlayerId, &name, skill, Archetype::Strategist, FREE_AGENT));
    }

    players
}

/// Name with the organization tag in front, when the organization has one
pub fn display_name(player: &Player) -> String {
    if player.org == FREE_AGENT {
        return player.name.clone();
    }
    match ORG_TAGS.iter().find(|(org, _)| *org == player.org) {
        Some((_, tag)) => format!("{} {}", tag, player.name),
        None => player.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_region_pools() {
        assert!(!region_pool("EU").unwrap().is_empty());
        assert!(!region_pool("na").unwrap().is_empty());
        let mixed = region_pool("MIXED").unwrap();
        assert_eq!(mixed[0].0, "Peterbot");
        assert!(mixed.windows(2).all(|w| w[0].1 >= w[1].1));
        assert!(matches!(region_pool("OCE"), Err(RoyaleError::UnknownRegion(_))));
    }

    #[test]
    fn test_build_roster_fills_lobby() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let pool = region_pool("EU").unwrap();
        let players = build_roster(&pool, 100, &mut rng);

        assert_eq!(players.len(), 100);
        for (i, p) in players.iter().enumerate() {
            assert_eq!(p.id as usize, i);
            assert!(p.skill >= 1.0);
        }
        assert_eq!(players[pool.len()].name, format!("Fill_{}", pool.len() + 1));
        assert!(players[pool.len()..].iter().all(|p| p.skill <= 79.0));
    }

    #[test]
    fn test_build_roster_variance_is_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let pool = region_pool("NA").unwrap();
        let players = build_roster(&pool, 10, &mut rng);

        assert_eq!(players.len(), 10);
        for (p, entry) in players.iter().zip(pool.iter()) {
            let base = entry.1 as f64;
            assert!((p.skill - base).abs() <= (base * 0.05).ceil());
            assert_eq!(p.skill, p.skill.round());
        }
    }

    #[test]
    fn test_display_name() {
        let p = Player::new(0, "Wox", 107.0, Archetype::Strategist, "HavoK");
        assert_eq!(display_name(&p), "HvK Wox");
        let p = Player::new(1, "Chap", 108.0, Archetype::Fragger, FREE_AGENT);
        assert_eq!(display_name(&p), "Chap");
        let p = Player::new(2, "Ritual", 105.0, Archetype::Fragger, "Gen.G");
        assert_eq!(display_name(&p), "Ritual");
    }
}
