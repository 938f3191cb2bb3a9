//! Extension hooks ("mods") that perturb a tournament
//!
//! Level 4 - Utilities and configuration
//!
//! Every hook has a no-op default, so an extension only implements the events it cares about.
//! Hooks run in registration order over the enabled extensions only.

use rand::Rng;
use royale_core::{Player, PlayerId, SimRng};

use crate::config::TournamentConfig;
use crate::events::{MatchEvent, SpawnFailure};

/// What a hook can see and touch besides the players themselves
pub struct HookContext<'a> {
    pub config: &'a TournamentConfig,
    /// Current match, 0 before the first one
    pub match_number: u32,
    pub rng: &'a mut SimRng,
    pub events: &'a mut Vec<MatchEvent>,
}

impl HookContext<'_> {
    /// Record a flavor line attributed to an extension
    pub fn note(&mut self, extension: &str, player: PlayerId, text: String) {
        self.events.push(MatchEvent::ExtensionNote {
            extension: extension.to_string(),
            player,
            text,
        });
    }
}

/// A tournament modifier
pub trait Extension {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str {
        ""
    }

    fn on_tournament_start(&self, _players: &mut [Player], _ctx: &mut HookContext<'_>) {}

    fn on_match_start(&self, _players: &mut [Player], _ctx: &mut HookContext<'_>) {}

    /// Return a failure to keep the player out of this match
    fn on_player_spawn(&self, _player: &mut Player, _ctx: &mut HookContext<'_>) -> Option<SpawnFailure> {
        None
    }

    /// Return `false` to veto the fight
    fn on_fight(&self, _attacker: &mut Player, _defender: &mut Player, _ctx: &mut HookContext<'_>) -> bool {
        true
    }

    fn on_player_eliminated(&self, _victim: &mut Player, _killer: &mut Player, _ctx: &mut HookContext<'_>) {}

    fn on_match_end(&self, _players: &mut [Player], _winner: PlayerId, _ctx: &mut HookContext<'_>) {}
}

struct Entry {
    extension: Box<dyn Extension>,
    enabled: bool,
}

/// Registered extensions with their enabled flags
#[derive(Default)]
pub struct ExtensionSet {
    entries: Vec<Entry>,
}

impl ExtensionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every bundled extension, all disabled
    pub fn bundled() -> Self {
        let mut set = Self::new();
        set.register(Box::new(TechnicalIssues::default()), false);
        set.register(Box::new(RageQuit::default()), false);
        set.register(Box::new(ZeroBuildFlashback::default()), false);
        set.register(Box::new(StreamSniped::default()), false);
        set.register(Box::new(PingDifference::default()), false);
        set
    }

    pub fn register(&mut self, extension: Box<dyn Extension>, enabled: bool) {
        self.entries.push(Entry { extension, enabled });
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries
            .iter_mut()
            .find(|e| e.extension.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Enable by name; `false` if no such extension is registered
    pub fn enable(&mut self, name: &str) -> bool {
        self.find_mut(name).map(|e| e.enabled = true).is_some()
    }

    /// Disable by name; `false` if no such extension is registered
    pub fn disable(&mut self, name: &str) -> bool {
        self.find_mut(name).map(|e| e.enabled = false).is_some()
    }

    /// Enable exactly the named extensions. Unknown names are returned.
    pub fn enable_only<S: AsRef<str>>(&mut self, names: &[S]) -> Vec<String> {
        for entry in &mut self.entries {
            entry.enabled = false;
        }
        names
            .iter()
            .filter(|n| !self.enable(n.as_ref()))
            .map(|n| n.as_ref().to_string())
            .collect()
    }

    pub fn enabled_names(&self) -> Vec<&'static str> {
        self.active().map(|e| e.name()).collect()
    }

    /// (name, description, enabled) for every registered extension
    pub fn list(&self) -> Vec<(&'static str, &'static str, bool)> {
        self.entries
            .iter()
            .map(|e| (e.extension.name(), e.extension.description(), e.enabled))
            .collect()
    }

    fn active(&self) -> impl Iterator<Item = &dyn Extension> + '_ {
        self.entries
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.extension.as_ref())
    }

    pub fn tournament_start(&self, players: &mut [Player], ctx: &mut HookContext<'_>) {
        for ext in self.active() {
            ext.on_tournament_start(players, ctx);
        }
    }

    pub fn match_start(&self, players: &mut [Player], ctx: &mut HookContext<'_>) {
        for ext in self.active() {
            ext.on_match_start(players, ctx);
        }
    }

    /// First failure reported wins; later extensions are not asked
    pub fn player_spawn(&self, player: &mut Player, ctx: &mut HookContext<'_>) -> Option<SpawnFailure> {
        self.active().find_map(|ext| ext.on_player_spawn(player, ctx))
    }

    /// Any veto is final; later extensions are not asked
    pub fn fight(&self, attacker: &mut Player, defender: &mut Player, ctx: &mut HookContext<'_>) -> bool {
        self.active().all(|ext| ext.on_fight(attacker, defender, ctx))
    }

    pub fn player_eliminated(&self, victim: &mut Player, killer: &mut Player, ctx: &mut HookContext<'_>) {
        for ext in self.active() {
            ext.on_player_eliminated(victim, killer, ctx);
        }
    }

    pub fn match_end(&self, players: &mut [Player], winner: PlayerId, ctx: &mut HookContext<'_>) {
        for ext in self.active() {
            ext.on_match_end(players, winner, ctx);
        }
    }
}

// ============================================================================
// Bundled extensions
// ============================================================================

/// Players occasionally fail to load in or crash on spawn
pub struct TechnicalIssues {
    pub no_load_chance: f64,
    pub crash_chance: f64,
}

impl Default for TechnicalIssues {
    fn default() -> Self {
        Self {
            no_load_chance: 0.012,
            crash_chance: 0.008,
        }
    }
}

impl Extension for TechnicalIssues {
    fn name(&self) -> &'static str {
        "Technical Issues"
    }

    fn description(&self) -> &'static str {
        "Players may fail to load in or crash before the first fight"
    }

    fn on_player_spawn(&self, player: &mut Player, ctx: &mut HookContext<'_>) -> Option<SpawnFailure> {
        let failure = if ctx.rng.gen::<f64>() < self.no_load_chance {
            SpawnFailure::NoLoad
        } else if ctx.rng.gen::<f64>() < self.crash_chance {
            SpawnFailure::Crash
        } else {
            return None;
        };
        player.alive = false;
        Some(failure)
    }
}

/// A badly beaten, tilted player may leave the tournament for good
pub struct RageQuit {
    /// Confidence at or below which a player is tilted
    pub tilt_threshold: f64,
    /// Placement fraction of the lobby counted as badly beaten
    pub bottom_fraction: f64,
    pub chance: f64,
}

impl Default for RageQuit {
    fn default() -> Self {
        Self {
            tilt_threshold: -0.3,
            bottom_fraction: 0.8,
            chance: 0.05,
        }
    }
}

impl Extension for RageQuit {
    fn name(&self) -> &'static str {
        "Rage Quit"
    }

    fn description(&self) -> &'static str {
        "Tilted players who keep getting sent back to the lobby may forfeit"
    }

    fn on_match_end(&self, players: &mut [Player], winner: PlayerId, ctx: &mut HookContext<'_>) {
        let lobby = players.len() as f64;
        for player in players.iter_mut() {
            if player.id == winner || player.forfeited || player.confidence > self.tilt_threshold {
                continue;
            }
            let badly_beaten = player
                .placements
                .last()
                .map_or(false, |&p| p as f64 > lobby * self.bottom_fraction);
            if badly_beaten && ctx.rng.gen::<f64>() < self.chance {
                player.forfeited = true;
                let text = format!("{} has rage quit and won't play another match", player.name);
                ctx.note(self.name(), player.id, text);
            }
        }
    }
}

/// Rare no-build fights that cripple the attacker
pub struct ZeroBuildFlashback {
    pub chance: f64,
}

impl Default for ZeroBuildFlashback {
    fn default() -> Self {
        Self { chance: 0.03 }
    }
}

impl Extension for ZeroBuildFlashback {
    fn name(&self) -> &'static str {
        "Zero Build Flashback"
    }

    fn description(&self) -> &'static str {
        "Attackers sometimes forget how to build"
    }

    fn on_fight(&self, attacker: &mut Player, defender: &mut Player, ctx: &mut HookContext<'_>) -> bool {
        if ctx.rng.gen::<f64>() < self.chance {
            attacker.skill = (attacker.skill * 0.65).max(1.0);
            defender.skill = (defender.skill * 1.15).min(200.0);
            let text = format!("{} is having Zero Build flashbacks! No build fight!", attacker.name);
            ctx.note(self.name(), attacker.id, text);
        }
        true
    }
}

/// Well-known players get stream sniped, swinging confidence both ways
pub struct StreamSniped {
    pub min_victim_skill: f64,
    pub chance: f64,
}

impl Default for StreamSniped {
    fn default() -> Self {
        Self {
            min_victim_skill: 100.0,
            chance: 0.08,
        }
    }
}

impl Extension for StreamSniped {
    fn name(&self) -> &'static str {
        "Stream Sniped"
    }

    fn description(&self) -> &'static str {
        "Star players can be eliminated by stream snipers"
    }

    fn on_player_eliminated(&self, victim: &mut Player, killer: &mut Player, ctx: &mut HookContext<'_>) {
        if victim.skill >= self.min_victim_skill && ctx.rng.gen::<f64>() < self.chance {
            killer.confidence += 0.25;
            victim.confidence -= 0.35;
            let text = format!("{} just got STREAM-SNIPED by {}!", victim.name, killer.name);
            ctx.note(self.name(), victim.id, text);
        }
    }
}

/// Either fighter may be lagging or have perfect ping
pub struct PingDifference {
    pub bad_ping_chance: f64,
}

impl Default for PingDifference {
    fn default() -> Self {
        Self { bad_ping_chance: 0.22 }
    }
}

impl PingDifference {
    fn roll(&self, player: &mut Player, ctx: &mut HookContext<'_>) {
        if ctx.rng.gen::<f64>() >= self.bad_ping_chance {
            return;
        }
        let text = if ctx.rng.gen::<f64>() < 0.5 {
            player.skill = (player.skill * 0.70).max(1.0);
            format!("{} is teleporting (bad ping disadvantage)!", player.name)
        } else {
            player.skill = (player.skill * 1.18).min(200.0);
            format!("{} has god-ping this fight!", player.name)
        };
        ctx.note(self.name(), player.id, text);
    }
}

impl Extension for PingDifference {
    fn name(&self) -> &'static str {
        "Ping Difference"
    }

    fn description(&self) -> &'static str {
        "Connection quality swings fights"
    }

    fn on_fight(&self, attacker: &mut Player, defender: &mut Player, ctx: &mut HookContext<'_>) -> bool {
        self.roll(attacker, ctx);
        self.roll(defender, ctx);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use royale_core::Archetype;

    fn player(id: PlayerId, skill: f64) -> Player {
        Player::new(id, &format!("P{}", id), skill, Archetype::Strategist, "Free Agent")
    }

    struct Veto;

    impl Extension for Veto {
        fn name(&self) -> &'static str {
            "Veto"
        }

        fn on_fight(&self, _a: &mut Player, _d: &mut Player, _ctx: &mut HookContext<'_>) -> bool {
            false
        }
    }

    #[test]
    fn test_bundled_start_disabled() {
        let set = ExtensionSet::bundled();
        assert_eq!(set.list().len(), 5);
        assert!(set.enabled_names().is_empty());
    }

    #[test]
    fn test_enable_disable_by_name() {
        let mut set = ExtensionSet::bundled();
        assert!(set.enable("ping difference"));
        assert!(set.enable("Rage Quit"));
        assert!(!set.enable("Double Pump"));
        assert_eq!(set.enabled_names(), vec!["Rage Quit", "Ping Difference"]);

        assert!(set.disable("Rage Quit"));
        assert_eq!(set.enabled_names(), vec!["Ping Difference"]);

        let unknown = set.enable_only(&["Stream Sniped", "Lag Switch"]);
        assert_eq!(unknown, vec!["Lag Switch".to_string()]);
        assert_eq!(set.enabled_names(), vec!["Stream Sniped"]);
    }

    #[test]
    fn test_veto_is_authoritative() {
        let mut set = ExtensionSet::new();
        set.register(Box::new(Veto), true);
        set.register(Box::new(ZeroBuildFlashback { chance: 1.0 }), true);

        let config = TournamentConfig::default();
        let mut rng = SimRng::seed_from_u64(3);
        let mut events = Vec::new();
        let mut ctx = HookContext {
            config: &config,
            match_number: 1,
            rng: &mut rng,
            events: &mut events,
        };
        let mut a = player(0, 100.0);
        let mut d = player(1, 100.0);

        assert!(!set.fight(&mut a, &mut d, &mut ctx));
        // later extensions never saw the fight
        assert_eq!(a.skill, 100.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_disabled_extension_is_silent() {
        let mut set = ExtensionSet::new();
        set.register(Box::new(TechnicalIssues { no_load_chance: 1.0, crash_chance: 1.0 }), false);

        let config = TournamentConfig::default();
        let mut rng = SimRng::seed_from_u64(3);
        let mut events = Vec::new();
        let mut ctx = HookContext {
            config: &config,
            match_number: 1,
            rng: &mut rng,
            events: &mut events,
        };
        let mut p = player(0, 80.0);
        assert_eq!(set.player_spawn(&mut p, &mut ctx), None);
        assert!(p.alive);
    }

    #[test]
    fn test_technical_issues_kills_on_spawn() {
        let mut set = ExtensionSet::new();
        set.register(Box::new(TechnicalIssues { no_load_chance: 1.0, crash_chance: 0.0 }), true);

        let config = TournamentConfig::default();
        let mut rng = SimRng::seed_from_u64(3);
        let mut events = Vec::new();
        let mut ctx = HookContext {
            config: &config,
            match_number: 1,
            rng: &mut rng,
            events: &mut events,
        };
        let mut p = player(0, 80.0);
        assert_eq!(set.player_spawn(&mut p, &mut ctx), Some(SpawnFailure::NoLoad));
        assert!(!p.alive);
    }

    #[test]
    fn test_skill_bounds_after_fight_mods() {
        let config = TournamentConfig::default();
        let mut rng = SimRng::seed_from_u64(11);
        let mut events = Vec::new();
        let mut ctx = HookContext {
            config: &config,
            match_number: 2,
            rng: &mut rng,
            events: &mut events,
        };
        let flashback = ZeroBuildFlashback { chance: 1.0 };
        let mut a = player(0, 1.2);
        let mut d = player(1, 190.0);
        assert!(flashback.on_fight(&mut a, &mut d, &mut ctx));
        assert_eq!(a.skill, 1.0);
        assert_eq!(d.skill, 200.0);

        let ping = PingDifference { bad_ping_chance: 1.0 };
        for _ in 0..50 {
            ping.on_fight(&mut a, &mut d, &mut ctx);
            assert!((1.0..=200.0).contains(&a.skill));
            assert!((1.0..=200.0).contains(&d.skill));
        }
    }

    #[test]
    fn test_stream_snipe_swings_confidence() {
        let config = TournamentConfig::default();
        let mut rng = SimRng::seed_from_u64(5);
        let mut events = Vec::new();
        let mut ctx = HookContext {
            config: &config,
            match_number: 1,
            rng: &mut rng,
            events: &mut events,
        };
        let snipe = StreamSniped {
            min_victim_skill: 100.0,
            chance: 1.0,
        };
        let mut victim = player(0, 105.0);
        let mut killer = player(1, 40.0);
        snipe.on_player_eliminated(&mut victim, &mut killer, &mut ctx);
        assert!((victim.confidence + 0.35).abs() < 1e-12);
        assert!((killer.confidence - 0.25).abs() < 1e-12);
        assert_eq!(events.len(), 1);

        let mut low = player(2, 99.0);
        snipe.on_player_eliminated(&mut low, &mut killer, &mut HookContext {
            config: &config,
            match_number: 1,
            rng: &mut rng,
            events: &mut events,
        });
        assert_eq!(low.confidence, 0.0);
    }

    #[test]
    fn test_rage_quit_only_hits_tilted_losers() {
        let config = TournamentConfig::default();
        let mut rng = SimRng::seed_from_u64(5);
        let mut events = Vec::new();
        let mut ctx = HookContext {
            config: &config,
            match_number: 3,
            rng: &mut rng,
            events: &mut events,
        };
        let rage = RageQuit {
            chance: 1.0,
            ..Default::default()
        };
        let mut players: Vec<Player> = (0..10).map(|i| player(i, 50.0)).collect();
        for (i, p) in players.iter_mut().enumerate() {
            p.add_match_result(i as u32 + 1, 0, 0);
        }
        players[9].confidence = -0.5; // placed 10th of 10, tilted
        players[8].confidence = 0.2; // placed 9th, fine
        players[2].confidence = -0.9; // tilted but placed 3rd

        rage.on_match_end(&mut players, 0, &mut ctx);

        assert!(players[9].forfeited);
        assert!(!players[8].forfeited);
        assert!(!players[2].forfeited);
        assert_eq!(events.len(), 1);
    }
}
