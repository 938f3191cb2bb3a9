//! Targeting and combat resolution
//!
//! Level 3 - Steps (`run_combat`) and Level 4 - weighting utilities
//!
//! Combat works on indices into the match's player slice. The loop picks a weighted attacker
//! and target, asks the extensions and the fight predicate, resolves the fight with a damped
//! roll and repeats until one player is left.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use royale_core::rules::RebootRules;
use royale_core::{pair_mut, register_elim, Player, PlayerId, SimRng};
use rustc_hash::FxHashSet;

use crate::config::TournamentConfig;
use crate::events::MatchEvent;
use crate::extensions::{ExtensionSet, HookContext};

/// Consecutive turns without a resolved fight before a match is declared stalled
pub const MAX_IDLE_TURNS: u32 = 50_000;

/// Smallest weight handed to weighted sampling
const MIN_WEIGHT: f64 = 1.0;

/// Everything combat needs besides the players
pub struct CombatSetup<'a> {
    pub config: &'a TournamentConfig,
    pub extensions: &'a ExtensionSet,
    pub match_number: u32,
    /// Final two matches of the tournament
    pub late_game: bool,
    /// Lobby size, used for the reboot cutoff
    pub lobby_size: usize,
    pub reboot: Option<RebootRules>,
    /// Players whose eliminations are highlighted in the kill feed
    pub highlighted: FxHashSet<PlayerId>,
}

/// Result of running combat to exhaustion
#[derive(Debug, Default)]
pub struct CombatOutcome {
    /// Placement per player index; `None` for players that never entered combat
    pub placements: Vec<Option<u32>>,
    /// Eliminations credited per player index
    pub kills: Vec<u32>,
    /// Index of the last player standing
    pub winner: Option<usize>,
    /// Combat gave up after [`MAX_IDLE_TURNS`] idle turns
    pub stalled: bool,
    pub eliminations: u32,
    pub reboots: u32,
}

// ============================================================================
// Level 3 - Combat loop
// ============================================================================

/// Fight until one player in `alive` remains (Level 3 step)
///
/// `alive` holds indices into `players`; every one of them must have `alive == true`.
/// Placements count down from `alive.len()`.
pub fn run_combat(
    players: &mut [Player],
    mut alive: Vec<usize>,
    setup: &CombatSetup<'_>,
    events: &mut Vec<MatchEvent>,
    rng: &mut SimRng,
) -> CombatOutcome {
    let mut outcome = CombatOutcome {
        placements: vec![None; players.len()],
        kills: vec![0; players.len()],
        ..Default::default()
    };
    let mut tokens: Option<Vec<u32>> = setup
        .reboot
        .map(|r| vec![r.starting_reboots; players.len()]);
    let cutoff = setup.reboot.map_or(0, |r| r.cutoff(setup.lobby_size));
    let mut reboots_enabled = tokens.is_some();
    let mut next_placement = alive.len() as u32;
    let mut idle_turns = 0u32;

    alive.shuffle(rng);

    while alive.len() > 1 {
        if reboots_enabled && alive.len() <= cutoff {
            reboots_enabled = false;
            events.push(MatchEvent::RebootsDisabled { remaining: alive.len() });
        }
        if idle_turns >= MAX_IDLE_TURNS {
            outcome.stalled = true;
            break;
        }

        let attacker = choose_attacker(players, &alive, rng);
        let defender = choose_target(players, attacker, &alive, rng);

        if !players[attacker].alive || !players[defender].alive {
            alive.retain(|&i| players[i].alive);
            continue;
        }

        let allowed = {
            let (a, d) = pair_mut(players, attacker, defender);
            let mut ctx = HookContext {
                config: setup.config,
                match_number: setup.match_number,
                rng: &mut *rng,
                events: &mut *events,
            };
            setup.extensions.fight(a, d, &mut ctx)
        };
        if !allowed || !should_fight(&players[attacker], &players[defender], setup.late_game, rng) {
            idle_turns += 1;
            continue;
        }
        idle_turns = 0;

        let attacker_wins = resolve_fight(&players[attacker], &players[defender], setup.late_game, rng);
        let (winner, loser) = if attacker_wins {
            (attacker, defender)
        } else {
            (defender, attacker)
        };

        {
            let (w, l) = pair_mut(players, winner, loser);
            register_elim(w, l);
        }

        let rebooted = match tokens.as_mut() {
            Some(tokens) => {
                tokens[winner] += 1;
                if reboots_enabled && tokens[loser] > 0 {
                    tokens[loser] -= 1;
                    Some(tokens[loser])
                } else {
                    None
                }
            }
            None => None,
        };

        if let Some(reboots_left) = rebooted {
            let l = &mut players[loser];
            l.confidence = (l.confidence * 0.92).max(0.5);
            outcome.reboots += 1;
            tracing::debug!("{} rebooted ({} left)", l.name, reboots_left);
            events.push(MatchEvent::Rebooted {
                killer: players[winner].id,
                victim: players[loser].id,
                reboots_left,
            });
            continue;
        }

        players[loser].alive = false;
        alive.retain(|&i| i != loser);
        outcome.placements[loser] = Some(next_placement);
        outcome.kills[winner] += 1;
        outcome.eliminations += 1;

        let (killer_id, victim_id) = (players[winner].id, players[loser].id);
        tracing::debug!(
            "{} eliminated {} (placement {})",
            players[winner].name,
            players[loser].name,
            next_placement
        );
        events.push(MatchEvent::Eliminated {
            killer: killer_id,
            victim: victim_id,
            placement: next_placement,
            highlight: setup.highlighted.contains(&killer_id) || setup.highlighted.contains(&victim_id),
        });
        next_placement = next_placement.saturating_sub(1);

        let (l, w) = pair_mut(players, loser, winner);
        let mut ctx = HookContext {
            config: setup.config,
            match_number: setup.match_number,
            rng: &mut *rng,
            events: &mut *events,
        };
        setup.extensions.player_eliminated(l, w, &mut ctx);
    }

    if !outcome.stalled {
        if let [last] = alive[..] {
            outcome.placements[last] = Some(1);
            outcome.winner = Some(last);
        }
    }
    outcome
}

// ============================================================================
// Level 4 - Selection and resolution
// ============================================================================

/// Weighted pick of the attacker among `alive`: skill x (0.7 + risk tolerance)
pub fn choose_attacker<R: Rng + ?Sized>(players: &[Player], alive: &[usize], rng: &mut R) -> usize {
    let weights = alive
        .iter()
        .map(|&i| floor_weight(players[i].skill * (0.7 + players[i].risk_tolerance)));
    weighted_pick(alive, weights, rng)
}

/// Target weight of `target` from `attacker`'s point of view
pub fn target_weight(attacker: &Player, target: &Player) -> f64 {
    let mut w = target.skill;

    if attacker.grief_bias > 0.0 && target.standing.rank < attacker.standing.rank {
        w *= 1.0 + attacker.grief_bias;
    }

    let hatred = attacker.rivalry_against(target.id) as f64;
    w *= 1.0 + hatred * 0.25;

    let fear = attacker.fear_of(target.id) as f64;
    w *= (1.0 - fear * 0.15).max(0.4);

    if target.standing.rank > 50 {
        w *= 0.7;
    }

    floor_weight(w)
}

/// Weighted pick of a target among every other alive player
///
/// With nobody else alive the attacker itself is returned.
pub fn choose_target<R: Rng + ?Sized>(
    players: &[Player],
    attacker: usize,
    alive: &[usize],
    rng: &mut R,
) -> usize {
    let targets: Vec<usize> = alive.iter().copied().filter(|&i| i != attacker).collect();
    if targets.is_empty() {
        return attacker;
    }
    let weights = targets
        .iter()
        .map(|&i| target_weight(&players[attacker], &players[i]));
    weighted_pick(&targets, weights, rng)
}

/// Whether the attacker commits to the fight
pub fn should_fight<R: Rng + ?Sized>(attacker: &Player, defender: &Player, late_game: bool, rng: &mut R) -> bool {
    let ctx = &attacker.standing;

    if defender.skill > attacker.skill + 15.0 {
        return false;
    }
    if attacker.skill > defender.skill + 10.0 {
        return true;
    }
    if late_game && ctx.points_to_first < 50 {
        return rng.gen::<f64>() < 0.8;
    }
    if ctx.safety_margin > 80 && ctx.points_to_first > 50 {
        return rng.gen::<f64>() < 0.4;
    }
    if attacker.confidence > 0.6 {
        return true;
    }
    if attacker.fear_of(defender.id) > 2 {
        return rng.gen::<f64>() < 0.3;
    }
    rng.gen::<f64>() < attacker.risk_tolerance
}

fn fear_dampening(player: &Player, opponent: &Player) -> f64 {
    (1.0 - player.fear_of(opponent.id) as f64 * 0.08).max(0.65)
}

pub fn attack_weight(attacker: &Player, target: &Player, late_game: bool) -> f64 {
    let mut w = attacker.skill * attacker.current_archetype.attack_multiplier();
    w *= 1.0 + attacker.confidence * 0.15;
    w *= fear_dampening(attacker, target);
    if late_game && attacker.skill >= 85.0 {
        w *= 1.1;
    }
    floor_weight(w)
}

pub fn defense_weight(defender: &Player, attacker: &Player) -> f64 {
    let mut w = defender.skill * defender.current_archetype.defense_multiplier();
    w *= 1.0 + defender.confidence * 0.1;
    w *= fear_dampening(defender, attacker);
    floor_weight(w)
}

/// Roll range shrinks as the skill gap grows, never below a quarter
pub fn variance_modifier(a: &Player, b: &Player) -> f64 {
    (1.0 - (a.skill - b.skill).abs() / 100.0).max(0.25)
}

/// `true` when the attacker wins
pub fn resolve_fight<R: Rng + ?Sized>(attacker: &Player, defender: &Player, late_game: bool, rng: &mut R) -> bool {
    let atk = attack_weight(attacker, defender, late_game);
    let def = defense_weight(defender, attacker);
    let win_chance = atk / (atk + def);
    let roll = rng.gen::<f64>() * variance_modifier(attacker, defender);
    roll < win_chance
}

fn floor_weight(w: f64) -> f64 {
    if w.is_finite() {
        w.max(MIN_WEIGHT)
    } else {
        MIN_WEIGHT
    }
}

/// # Panics
/// Panics if `candidates` is empty
fn weighted_pick<R, I>(candidates: &[usize], weights: I, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = f64>,
{
    match WeightedIndex::new(weights) {
        Ok(dist) => candidates[dist.sample(rng)],
        // weights are floored and finite, so only an empty list lands here
        Err(_) => candidates[0],
    }
}
