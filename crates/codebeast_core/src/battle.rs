//! Turn loop, targeting, damage and outcome resolution.
//!
//! # Determinism
//!
//! Every decision in this module is a pure function of the battle state:
//! - The actor is the living unit with the highest current speed, ties broken
//!   attacker-first and then by roster slot
//! - The target is the actor's living enemy with the lowest hp, ties broken
//!   by roster slot
//! - No randomness, no clocks, no IO
//!
//! The loop is bounded by [`BattleConfig::turn_cap`], so every battle
//! terminates.
//!
//! # Example
//!
//! ```
//! use codebeast_core::battle::BattleSimulator;
//! use codebeast_core::data::UnitSnapshot;
//! use codebeast_core::result::Outcome;
//!
//! let simulator = BattleSimulator::default();
//! let result = simulator.resolve(
//!     &[UnitSnapshot::new(1, "Voltmoth", 100, 100, 10, 20)],
//!     &[UnitSnapshot::new(2, "Pebble", 10, 5, 5, 10)],
//! );
//! assert_eq!(result.outcome(), Outcome::AttackerWin);
//! assert_eq!(result.total_turns(), 1);
//! ```

use std::cmp::{Ordering, Reverse};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::combatant::{Combatant, CombatantId, Side};
use crate::data::{Matchup, UnitSnapshot};
use crate::passive::PassiveEngine;
use crate::result::{BattleResult, Outcome, Participant, TurnLogEntry};
use crate::state::BattleState;

/// Turn cap used when none is configured.
pub const DEFAULT_TURN_CAP: u32 = 50;

/// Minimum damage floor - every hit deals at least 1 damage.
pub const MIN_DAMAGE: u32 = 1;

/// Battle settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Maximum number of actions before the hp tiebreak decides.
    #[serde(default = "default_turn_cap")]
    pub turn_cap: u32,
}

const fn default_turn_cap() -> u32 {
    DEFAULT_TURN_CAP
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            turn_cap: DEFAULT_TURN_CAP,
        }
    }
}

impl BattleConfig {
    /// Builder method to set the turn cap.
    #[must_use]
    pub const fn with_turn_cap(mut self, turn_cap: u32) -> Self {
        self.turn_cap = turn_cap;
        self
    }
}

/// Damage `attacker` deals to `target` with their current multipliers.
///
/// Formula:
/// ```text
/// raw    = floor(attack × damage_out) - floor(defense × 0.5)
/// damage = max(1, floor(raw × target.damage_in))
/// ```
#[must_use]
pub fn calculate_damage(attacker: &Combatant, target: &Combatant) -> u32 {
    let raw = attacker.effective_attack() - target.mitigation();
    let scaled = (raw as f64 * target.damage_in_multiplier).floor() as i64;
    scaled.clamp(i64::from(MIN_DAMAGE), i64::from(u32::MAX)) as u32
}

/// Pick the next actor: highest speed, then attacker before defender, then
/// lowest roster slot.
#[must_use]
pub fn select_actor(state: &BattleState) -> Option<CombatantId> {
    state
        .living()
        .min_by_key(|c| (Reverse(c.speed), c.side().tiebreak_rank(), c.index()))
        .map(Combatant::id)
}

/// Pick the target for an actor on `side`: lowest hp enemy, then lowest slot.
#[must_use]
pub fn select_target(state: &BattleState, side: Side) -> Option<CombatantId> {
    state
        .living_on(side.opponent())
        .min_by_key(|c| (c.hp(), c.index()))
        .map(Combatant::id)
}

/// Outcome of the state as it stands, treating it as final.
#[must_use]
pub fn decide_outcome(state: &BattleState) -> Outcome {
    let attackers = state.living_count(Side::Attacker);
    let defenders = state.living_count(Side::Defender);
    match (attackers, defenders) {
        (0, 0) => Outcome::Draw,
        (0, _) => Outcome::DefenderWin,
        (_, 0) => Outcome::AttackerWin,
        _ => match state
            .total_hp(Side::Attacker)
            .cmp(&state.total_hp(Side::Defender))
        {
            Ordering::Greater => Outcome::AttackerWin,
            Ordering::Less => Outcome::DefenderWin,
            Ordering::Equal => Outcome::Draw,
        },
    }
}

/// One battle in progress.
///
/// Mirrors a fixed-step simulation: build it, call [`Battle::step`] until it
/// returns `None`, or call [`Battle::finish`] to run it out.
#[derive(Debug)]
pub struct Battle<'e> {
    engine: &'e PassiveEngine,
    config: BattleConfig,
    state: BattleState,
    turn: u32,
    log: Vec<TurnLogEntry>,
}

impl<'e> Battle<'e> {
    /// Assemble the roster, attach passives and fire `on_battle_start`.
    #[must_use]
    pub fn new(
        engine: &'e PassiveEngine,
        attackers: Vec<Combatant>,
        defenders: Vec<Combatant>,
        config: BattleConfig,
    ) -> Self {
        let mut state = BattleState::new(attackers, defenders);
        engine.attach_passives_to_battle_state(&mut state);
        engine.trigger_on_battle_start(&mut state);

        tracing::debug!(
            attackers = state.side(Side::Attacker).count(),
            defenders = state.side(Side::Defender).count(),
            turn_cap = config.turn_cap,
            "Battle started"
        );

        Self {
            engine,
            config,
            state,
            turn: 0,
            log: Vec::new(),
        }
    }

    /// Build a battle straight from roster snapshots.
    #[must_use]
    pub fn from_snapshots(
        engine: &'e PassiveEngine,
        attackers: &[UnitSnapshot],
        defenders: &[UnitSnapshot],
        config: BattleConfig,
    ) -> Self {
        Self::new(
            engine,
            Combatant::roster(Side::Attacker, attackers),
            Combatant::roster(Side::Defender, defenders),
            config,
        )
    }

    /// Turns played so far.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Current battle state.
    #[must_use]
    pub fn state(&self) -> &BattleState {
        &self.state
    }

    /// Actions logged so far.
    #[must_use]
    pub fn log(&self) -> &[TurnLogEntry] {
        &self.log
    }

    /// Check if the turn cap is reached or a side has no living units.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.turn >= self.config.turn_cap
            || self.state.living_count(Side::Attacker) == 0
            || self.state.living_count(Side::Defender) == 0
    }

    /// Play one turn. Returns the new log entry, or `None` once the battle
    /// is over.
    pub fn step(&mut self) -> Option<&TurnLogEntry> {
        if self.is_over() {
            return None;
        }

        let actor_id = select_actor(&self.state)?;
        let actor_speed = self.state.combatant(actor_id)?.speed;

        self.engine.trigger_before_unit_acts(&mut self.state, actor_id);

        let target_id = select_target(&self.state, actor_id.side)?;
        let actor = self.state.combatant(actor_id)?;
        let target = self.state.combatant(target_id)?;
        let damage = calculate_damage(actor, target);
        let actor_participant = Participant::from(actor);

        let target = self.state.combatant_mut(target_id)?;
        target.health.apply_damage(damage);
        let target_hp_after = target.hp();

        let entry = TurnLogEntry {
            turn: self.turn + 1,
            actor: actor_participant,
            target: Participant::from(&*target),
            damage,
            target_hp_after,
            ko: target_hp_after == 0,
            actor_speed,
        };
        tracing::debug!(
            turn = entry.turn,
            actor = %entry.actor.name,
            target = %entry.target.name,
            damage,
            target_hp_after,
            ko = entry.ko,
            "Unit acted"
        );
        self.log.push(entry);

        self.engine
            .trigger_after_unit_acts(&mut self.state, actor_id);
        self.turn += 1;

        #[cfg(feature = "debug-validation")]
        self.validate_invariants();

        self.log.last()
    }

    #[cfg(feature = "debug-validation")]
    fn validate_invariants(&self) {
        debug_assert!(self.turn <= self.config.turn_cap, "turn cap exceeded");
        for combatant in self.state.combatants() {
            debug_assert!(
                combatant.hp() <= combatant.max_hp(),
                "{} above max hp",
                combatant.id()
            );
        }
    }

    /// Run the battle to completion and produce the result.
    #[must_use]
    pub fn finish(mut self) -> BattleResult {
        while self.step().is_some() {}

        let outcome = decide_outcome(&self.state);
        let attacker_survivors = self.state.living_count(Side::Attacker);
        let defender_survivors = self.state.living_count(Side::Defender);

        tracing::info!(
            outcome = ?outcome,
            turns = self.turn,
            attacker_survivors,
            defender_survivors,
            "Battle resolved"
        );

        BattleResult::new(
            outcome,
            self.turn,
            self.log,
            attacker_survivors,
            defender_survivors,
        )
    }
}

/// Entry point for resolving battles against a shared passive engine.
///
/// The engine is read-only, so one simulator (or clones of it) can resolve
/// battles on many threads at once; each call owns its own state.
#[derive(Debug, Clone)]
pub struct BattleSimulator {
    engine: Arc<PassiveEngine>,
    config: BattleConfig,
}

impl Default for BattleSimulator {
    fn default() -> Self {
        Self::new(Arc::new(PassiveEngine::default()))
    }
}

impl BattleSimulator {
    /// Create a simulator with the default configuration.
    #[must_use]
    pub fn new(engine: Arc<PassiveEngine>) -> Self {
        Self {
            engine,
            config: BattleConfig::default(),
        }
    }

    /// Builder method to replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    /// The shared passive engine.
    #[must_use]
    pub fn engine(&self) -> &PassiveEngine {
        &self.engine
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> BattleConfig {
        self.config
    }

    /// Start a battle without running it.
    #[must_use]
    pub fn battle(&self, attackers: &[UnitSnapshot], defenders: &[UnitSnapshot]) -> Battle<'_> {
        Battle::from_snapshots(&self.engine, attackers, defenders, self.config)
    }

    /// Resolve a battle between two rosters.
    #[must_use]
    pub fn resolve(&self, attackers: &[UnitSnapshot], defenders: &[UnitSnapshot]) -> BattleResult {
        self.battle(attackers, defenders).finish()
    }

    /// Resolve a battle between pre-built combatant lists.
    #[must_use]
    pub fn resolve_combatants(
        &self,
        attackers: Vec<Combatant>,
        defenders: Vec<Combatant>,
    ) -> BattleResult {
        Battle::new(&self.engine, attackers, defenders, self.config).finish()
    }

    /// Resolve a matchup using the matchup's own configuration.
    #[must_use]
    pub fn resolve_matchup(&self, matchup: &Matchup) -> BattleResult {
        Battle::from_snapshots(
            &self.engine,
            &matchup.attackers,
            &matchup.defenders,
            matchup.config,
        )
        .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Rarity;

    fn unit(id: u64, hp: u32, attack: u32, defense: u32, speed: u32) -> UnitSnapshot {
        UnitSnapshot::new(id, format!("U{id}"), hp, attack, defense, speed)
    }

    fn state(attackers: &[UnitSnapshot], defenders: &[UnitSnapshot]) -> BattleState {
        BattleState::new(
            Combatant::roster(Side::Attacker, attackers),
            Combatant::roster(Side::Defender, defenders),
        )
    }

    #[test]
    fn test_damage_formula() {
        let s = state(&[unit(1, 100, 30, 10, 10)], &[unit(2, 100, 20, 20, 5)]);
        let a = s.combatant(CombatantId::new(Side::Attacker, 0)).unwrap();
        let d = s.combatant(CombatantId::new(Side::Defender, 0)).unwrap();
        assert_eq!(calculate_damage(a, d), 20);
        assert_eq!(calculate_damage(d, a), 15);
    }

    #[test]
    fn test_damage_floor_of_one() {
        let s = state(&[unit(1, 100, 1, 10, 10)], &[unit(2, 100, 1, 500, 5)]);
        let a = s.combatant(CombatantId::new(Side::Attacker, 0)).unwrap();
        let d = s.combatant(CombatantId::new(Side::Defender, 0)).unwrap();
        assert_eq!(calculate_damage(a, d), MIN_DAMAGE);
    }

    #[test]
    fn test_damage_in_multiplier_floors() {
        let mut s = state(&[unit(1, 100, 31, 10, 10)], &[unit(2, 100, 1, 10, 5)]);
        s.combatant_mut(CombatantId::new(Side::Defender, 0))
            .unwrap()
            .damage_in_multiplier = 0.5;
        let a = s.combatant(CombatantId::new(Side::Attacker, 0)).unwrap();
        let d = s.combatant(CombatantId::new(Side::Defender, 0)).unwrap();
        // raw = 31 - 5 = 26, halved = 13
        assert_eq!(calculate_damage(a, d), 13);
    }

    #[test]
    fn test_actor_order_ties() {
        let s = state(
            &[unit(1, 10, 1, 1, 10), unit(2, 10, 1, 1, 20)],
            &[unit(3, 10, 1, 1, 20)],
        );
        assert_eq!(select_actor(&s), Some(CombatantId::new(Side::Attacker, 1)));

        let s = state(&[unit(1, 10, 1, 1, 10)], &[unit(3, 10, 1, 1, 20), unit(4, 10, 1, 1, 20)]);
        assert_eq!(select_actor(&s), Some(CombatantId::new(Side::Defender, 0)));
    }

    #[test]
    fn test_target_lowest_hp_then_slot() {
        let s = state(
            &[unit(1, 10, 1, 1, 10)],
            &[unit(2, 30, 1, 1, 1), unit(3, 20, 1, 1, 1), unit(4, 20, 1, 1, 1)],
        );
        assert_eq!(
            select_target(&s, Side::Attacker),
            Some(CombatantId::new(Side::Defender, 1))
        );
    }

    #[test]
    fn test_target_skips_dead() {
        let mut s = state(
            &[unit(1, 10, 1, 1, 10)],
            &[unit(2, 5, 1, 1, 1), unit(3, 20, 1, 1, 1)],
        );
        s.combatant_mut(CombatantId::new(Side::Defender, 0))
            .unwrap()
            .health
            .apply_damage(5);
        assert_eq!(
            select_target(&s, Side::Attacker),
            Some(CombatantId::new(Side::Defender, 1))
        );
    }

    #[test]
    fn test_empty_sides_are_pre_eliminated() {
        let sim = BattleSimulator::default();

        let result = sim.resolve(&[], &[unit(1, 10, 1, 1, 1)]);
        assert_eq!(result.outcome(), Outcome::DefenderWin);
        assert_eq!(result.total_turns(), 0);
        assert!(result.turn_log().is_empty());
        assert_eq!(result.defender_survivors(), 1);

        let result = sim.resolve(&[unit(1, 10, 1, 1, 1)], &[]);
        assert_eq!(result.outcome(), Outcome::AttackerWin);

        let result = sim.resolve(&[], &[]);
        assert_eq!(result.outcome(), Outcome::Draw);
        assert_eq!(result.total_turns(), 0);
    }

    #[test]
    fn test_zero_turn_cap_uses_hp_tiebreak() {
        let sim = BattleSimulator::default().with_config(BattleConfig::default().with_turn_cap(0));
        let result = sim.resolve(&[unit(1, 50, 1, 1, 1)], &[unit(2, 40, 1, 1, 1)]);
        assert_eq!(result.total_turns(), 0);
        assert_eq!(result.outcome(), Outcome::AttackerWin);
    }

    #[test]
    fn test_step_api() {
        let engine = PassiveEngine::default();
        let mut battle = Battle::from_snapshots(
            &engine,
            &[unit(1, 100, 30, 10, 30)],
            &[unit(2, 100, 20, 20, 10)],
            BattleConfig::default(),
        );
        let first = battle.step().cloned().unwrap();
        assert_eq!(first.turn, 1);
        assert_eq!(first.actor.side, Side::Attacker);
        assert_eq!(first.damage, 20);
        assert_eq!(first.target_hp_after, 80);
        assert_eq!(battle.turn(), 1);
        assert_eq!(battle.log().len(), 1);
        assert!(!battle.is_over());
    }

    #[test]
    fn test_battle_start_hooks_fire_on_new() {
        let engine = PassiveEngine::default();
        let battle = Battle::from_snapshots(
            &engine,
            &[unit(1, 100, 30, 10, 30).with_rarity(Rarity::Legendary)],
            &[unit(2, 100, 20, 20, 10)],
            BattleConfig::default(),
        );
        let a0 = battle
            .state()
            .combatant(CombatantId::new(Side::Attacker, 0))
            .unwrap();
        assert!((a0.damage_in_multiplier - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_config_defaults_from_ron() {
        let config: BattleConfig = ron::from_str("()").unwrap();
        assert_eq!(config.turn_cap, DEFAULT_TURN_CAP);
        let config: BattleConfig = ron::from_str("(turn_cap: 7)").unwrap();
        assert_eq!(config.turn_cap, 7);
    }
}
