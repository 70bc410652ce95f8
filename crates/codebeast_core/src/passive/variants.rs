//! Built-in passive variants.
//!
//! Each variant is a zero-sized unit struct. Bag entries are prefixed with
//! the variant key.

use crate::combatant::CombatantId;
use crate::data::{Rarity, UnitMeta};
use crate::state::BattleState;

use super::{PassiveAbility, PassiveKind};

/// Outgoing damage multiplier applied for the first action.
pub const TECH_OVERCLOCK_MULTIPLIER: f64 = 1.20;

/// Percentage of max hp restored after every action.
pub const BIO_REGENERATION_PERCENT: u32 = 10;

/// Speed added at battle start.
pub const ARCANE_SURGE_SPEED_BONUS: u32 = 5;

/// Number of the carrier's actions the speed bonus lasts.
pub const ARCANE_SURGE_ACTIONS: i64 = 3;

/// Permanent outgoing damage multiplier.
pub const LEGENDARY_AURA_DAMAGE_OUT: f64 = 1.10;

/// Permanent incoming damage multiplier.
pub const LEGENDARY_AURA_DAMAGE_IN: f64 = 0.90;

const OVERCLOCK_PENDING: &str = "tech_overclock.pending";
const OVERCLOCK_SAVED: &str = "tech_overclock.saved_multiplier";

/// Bag counter holding the hp restored by the most recent regeneration.
pub const BIO_LAST_HEAL: &str = "bio_regeneration.last_heal";
/// Bag counter holding the total hp restored this battle.
pub const BIO_TOTAL_HEALED: &str = "bio_regeneration.total_healed";
/// Bag counter holding how many more actions keep the surge bonus.
pub const ARCANE_REMAINING: &str = "arcane_surge.remaining";

/// Boosts outgoing damage by 20% for the carrier's first action only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TechOverclock;

impl PassiveAbility for TechOverclock {
    fn key(&self) -> &'static str {
        PassiveKind::TechOverclock.key()
    }

    fn applies_to(&self, _unit: &UnitMeta<'_>) -> bool {
        true
    }

    fn on_battle_start(&self, state: &mut BattleState, unit: CombatantId) {
        state.effects_mut(unit).set_flag(OVERCLOCK_PENDING);
    }

    fn before_unit_acts(&self, state: &mut BattleState, unit: CombatantId) {
        if !state.effects_mut(unit).take_flag(OVERCLOCK_PENDING) {
            return;
        }
        let Some(combatant) = state.combatant_mut(unit) else {
            return;
        };
        let before = combatant.damage_out_multiplier;
        combatant.damage_out_multiplier = before * TECH_OVERCLOCK_MULTIPLIER;
        state.effects_mut(unit).save(OVERCLOCK_SAVED, before);
    }

    // Exact restore of the pre-buff multiplier.
    fn after_unit_acts(&self, state: &mut BattleState, unit: CombatantId) {
        let Some(before) = state.effects_mut(unit).restore(OVERCLOCK_SAVED) else {
            return;
        };
        if let Some(combatant) = state.combatant_mut(unit) {
            combatant.damage_out_multiplier = before;
        }
    }
}

/// Restores 10% of max hp after each of the carrier's actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BioRegeneration;

impl PassiveAbility for BioRegeneration {
    fn key(&self) -> &'static str {
        PassiveKind::BioRegeneration.key()
    }

    fn applies_to(&self, _unit: &UnitMeta<'_>) -> bool {
        true
    }

    fn after_unit_acts(&self, state: &mut BattleState, unit: CombatantId) {
        let Some(combatant) = state.combatant_mut(unit) else {
            return;
        };
        if !combatant.is_alive() {
            return;
        }
        let amount =
            (u64::from(combatant.max_hp()) * u64::from(BIO_REGENERATION_PERCENT) / 100) as u32;
        let healed = combatant.health.heal(amount);
        tracing::trace!(unit = %unit, healed, hp = combatant.hp(), "Bio regeneration");

        let bag = state.effects_mut(unit);
        bag.set_counter(BIO_LAST_HEAL, i64::from(healed));
        bag.add_counter(BIO_TOTAL_HEALED, i64::from(healed));
    }
}

/// Adds speed for the carrier's first three actions. Not available to
/// common units.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcaneSurge;

impl PassiveAbility for ArcaneSurge {
    fn key(&self) -> &'static str {
        PassiveKind::ArcaneSurge.key()
    }

    fn applies_to(&self, unit: &UnitMeta<'_>) -> bool {
        unit.rarity != Rarity::Common
    }

    fn on_battle_start(&self, state: &mut BattleState, unit: CombatantId) {
        let Some(combatant) = state.combatant_mut(unit) else {
            return;
        };
        combatant.speed = combatant.speed.saturating_add(ARCANE_SURGE_SPEED_BONUS);
        state
            .effects_mut(unit)
            .set_counter(ARCANE_REMAINING, ARCANE_SURGE_ACTIONS);
    }

    fn after_unit_acts(&self, state: &mut BattleState, unit: CombatantId) {
        let bag = state.effects_mut(unit);
        if bag.counter(ARCANE_REMAINING) <= 0 {
            return;
        }
        if bag.add_counter(ARCANE_REMAINING, -1) > 0 {
            return;
        }
        if let Some(combatant) = state.combatant_mut(unit) {
            combatant.speed = combatant.speed.saturating_sub(ARCANE_SURGE_SPEED_BONUS);
        }
    }
}

/// Permanent +10% damage dealt and -10% damage taken for legendary units.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegendaryAura;

impl PassiveAbility for LegendaryAura {
    fn key(&self) -> &'static str {
        PassiveKind::LegendaryAura.key()
    }

    fn applies_to(&self, unit: &UnitMeta<'_>) -> bool {
        unit.rarity.is_legendary()
    }

    fn on_battle_start(&self, state: &mut BattleState, unit: CombatantId) {
        if let Some(combatant) = state.combatant_mut(unit) {
            combatant.damage_out_multiplier *= LEGENDARY_AURA_DAMAGE_OUT;
            combatant.damage_in_multiplier *= LEGENDARY_AURA_DAMAGE_IN;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{Combatant, Side};
    use crate::data::UnitSnapshot;

    const EPS: f64 = 1e-9;

    fn solo(unit: UnitSnapshot) -> (BattleState, CombatantId) {
        let attackers = Combatant::roster(Side::Attacker, &[unit]);
        let defenders =
            Combatant::roster(Side::Defender, &[UnitSnapshot::new(2, "Dummy", 100, 1, 1, 1)]);
        (
            BattleState::new(attackers, defenders),
            CombatantId::new(Side::Attacker, 0),
        )
    }

    fn out_mult(state: &BattleState, id: CombatantId) -> f64 {
        state.combatant(id).unwrap().damage_out_multiplier
    }

    #[test]
    fn test_overclock_applies_once() {
        let (mut state, id) = solo(UnitSnapshot::new(1, "Volt", 100, 10, 5, 10));
        TechOverclock.on_battle_start(&mut state, id);

        TechOverclock.before_unit_acts(&mut state, id);
        assert!((out_mult(&state, id) - 1.2).abs() < EPS);
        TechOverclock.after_unit_acts(&mut state, id);
        assert_eq!(out_mult(&state, id), 1.0);

        TechOverclock.before_unit_acts(&mut state, id);
        assert!((out_mult(&state, id) - 1.0).abs() < EPS);
        TechOverclock.after_unit_acts(&mut state, id);
        assert!((out_mult(&state, id) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_overclock_without_battle_start_does_nothing() {
        let (mut state, id) = solo(UnitSnapshot::new(1, "Volt", 100, 10, 5, 10));
        TechOverclock.before_unit_acts(&mut state, id);
        assert!((out_mult(&state, id) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_regeneration_heals_and_records() {
        let (mut state, id) = solo(UnitSnapshot::new(1, "Moss", 95, 10, 5, 10));
        state.combatant_mut(id).unwrap().health.apply_damage(30);

        BioRegeneration.after_unit_acts(&mut state, id);
        assert_eq!(state.combatant(id).unwrap().hp(), 74);
        assert_eq!(state.effects(id).unwrap().counter(BIO_LAST_HEAL), 9);

        BioRegeneration.after_unit_acts(&mut state, id);
        BioRegeneration.after_unit_acts(&mut state, id);
        assert_eq!(state.combatant(id).unwrap().hp(), 92);
        BioRegeneration.after_unit_acts(&mut state, id);
        assert_eq!(state.combatant(id).unwrap().hp(), 95);
        let bag = state.effects(id).unwrap();
        assert_eq!(bag.counter(BIO_LAST_HEAL), 3);
        assert_eq!(bag.counter(BIO_TOTAL_HEALED), 30);
    }

    #[test]
    fn test_regeneration_skips_knocked_out_unit() {
        let (mut state, id) = solo(UnitSnapshot::new(1, "Moss", 95, 10, 5, 10));
        state.combatant_mut(id).unwrap().health.apply_damage(200);
        BioRegeneration.after_unit_acts(&mut state, id);
        assert_eq!(state.combatant(id).unwrap().hp(), 0);
        assert!(state.effects(id).is_none());
    }

    #[test]
    fn test_surge_lasts_three_actions() {
        let (mut state, id) =
            solo(UnitSnapshot::new(1, "Rune", 100, 10, 5, 12).with_rarity(Rarity::Rare));
        ArcaneSurge.on_battle_start(&mut state, id);
        assert_eq!(state.combatant(id).unwrap().speed, 17);

        for _ in 0..2 {
            ArcaneSurge.after_unit_acts(&mut state, id);
            assert_eq!(state.combatant(id).unwrap().speed, 17);
        }
        ArcaneSurge.after_unit_acts(&mut state, id);
        assert_eq!(state.combatant(id).unwrap().speed, 12);
        ArcaneSurge.after_unit_acts(&mut state, id);
        assert_eq!(state.combatant(id).unwrap().speed, 12);
    }

    #[test]
    fn test_eligibility() {
        let common = UnitSnapshot::new(1, "a", 1, 1, 1, 1);
        let rare = common.clone().with_rarity(Rarity::Rare);
        let legendary = common.clone().with_rarity(Rarity::Legendary);

        assert!(TechOverclock.applies_to(&common.meta()));
        assert!(BioRegeneration.applies_to(&common.meta()));
        assert!(!ArcaneSurge.applies_to(&common.meta()));
        assert!(ArcaneSurge.applies_to(&rare.meta()));
        assert!(!LegendaryAura.applies_to(&rare.meta()));
        assert!(LegendaryAura.applies_to(&legendary.meta()));
    }

    #[test]
    fn test_aura_stacks_multiplicatively() {
        let (mut state, id) =
            solo(UnitSnapshot::new(1, "Crown", 100, 10, 5, 10).with_rarity(Rarity::Legendary));
        state.combatant_mut(id).unwrap().damage_out_multiplier = 1.5;
        LegendaryAura.on_battle_start(&mut state, id);
        let c = state.combatant(id).unwrap();
        assert!((c.damage_out_multiplier - 1.65).abs() < EPS);
        assert!((c.damage_in_multiplier - 0.9).abs() < EPS);
    }
}
