//! Passive resolution and hook dispatch.

use std::sync::Arc;

use super::{PassiveAbility, PassiveCatalog, PassiveKind, PassiveRegistry};
use crate::combatant::CombatantId;
use crate::data::UnitMeta;
use crate::error::{BattleError, Result};
use crate::state::BattleState;

/// Fixed sector → default passive table.
///
/// Sectors missing from the table get no default passive.
pub const SECTOR_DEFAULTS: [(&str, PassiveKind); 3] = [
    ("tech", PassiveKind::TechOverclock),
    ("bio", PassiveKind::BioRegeneration),
    ("arcane", PassiveKind::ArcaneSurge),
];

/// Default passive key for a sector, if the sector has one.
#[must_use]
pub fn default_passive_for_sector(sector_key: &str) -> Option<&'static str> {
    SECTOR_DEFAULTS
        .iter()
        .find(|(sector, _)| *sector == sector_key)
        .map(|(_, kind)| kind.key())
}

/// Hook lifecycle phase, used for dispatch and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    BattleStart,
    BeforeAct,
    AfterAct,
}

impl Phase {
    const fn as_str(self) -> &'static str {
        match self {
            Self::BattleStart => "on_battle_start",
            Self::BeforeAct => "before_unit_acts",
            Self::AfterAct => "after_unit_acts",
        }
    }
}

/// Resolves which passives a unit carries and fires their hooks.
///
/// Holds no per-battle state; one engine is shared by every battle.
#[derive(Debug, Clone)]
pub struct PassiveEngine {
    registry: PassiveRegistry,
    catalog: PassiveCatalog,
}

impl Default for PassiveEngine {
    fn default() -> Self {
        Self::new(PassiveRegistry::builtin(), PassiveCatalog::builtin())
    }
}

impl PassiveEngine {
    /// Create an engine over a registry and its display catalog.
    #[must_use]
    pub fn new(registry: PassiveRegistry, catalog: PassiveCatalog) -> Self {
        Self { registry, catalog }
    }

    /// The ability registry.
    #[must_use]
    pub fn registry(&self) -> &PassiveRegistry {
        &self.registry
    }

    /// The display catalog.
    #[must_use]
    pub fn catalog(&self) -> &PassiveCatalog {
        &self.catalog
    }

    /// Look up a registered ability that is eligible for `unit`.
    fn eligible(&self, key: &str, unit: &UnitMeta<'_>) -> Option<Arc<dyn PassiveAbility>> {
        self.registry
            .get(key)
            .filter(|ability| ability.applies_to(unit))
            .cloned()
    }

    /// Check a unit's explicit passive key against the registry.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::UnknownPassive`] if the key is not registered.
    pub fn check_explicit_passive(&self, unit: &UnitMeta<'_>) -> Result<()> {
        match unit.passive_key {
            Some(key) if !self.registry.contains(key) => {
                Err(BattleError::UnknownPassive(key.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Resolve the ordered passive set for a unit.
    ///
    /// 1. An explicit key that is registered and eligible is used.
    /// 2. Otherwise the sector default is used, if eligible. An explicit key
    ///    that is not registered leaves this slot empty instead.
    /// 3. Legendary units get the legendary aura appended, never twice.
    #[must_use]
    pub fn resolve_passives_for_unit(&self, unit: &UnitMeta<'_>) -> Vec<Arc<dyn PassiveAbility>> {
        let mut resolved: Vec<Arc<dyn PassiveAbility>> = Vec::new();

        let primary = if let Err(err) = self.check_explicit_passive(unit) {
            tracing::warn!("{err}; unit fights without it");
            None
        } else {
            unit.passive_key
                .and_then(|key| self.eligible(key, unit))
                .or_else(|| self.sector_default(unit))
        };
        resolved.extend(primary);

        if unit.rarity.is_legendary() {
            let aura = PassiveKind::LegendaryAura.key();
            if !resolved.iter().any(|p| p.key() == aura) {
                resolved.extend(self.eligible(aura, unit));
            }
        }

        resolved
    }

    fn sector_default(&self, unit: &UnitMeta<'_>) -> Option<Arc<dyn PassiveAbility>> {
        default_passive_for_sector(unit.sector_key).and_then(|key| self.eligible(key, unit))
    }

    /// Resolve and store every combatant's passive set.
    ///
    /// Combatants that already have a resolved set are left untouched.
    pub fn attach_passives_to_battle_state(&self, state: &mut BattleState) {
        let ids: Vec<CombatantId> = state.combatants().iter().map(|c| c.id()).collect();
        for id in ids {
            let Some(combatant) = state.combatant_mut(id) else {
                continue;
            };
            let passives = self.resolve_passives_for_unit(&combatant.meta());
            let keys: Vec<&'static str> = passives.iter().map(|p| p.key()).collect();
            if combatant.set_passives(passives) {
                tracing::debug!(
                    unit = %id,
                    name = %combatant.name,
                    passives = ?keys,
                    "Passives attached"
                );
            }
        }
    }

    /// Fire `on_battle_start` for every combatant, attackers first.
    pub fn trigger_on_battle_start(&self, state: &mut BattleState) {
        let ids: Vec<CombatantId> = state.combatants().iter().map(|c| c.id()).collect();
        for id in ids {
            self.dispatch(state, id, Phase::BattleStart);
        }
    }

    /// Fire `before_unit_acts` for one combatant's passives.
    pub fn trigger_before_unit_acts(&self, state: &mut BattleState, unit: CombatantId) {
        self.dispatch(state, unit, Phase::BeforeAct);
    }

    /// Fire `after_unit_acts` for one combatant's passives.
    pub fn trigger_after_unit_acts(&self, state: &mut BattleState, unit: CombatantId) {
        self.dispatch(state, unit, Phase::AfterAct);
    }

    fn dispatch(&self, state: &mut BattleState, unit: CombatantId, phase: Phase) {
        // The set is cloned (cheap Arc bumps) so hooks can borrow the state mutably.
        let Some(passives) = state.combatant(unit).map(|c| c.passives().to_vec()) else {
            let err = BattleError::CombatantNotFound(unit);
            tracing::warn!(phase = phase.as_str(), "{err}; hook skipped");
            return;
        };
        for passive in passives {
            tracing::trace!(
                unit = %unit,
                passive = passive.key(),
                phase = phase.as_str(),
                "Passive hook"
            );
            match phase {
                Phase::BattleStart => passive.on_battle_start(state, unit),
                Phase::BeforeAct => passive.before_unit_acts(state, unit),
                Phase::AfterAct => passive.after_unit_acts(state, unit),
            }
        }
    }

    /// Player-facing description of a unit's resolved passives.
    ///
    /// Entries are joined with `" | "`; an empty string means no passives.
    #[must_use]
    pub fn passive_description(&self, unit: &UnitMeta<'_>) -> String {
        self.resolve_passives_for_unit(unit)
            .iter()
            .map(|p| self.catalog.describe(p.key()))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{Combatant, Side};
    use crate::data::{Rarity, UnitSnapshot};

    fn keys(engine: &PassiveEngine, unit: &UnitSnapshot) -> Vec<&'static str> {
        engine
            .resolve_passives_for_unit(&unit.meta())
            .iter()
            .map(|p| p.key())
            .collect()
    }

    fn base() -> UnitSnapshot {
        UnitSnapshot::new(1, "Unit", 100, 10, 10, 10)
    }

    #[test]
    fn test_sector_default() {
        let engine = PassiveEngine::default();
        assert_eq!(keys(&engine, &base().with_sector("tech")), vec!["tech_overclock"]);
        assert_eq!(keys(&engine, &base().with_sector("bio")), vec!["bio_regeneration"]);
        assert!(keys(&engine, &base().with_sector("ocean")).is_empty());
    }

    #[test]
    fn test_ineligible_sector_default_is_skipped() {
        let engine = PassiveEngine::default();
        assert!(keys(&engine, &base().with_sector("arcane")).is_empty());
        assert_eq!(
            keys(&engine, &base().with_sector("arcane").with_rarity(Rarity::Uncommon)),
            vec!["arcane_surge"]
        );
    }

    #[test]
    fn test_explicit_key_wins_over_sector() {
        let engine = PassiveEngine::default();
        let unit = base().with_sector("tech").with_passive("bio_regeneration");
        assert_eq!(keys(&engine, &unit), vec!["bio_regeneration"]);
    }

    #[test]
    fn test_ineligible_explicit_key_falls_back_to_sector() {
        let engine = PassiveEngine::default();
        let unit = base().with_sector("bio").with_passive("arcane_surge");
        assert_eq!(keys(&engine, &unit), vec!["bio_regeneration"]);
    }

    #[test]
    fn test_unknown_explicit_key_leaves_slot_empty() {
        let engine = PassiveEngine::default();
        let unit = base().with_sector("tech").with_passive("time_warp");
        assert!(keys(&engine, &unit).is_empty());
        assert_eq!(
            engine.check_explicit_passive(&unit.meta()),
            Err(BattleError::UnknownPassive("time_warp".to_string()))
        );
    }

    #[test]
    fn test_legendary_aura_appended_last_once() {
        let engine = PassiveEngine::default();
        let unit = base().with_sector("tech").with_rarity(Rarity::Legendary);
        assert_eq!(keys(&engine, &unit), vec!["tech_overclock", "legendary_aura"]);

        let explicit = base()
            .with_rarity(Rarity::Legendary)
            .with_passive("legendary_aura");
        assert_eq!(keys(&engine, &explicit), vec!["legendary_aura"]);
    }

    #[test]
    fn test_registry_without_aura() {
        let registry = PassiveRegistry::builder()
            .with_kind(PassiveKind::TechOverclock)
            .build()
            .unwrap();
        let engine = PassiveEngine::new(registry, PassiveCatalog::builtin());
        let unit = base().with_sector("tech").with_rarity(Rarity::Legendary);
        assert_eq!(keys(&engine, &unit), vec!["tech_overclock"]);
    }

    #[test]
    fn test_attach_is_idempotent() {
        let engine = PassiveEngine::default();
        let attackers = Combatant::roster(Side::Attacker, &[base().with_sector("bio")]);
        let defenders = Combatant::roster(Side::Defender, &[base()]);
        let mut state = BattleState::new(attackers, defenders);

        engine.attach_passives_to_battle_state(&mut state);
        engine.attach_passives_to_battle_state(&mut state);

        let a0 = state.combatant(CombatantId::new(Side::Attacker, 0)).unwrap();
        assert_eq!(a0.passive_keys(), vec!["bio_regeneration"]);
        let d0 = state.combatant(CombatantId::new(Side::Defender, 0)).unwrap();
        assert!(d0.passives_resolved());
        assert!(d0.passive_keys().is_empty());
    }

    #[test]
    fn test_stacking_order_on_battle_start() {
        let engine = PassiveEngine::default();
        let unit = base()
            .with_sector("arcane")
            .with_rarity(Rarity::Legendary);
        let attackers = Combatant::roster(Side::Attacker, &[unit]);
        let defenders = Combatant::roster(Side::Defender, &[base()]);
        let mut state = BattleState::new(attackers, defenders);
        engine.attach_passives_to_battle_state(&mut state);
        engine.trigger_on_battle_start(&mut state);

        let a0 = state.combatant(CombatantId::new(Side::Attacker, 0)).unwrap();
        assert_eq!(a0.speed, 15);
        assert!((a0.damage_out_multiplier - 1.1).abs() < 1e-9);
        assert!((a0.damage_in_multiplier - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_description() {
        let engine = PassiveEngine::default();
        let unit = base().with_sector("bio").with_rarity(Rarity::Legendary);
        assert_eq!(
            engine.passive_description(&unit.meta()),
            "Bio Regeneration: Recovers 10% of max HP after each of its attacks. | \
             Legendary Aura: Deals 10% more damage and takes 10% less for the whole battle."
        );
        assert_eq!(engine.passive_description(&base().meta()), "");
    }
}
