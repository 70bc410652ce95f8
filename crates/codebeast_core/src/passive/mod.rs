//! Passive abilities and the hooks they plug into.
//!
//! A passive is a stateless rule object. It decides once, before the battle,
//! whether it applies to a unit, and afterwards only reacts to lifecycle
//! hooks:
//!
//! ```text
//! on_battle_start ─┬─> before_unit_acts ─> (attack) ─> after_unit_acts ─┐
//!                  └───────────────────────── next turn <───────────────┘
//! ```
//!
//! Everything a passive needs to remember between hooks goes into the
//! battle's [`EffectBag`](crate::state::EffectBag) for that unit, so one
//! instance can be shared by every unit and every concurrent battle.

mod catalog;
mod engine;
mod registry;
mod variants;

use std::fmt;
use std::sync::Arc;

use crate::combatant::CombatantId;
use crate::data::UnitMeta;
use crate::state::BattleState;

pub use catalog::{PassiveCatalog, PassiveInfo};
pub use engine::{default_passive_for_sector, PassiveEngine, SECTOR_DEFAULTS};
pub use registry::{PassiveRegistry, PassiveRegistryBuilder};
pub use variants::{
    ArcaneSurge, BioRegeneration, LegendaryAura, TechOverclock, ARCANE_REMAINING,
    ARCANE_SURGE_ACTIONS, ARCANE_SURGE_SPEED_BONUS, BIO_LAST_HEAL, BIO_REGENERATION_PERCENT,
    BIO_TOTAL_HEALED, LEGENDARY_AURA_DAMAGE_IN, LEGENDARY_AURA_DAMAGE_OUT,
    TECH_OVERCLOCK_MULTIPLIER,
};

/// Capability every passive ability implements.
///
/// Hooks default to doing nothing, so a variant only overrides the phases it
/// cares about. Implementations must be deterministic and must not keep any
/// per-battle state in `self`.
pub trait PassiveAbility: Send + Sync + fmt::Debug {
    /// Stable string identifier, used by rosters and the registry.
    fn key(&self) -> &'static str;

    /// Eligibility predicate over persistent unit attributes.
    fn applies_to(&self, unit: &UnitMeta<'_>) -> bool;

    /// Called once for every carrier after all passives are attached.
    fn on_battle_start(&self, _state: &mut BattleState, _unit: CombatantId) {}

    /// Called right before the carrier picks a target and attacks.
    fn before_unit_acts(&self, _state: &mut BattleState, _unit: CombatantId) {}

    /// Called right after the carrier's attack has been applied and logged.
    fn after_unit_acts(&self, _state: &mut BattleState, _unit: CombatantId) {}
}

/// The closed set of built-in passive variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PassiveKind {
    /// One-shot damage boost on the first action.
    TechOverclock,
    /// Self-heal after every action.
    BioRegeneration,
    /// Temporary speed bonus for the first few actions.
    ArcaneSurge,
    /// Permanent damage dealt/taken multipliers for legendary units.
    LegendaryAura,
}

impl PassiveKind {
    /// Every built-in variant, in registration order.
    pub const ALL: [PassiveKind; 4] = [
        PassiveKind::TechOverclock,
        PassiveKind::BioRegeneration,
        PassiveKind::ArcaneSurge,
        PassiveKind::LegendaryAura,
    ];

    /// Registry key of this variant.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::TechOverclock => "tech_overclock",
            Self::BioRegeneration => "bio_regeneration",
            Self::ArcaneSurge => "arcane_surge",
            Self::LegendaryAura => "legendary_aura",
        }
    }

    /// Look a variant up by registry key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Create the shared instance for this variant.
    #[must_use]
    pub fn instance(self) -> Arc<dyn PassiveAbility> {
        match self {
            Self::TechOverclock => Arc::new(TechOverclock),
            Self::BioRegeneration => Arc::new(BioRegeneration),
            Self::ArcaneSurge => Arc::new(ArcaneSurge),
            Self::LegendaryAura => Arc::new(LegendaryAura),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passive_ability_is_object_safe() {
        fn _accepts_boxed(_passive: Box<dyn PassiveAbility>) {}
        fn _accepts_slice(_passives: &[Arc<dyn PassiveAbility>]) {}
    }

    #[test]
    fn test_kind_keys_round_trip_to_instances() {
        for kind in PassiveKind::ALL {
            assert_eq!(PassiveKind::from_key(kind.key()), Some(kind));
            assert_eq!(kind.instance().key(), kind.key());
        }
        assert_eq!(PassiveKind::from_key("unknown"), None);
    }
}
