//! Per-battle combatant snapshots.
//!
//! A [`Combatant`] is built from a [`UnitSnapshot`] when a battle starts and
//! is discarded with the battle. Passive hooks are the only code allowed to
//! touch speed and the damage multipliers.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::{Rarity, UnitMeta, UnitSnapshot};
use crate::passive::PassiveAbility;

/// Partition of the roster a combatant fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The side that initiated the battle.
    Attacker,
    /// The side being challenged (tower floor, opposing player).
    Defender,
}

impl Side {
    /// The opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Attacker => Self::Defender,
            Self::Defender => Self::Attacker,
        }
    }

    /// Turn-order tie-break rank; lower acts first.
    #[must_use]
    pub const fn tiebreak_rank(self) -> u8 {
        match self {
            Self::Attacker => 0,
            Self::Defender => 1,
        }
    }

    /// Short display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Attacker => "attacker",
            Self::Defender => "defender",
        }
    }
}

/// Canonical identity of a combatant within one battle: side plus slot.
///
/// External unit ids may repeat across sides (mirror matches, dummy teams),
/// so the engine never keys anything by them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId {
    /// Side the combatant belongs to.
    pub side: Side,
    /// Position in that side's original roster.
    pub index: usize,
}

impl CombatantId {
    /// Create a new combatant id.
    #[must_use]
    pub const fn new(side: Side, index: usize) -> Self {
        Self { side, index }
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.side.label(), self.index)
    }
}

/// Hit points of a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Health {
    /// Current health points.
    pub current: u32,
    /// Maximum health points.
    pub max: u32,
}

impl Health {
    /// Create health at full.
    #[must_use]
    pub const fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Check if the combatant is knocked out (health == 0).
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.current == 0
    }

    /// Apply damage, returning actual damage absorbed.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.current);
        self.current = self.current.saturating_sub(actual);
        actual
    }

    /// Heal, returning the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let headroom = self.max.saturating_sub(self.current);
        let actual = amount.min(headroom);
        self.current = self.current.saturating_add(actual);
        actual
    }
}

/// In-battle runtime snapshot of a unit.
#[derive(Debug, Clone)]
pub struct Combatant {
    id: CombatantId,
    /// External unit id from the roster.
    pub unit_id: u64,
    /// Display name.
    pub name: String,
    /// Hit points.
    pub health: Health,
    /// Attack before multipliers.
    pub base_attack: u32,
    /// Defense; half of it (floored) is subtracted from incoming raw damage.
    pub base_defense: u32,
    /// Speed the unit entered the battle with.
    pub base_speed: u32,
    /// Current speed used for turn order.
    pub speed: u32,
    /// Multiplier on outgoing damage.
    pub damage_out_multiplier: f64,
    /// Multiplier on incoming damage.
    pub damage_in_multiplier: f64,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Sector key.
    pub sector_key: String,
    /// Explicit passive assignment from the roster.
    pub passive_key: Option<String>,
    passives: Vec<Arc<dyn PassiveAbility>>,
    passives_resolved: bool,
}

impl Combatant {
    /// Build a combatant for `side` at roster slot `index`.
    #[must_use]
    pub fn from_snapshot(side: Side, index: usize, unit: &UnitSnapshot) -> Self {
        Self {
            id: CombatantId::new(side, index),
            unit_id: unit.id,
            name: unit.name.clone(),
            health: Health::new(unit.hp),
            base_attack: unit.attack,
            base_defense: unit.defense,
            base_speed: unit.speed,
            speed: unit.speed,
            damage_out_multiplier: 1.0,
            damage_in_multiplier: 1.0,
            rarity: unit.rarity,
            sector_key: unit.sector_key.clone(),
            passive_key: unit.passive_key.clone(),
            passives: Vec::new(),
            passives_resolved: false,
        }
    }

    /// Build a whole side from roster snapshots, keeping roster order.
    #[must_use]
    pub fn roster(side: Side, units: &[UnitSnapshot]) -> Vec<Self> {
        units
            .iter()
            .enumerate()
            .map(|(index, unit)| Self::from_snapshot(side, index, unit))
            .collect()
    }

    /// Canonical id.
    #[must_use]
    pub const fn id(&self) -> CombatantId {
        self.id
    }

    /// Side this combatant fights for. Fixed at creation.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.id.side
    }

    /// Original roster slot.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.id.index
    }

    /// Current hit points.
    #[must_use]
    pub const fn hp(&self) -> u32 {
        self.health.current
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn max_hp(&self) -> u32 {
        self.health.max
    }

    /// Check if the combatant can still act and be targeted.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.health.is_dead()
    }

    /// Persistent attributes for passive eligibility.
    #[must_use]
    pub fn meta(&self) -> UnitMeta<'_> {
        UnitMeta {
            rarity: self.rarity,
            sector_key: &self.sector_key,
            passive_key: self.passive_key.as_deref(),
        }
    }

    /// Resolved passive set, in application order.
    #[must_use]
    pub fn passives(&self) -> &[Arc<dyn PassiveAbility>] {
        &self.passives
    }

    /// Keys of the resolved passive set, in application order.
    #[must_use]
    pub fn passive_keys(&self) -> Vec<&'static str> {
        self.passives.iter().map(|p| p.key()).collect()
    }

    /// Check whether the passive set has been resolved.
    #[must_use]
    pub const fn passives_resolved(&self) -> bool {
        self.passives_resolved
    }

    /// Move the combatant to another roster slot. Only used while the
    /// battle state is being assembled.
    pub(crate) fn reslot(mut self, side: Side, index: usize) -> Self {
        self.id = CombatantId::new(side, index);
        self
    }

    /// Store the resolved passive set. Only the first call has any effect.
    pub(crate) fn set_passives(&mut self, passives: Vec<Arc<dyn PassiveAbility>>) -> bool {
        if self.passives_resolved {
            return false;
        }
        self.passives = passives;
        self.passives_resolved = true;
        true
    }

    /// Outgoing attack after the damage-out multiplier, floored.
    #[must_use]
    pub fn effective_attack(&self) -> i64 {
        (f64::from(self.base_attack) * self.damage_out_multiplier).floor() as i64
    }

    /// Flat mitigation: half of defense, floored.
    #[must_use]
    pub fn mitigation(&self) -> i64 {
        (f64::from(self.base_defense) * 0.5).floor() as i64
    }
}
