//! Battle state container shared with passive hooks.
//!
//! The roster is one vector: attackers in slot order followed by defenders
//! in slot order. Per-side views are filters over it and are never stored,
//! so a hook mutating a combatant is immediately visible everywhere.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::combatant::{Combatant, CombatantId, Side};

/// Transient per-unit effect state owned by the battle, not the ability.
///
/// Abilities namespace their entries by key so several passives can share
/// one bag without colliding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectBag {
    flags: BTreeSet<&'static str>,
    counters: BTreeMap<&'static str, i64>,
    saved: BTreeMap<&'static str, f64>,
}

impl EffectBag {
    /// Raise a flag.
    pub fn set_flag(&mut self, name: &'static str) {
        self.flags.insert(name);
    }

    /// Clear a flag, returning whether it was set.
    pub fn take_flag(&mut self, name: &str) -> bool {
        self.flags.remove(name)
    }

    /// Read a counter; missing counters read as zero.
    #[must_use]
    pub fn counter(&self, name: &str) -> i64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Overwrite a counter.
    pub fn set_counter(&mut self, name: &'static str, value: i64) {
        self.counters.insert(name, value);
    }

    /// Add to a counter and return the new value.
    pub fn add_counter(&mut self, name: &'static str, delta: i64) -> i64 {
        let entry = self.counters.entry(name).or_insert(0);
        *entry = entry.saturating_add(delta);
        *entry
    }

    /// Stash a value to be restored later, e.g. a multiplier before a buff.
    pub fn save(&mut self, name: &'static str, value: f64) {
        self.saved.insert(name, value);
    }

    /// Remove and return a stashed value.
    pub fn restore(&mut self, name: &str) -> Option<f64> {
        self.saved.remove(name)
    }

    /// Check whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.counters.is_empty() && self.saved.is_empty()
    }
}

/// Everything one battle mutates: the canonical roster and the effect bags.
///
/// Created fresh for every simulation call and never shared across calls.
#[derive(Debug, Clone)]
pub struct BattleState {
    roster: Vec<Combatant>,
    attacker_count: usize,
    effects: HashMap<CombatantId, EffectBag>,
}

impl BattleState {
    /// Build the canonical roster from both sides.
    ///
    /// Combatants are re-slotted to match their position in the given lists,
    /// so callers can pass lists built independently.
    #[must_use]
    pub fn new(attackers: Vec<Combatant>, defenders: Vec<Combatant>) -> Self {
        let attacker_count = attackers.len();
        let roster = attackers
            .into_iter()
            .enumerate()
            .map(|(index, c)| c.reslot(Side::Attacker, index))
            .chain(
                defenders
                    .into_iter()
                    .enumerate()
                    .map(|(index, c)| c.reslot(Side::Defender, index)),
            )
            .collect();
        Self {
            roster,
            attacker_count,
            effects: HashMap::new(),
        }
    }

    fn slot(&self, id: CombatantId) -> Option<usize> {
        let slot = match id.side {
            Side::Attacker if id.index < self.attacker_count => id.index,
            Side::Defender => self.attacker_count + id.index,
            Side::Attacker => return None,
        };
        (slot < self.roster.len()).then_some(slot)
    }

    /// Get a combatant by id.
    #[must_use]
    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.slot(id).map(|slot| &self.roster[slot])
    }

    /// Get a mutable combatant by id.
    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        let slot = self.slot(id)?;
        Some(&mut self.roster[slot])
    }

    /// Every combatant, attackers first.
    #[must_use]
    pub fn combatants(&self) -> &[Combatant] {
        &self.roster
    }

    /// Combatants of one side, in slot order.
    pub fn side(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.roster.iter().filter(move |c| c.side() == side)
    }

    /// Living combatants across both sides.
    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.roster.iter().filter(|c| c.is_alive())
    }

    /// Living combatants of one side.
    pub fn living_on(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.side(side).filter(|c| c.is_alive())
    }

    /// Number of living combatants on a side.
    #[must_use]
    pub fn living_count(&self, side: Side) -> usize {
        self.living_on(side).count()
    }

    /// Sum of current hp on a side.
    #[must_use]
    pub fn total_hp(&self, side: Side) -> u64 {
        self.side(side).map(|c| u64::from(c.hp())).sum()
    }

    /// Effect bag for a combatant, if anything has been recorded.
    #[must_use]
    pub fn effects(&self, id: CombatantId) -> Option<&EffectBag> {
        self.effects.get(&id)
    }

    /// Effect bag for a combatant, created on first use.
    pub fn effects_mut(&mut self, id: CombatantId) -> &mut EffectBag {
        self.effects.entry(id).or_default()
    }
}
