//! Immutable battle output handed to rating, tower progression, history and
//! quest tracking.

use serde::{Deserialize, Serialize};

use crate::combatant::{Combatant, Side};

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Defenders eliminated, or attackers ahead on hp at the turn cap.
    AttackerWin,
    /// Attackers eliminated, or defenders ahead on hp at the turn cap.
    DefenderWin,
    /// Both sides eliminated, or equal hp totals at the turn cap.
    Draw,
}

impl Outcome {
    /// Winning side, `None` for a draw.
    #[must_use]
    pub const fn winning_side(self) -> Option<Side> {
        match self {
            Self::AttackerWin => Some(Side::Attacker),
            Self::DefenderWin => Some(Side::Defender),
            Self::Draw => None,
        }
    }

    /// Outcome in which `side` wins.
    #[must_use]
    pub const fn win_for(side: Side) -> Self {
        match side {
            Side::Attacker => Self::AttackerWin,
            Side::Defender => Self::DefenderWin,
        }
    }
}

/// Who took part in a log entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    /// External unit id.
    pub unit_id: u64,
    /// Display name.
    pub name: String,
    /// Side.
    pub side: Side,
}

impl From<&Combatant> for Participant {
    fn from(combatant: &Combatant) -> Self {
        Self {
            unit_id: combatant.unit_id,
            name: combatant.name.clone(),
            side: combatant.side(),
        }
    }
}

/// One action in the battle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnLogEntry {
    /// 1-based turn number.
    pub turn: u32,
    /// Acting unit.
    pub actor: Participant,
    /// Unit that was hit.
    pub target: Participant,
    /// Damage dealt (always at least 1).
    pub damage: u32,
    /// Target hp after the hit.
    pub target_hp_after: u32,
    /// Whether the hit knocked the target out.
    pub ko: bool,
    /// Actor's speed when it was picked to act.
    pub actor_speed: u32,
}

/// Final result of one simulation. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleResult {
    outcome: Outcome,
    total_turns: u32,
    turn_log: Vec<TurnLogEntry>,
    attacker_survivors: usize,
    defender_survivors: usize,
}

impl BattleResult {
    pub(crate) fn new(
        outcome: Outcome,
        total_turns: u32,
        turn_log: Vec<TurnLogEntry>,
        attacker_survivors: usize,
        defender_survivors: usize,
    ) -> Self {
        Self {
            outcome,
            total_turns,
            turn_log,
            attacker_survivors,
            defender_survivors,
        }
    }

    /// How the battle ended.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Winning side, `None` for a draw.
    #[must_use]
    pub const fn winning_side(&self) -> Option<Side> {
        self.outcome.winning_side()
    }

    /// Check whether `side` won.
    #[must_use]
    pub fn is_win_for(&self, side: Side) -> bool {
        self.winning_side() == Some(side)
    }

    /// Number of turns simulated (never above the cap).
    #[must_use]
    pub const fn total_turns(&self) -> u32 {
        self.total_turns
    }

    /// Every action in order.
    #[must_use]
    pub fn turn_log(&self) -> &[TurnLogEntry] {
        &self.turn_log
    }

    /// Living attackers at the end.
    #[must_use]
    pub const fn attacker_survivors(&self) -> usize {
        self.attacker_survivors
    }

    /// Living defenders at the end.
    #[must_use]
    pub const fn defender_survivors(&self) -> usize {
        self.defender_survivors
    }

    /// Living units of one side at the end.
    #[must_use]
    pub const fn survivors(&self, side: Side) -> usize {
        match side {
            Side::Attacker => self.attacker_survivors,
            Side::Defender => self.defender_survivors,
        }
    }

    /// Total damage dealt by one side over the battle.
    #[must_use]
    pub fn damage_dealt_by(&self, side: Side) -> u64 {
        self.turn_log
            .iter()
            .filter(|entry| entry.actor.side == side)
            .map(|entry| u64::from(entry.damage))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(side: Side) -> Participant {
        Participant {
            unit_id: 1,
            name: "x".to_string(),
            side,
        }
    }

    #[test]
    fn test_outcome_sides() {
        assert_eq!(Outcome::AttackerWin.winning_side(), Some(Side::Attacker));
        assert_eq!(Outcome::DefenderWin.winning_side(), Some(Side::Defender));
        assert_eq!(Outcome::Draw.winning_side(), None);
        assert_eq!(Outcome::win_for(Side::Defender), Outcome::DefenderWin);
    }

    #[test]
    fn test_result_accessors() {
        let entry = TurnLogEntry {
            turn: 1,
            actor: participant(Side::Attacker),
            target: participant(Side::Defender),
            damage: 12,
            target_hp_after: 0,
            ko: true,
            actor_speed: 10,
        };
        let result = BattleResult::new(Outcome::AttackerWin, 1, vec![entry], 1, 0);
        assert!(result.is_win_for(Side::Attacker));
        assert!(!result.is_win_for(Side::Defender));
        assert_eq!(result.survivors(Side::Defender), 0);
        assert_eq!(result.damage_dealt_by(Side::Attacker), 12);
        assert_eq!(result.damage_dealt_by(Side::Defender), 0);
    }
}
