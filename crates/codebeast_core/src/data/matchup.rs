//! Matchup data: both rosters of a battle in one document.

use serde::{Deserialize, Serialize};

use super::unit_data::UnitSnapshot;
use crate::battle::BattleConfig;
use crate::error::{BattleError, Result};

/// Attacker and defender rosters for one battle.
///
/// Used by tooling and tests to keep sample battles as data files.
///
/// # Example RON
///
/// ```ron
/// Matchup(
///     name: "tower_floor_3",
///     attackers: [
///         (id: 1, name: "Voltmoth", hp: 120, attack: 34, defense: 12, speed: 18,
///          rarity: rare, sector_key: "tech"),
///     ],
///     defenders: [
///         (id: 9001, name: "Warden", hp: 200, attack: 20, defense: 30, speed: 10),
///     ],
///     config: (turn_cap: 50),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    /// Human-readable label.
    #[serde(default)]
    pub name: String,

    /// Attacking roster, in slot order.
    pub attackers: Vec<UnitSnapshot>,

    /// Defending roster, in slot order.
    pub defenders: Vec<UnitSnapshot>,

    /// Battle settings; defaults apply when omitted.
    #[serde(default)]
    pub config: BattleConfig,
}

impl Matchup {
    /// Create a matchup with the default configuration.
    #[must_use]
    pub fn new(attackers: Vec<UnitSnapshot>, defenders: Vec<UnitSnapshot>) -> Self {
        Self {
            name: String::new(),
            attackers,
            defenders,
            config: BattleConfig::default(),
        }
    }

    /// Parse a matchup from RON text. `label` is used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::DataParseError`] if the text is not a valid
    /// matchup.
    pub fn from_ron_str(label: &str, content: &str) -> Result<Self> {
        ron::from_str(content).map_err(|e| BattleError::DataParseError {
            path: label.to_string(),
            message: e.to_string(),
        })
    }

    /// Find an attacker by external unit id.
    #[must_use]
    pub fn get_attacker(&self, id: u64) -> Option<&UnitSnapshot> {
        self.attackers.iter().find(|u| u.id == id)
    }

    /// Find a defender by external unit id.
    #[must_use]
    pub fn get_defender(&self, id: u64) -> Option<&UnitSnapshot> {
        self.defenders.iter().find(|u| u.id == id)
    }

    /// Iterate over every unit, attackers first.
    pub fn all_units(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.attackers.iter().chain(self.defenders.iter())
    }
}
