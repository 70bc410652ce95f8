//! Display metadata for passives.
//!
//! Presentation only: combat logic never reads this table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::variants::{
    ARCANE_SURGE_ACTIONS, ARCANE_SURGE_SPEED_BONUS, BIO_REGENERATION_PERCENT,
    LEGENDARY_AURA_DAMAGE_IN, LEGENDARY_AURA_DAMAGE_OUT, TECH_OVERCLOCK_MULTIPLIER,
};
use super::PassiveKind;
use crate::error::{BattleError, Result};

/// Display name, description and tuning constants for one passive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassiveInfo {
    /// Registry key this entry describes.
    pub key: String,
    /// Player-facing name.
    pub display_name: String,
    /// Player-facing description.
    pub description: String,
    /// Tuning values shown alongside the description.
    #[serde(default)]
    pub constants: BTreeMap<String, f64>,
}

impl PassiveInfo {
    fn new(
        kind: PassiveKind,
        display_name: &str,
        description: &str,
        constants: &[(&str, f64)],
    ) -> Self {
        Self {
            key: kind.key().to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            constants: constants
                .iter()
                .map(|(name, value)| ((*name).to_string(), *value))
                .collect(),
        }
    }
}

/// Ability metadata table keyed by passive key.
///
/// # Example RON
///
/// ```ron
/// [
///     (
///         key: "tech_overclock",
///         display_name: "Overclock",
///         description: "First attack deals 20% more damage.",
///         constants: {"multiplier": 1.2},
///     ),
/// ]
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassiveCatalog {
    entries: BTreeMap<String, PassiveInfo>,
}

impl PassiveCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog describing the built-in variants.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.insert(PassiveInfo::new(
            PassiveKind::TechOverclock,
            "Tech Overclock",
            "The first attack of the battle deals 20% more damage.",
            &[("multiplier", TECH_OVERCLOCK_MULTIPLIER)],
        ));
        catalog.insert(PassiveInfo::new(
            PassiveKind::BioRegeneration,
            "Bio Regeneration",
            "Recovers 10% of max HP after each of its attacks.",
            &[("heal_percent", f64::from(BIO_REGENERATION_PERCENT))],
        ));
        catalog.insert(PassiveInfo::new(
            PassiveKind::ArcaneSurge,
            "Arcane Surge",
            "Gains +5 speed for its first 3 actions.",
            &[
                ("speed_bonus", f64::from(ARCANE_SURGE_SPEED_BONUS)),
                ("actions", ARCANE_SURGE_ACTIONS as f64),
            ],
        ));
        catalog.insert(PassiveInfo::new(
            PassiveKind::LegendaryAura,
            "Legendary Aura",
            "Deals 10% more damage and takes 10% less for the whole battle.",
            &[
                ("damage_out", LEGENDARY_AURA_DAMAGE_OUT),
                ("damage_in", LEGENDARY_AURA_DAMAGE_IN),
            ],
        ));
        catalog
    }

    /// Parse a catalog from a RON list of [`PassiveInfo`]. `label` is used in
    /// error messages.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::DataParseError`] on malformed RON or when a key
    /// appears twice.
    pub fn from_ron_str(label: &str, content: &str) -> Result<Self> {
        let infos: Vec<PassiveInfo> =
            ron::from_str(content).map_err(|e| BattleError::DataParseError {
                path: label.to_string(),
                message: e.to_string(),
            })?;

        let mut catalog = Self::new();
        for info in infos {
            let key = info.key.clone();
            if catalog.insert(info).is_some() {
                return Err(BattleError::DataParseError {
                    path: label.to_string(),
                    message: format!("duplicate catalog entry '{key}'"),
                });
            }
        }
        Ok(catalog)
    }

    /// Add or replace an entry, returning the previous one.
    pub fn insert(&mut self, info: PassiveInfo) -> Option<PassiveInfo> {
        self.entries.insert(info.key.clone(), info)
    }

    /// Get an entry by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PassiveInfo> {
        self.entries.get(key)
    }

    /// All entries, sorted by key.
    pub fn entries(&self) -> impl Iterator<Item = &PassiveInfo> {
        self.entries.values()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One-line "Name: description" text for a key, falling back to the key.
    #[must_use]
    pub fn describe(&self, key: &str) -> String {
        match self.get(key) {
            Some(info) => format!("{}: {}", info.display_name, info.description),
            None => key.to_string(),
        }
    }
}
