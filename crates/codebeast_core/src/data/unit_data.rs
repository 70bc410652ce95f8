//! Unit snapshot structures handed to the engine by roster providers.

use serde::{Deserialize, Serialize};

/// Rarity tier of a summoned unit.
///
/// Rarity is a persistent attribute: passive eligibility is decided from it
/// once, before the battle starts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    /// Most frequently summoned tier.
    #[default]
    Common,
    /// Slightly rarer than common.
    Uncommon,
    /// Rare tier.
    Rare,
    /// Epic tier.
    Epic,
    /// Highest tier; always carries the legendary aura.
    Legendary,
}

impl Rarity {
    /// Every rarity, lowest first.
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Lower-case identifier, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }

    /// Check whether this is the legendary tier.
    #[must_use]
    pub const fn is_legendary(self) -> bool {
        matches!(self, Self::Legendary)
    }
}

/// Persistent attributes a passive's eligibility predicate may look at.
///
/// Borrowed view so it can be built from either a [`UnitSnapshot`] or a
/// live [`crate::combatant::Combatant`] without cloning strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitMeta<'a> {
    /// Rarity tier.
    pub rarity: Rarity,
    /// Sector the unit was scanned in (e.g. `"tech"`).
    pub sector_key: &'a str,
    /// Explicitly assigned passive, if any.
    pub passive_key: Option<&'a str>,
}

/// One unit as supplied by team management, tower generation or the AI
/// dummy-team generator.
///
/// # Example RON
///
/// ```ron
/// UnitSnapshot(
///     id: 42,
///     name: "Voltmoth",
///     hp: 120,
///     attack: 34,
///     defense: 12,
///     speed: 18,
///     rarity: rare,
///     sector_key: "tech",
///     passive_key: Some("tech_overclock"),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitSnapshot {
    /// External unit identifier (unique per owner, not per battle).
    pub id: u64,

    /// Display name.
    pub name: String,

    /// Hit points at battle start; also used as the battle's max hp.
    pub hp: u32,

    /// Base attack.
    pub attack: u32,

    /// Base defense.
    pub defense: u32,

    /// Base speed.
    pub speed: u32,

    /// Rarity tier.
    #[serde(default)]
    pub rarity: Rarity,

    /// Sector key used to pick a default passive.
    #[serde(default)]
    pub sector_key: String,

    /// Explicit passive override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passive_key: Option<String>,
}

impl UnitSnapshot {
    /// Create a common, sector-less unit with the given stats.
    #[must_use]
    pub fn new(
        id: u64,
        name: impl Into<String>,
        hp: u32,
        attack: u32,
        defense: u32,
        speed: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            hp,
            attack,
            defense,
            speed,
            rarity: Rarity::Common,
            sector_key: String::new(),
            passive_key: None,
        }
    }

    /// Builder method to set rarity.
    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Builder method to set the sector key.
    #[must_use]
    pub fn with_sector(mut self, sector_key: impl Into<String>) -> Self {
        self.sector_key = sector_key.into();
        self
    }

    /// Builder method to set an explicit passive key.
    #[must_use]
    pub fn with_passive(mut self, passive_key: impl Into<String>) -> Self {
        self.passive_key = Some(passive_key.into());
        self
    }

    /// Borrow the attributes passive eligibility is evaluated on.
    #[must_use]
    pub fn meta(&self) -> UnitMeta<'_> {
        UnitMeta {
            rarity: self.rarity,
            sector_key: &self.sector_key,
            passive_key: self.passive_key.as_deref(),
        }
    }

    /// Check if this unit can take part in a battle at all.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_unit() -> UnitSnapshot {
        UnitSnapshot::new(7, "Glimmerfox", 90, 25, 10, 14)
            .with_rarity(Rarity::Epic)
            .with_sector("arcane")
            .with_passive("arcane_surge")
    }

    #[test]
    fn test_meta_borrows_snapshot_fields() {
        let unit = create_test_unit();
        let meta = unit.meta();
        assert_eq!(meta.rarity, Rarity::Epic);
        assert_eq!(meta.sector_key, "arcane");
        assert_eq!(meta.passive_key, Some("arcane_surge"));
    }

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Legendary > Rarity::Epic);
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Legendary.is_legendary());
        assert!(!Rarity::Rare.is_legendary());
    }

    #[test]
    fn test_ron_defaults() {
        let unit: UnitSnapshot = ron::from_str(
            "(id: 1, name: \"Pebble\", hp: 10, attack: 2, defense: 1, speed: 3)",
        )
        .unwrap();
        assert_eq!(unit.rarity, Rarity::Common);
        assert!(unit.sector_key.is_empty());
        assert!(unit.passive_key.is_none());
    }

    #[test]
    fn test_ron_lowercase_rarity() {
        let unit: UnitSnapshot = ron::from_str(
            "(id: 1, name: \"Crown\", hp: 10, attack: 2, defense: 1, speed: 3, rarity: legendary, sector_key: \"bio\")",
        )
        .unwrap();
        assert_eq!(unit.rarity, Rarity::Legendary);
        assert_eq!(unit.sector_key, "bio");
    }
}
