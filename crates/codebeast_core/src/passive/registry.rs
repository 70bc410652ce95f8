//! Immutable key → ability registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{PassiveAbility, PassiveKind};
use crate::error::{BattleError, Result};

/// Read-only map from passive key to its shared, stateless instance.
///
/// Built once at startup and shared (usually behind an `Arc`) by every
/// battle. Iteration order is by key, so anything derived from it is stable.
#[derive(Debug, Clone, Default)]
pub struct PassiveRegistry {
    abilities: BTreeMap<&'static str, Arc<dyn PassiveAbility>>,
}

impl PassiveRegistry {
    /// Start building a registry.
    #[must_use]
    pub fn builder() -> PassiveRegistryBuilder {
        PassiveRegistryBuilder::default()
    }

    /// Registry holding every built-in variant.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            abilities: PassiveKind::ALL
                .into_iter()
                .map(|kind| (kind.key(), kind.instance()))
                .collect(),
        }
    }

    /// Get an ability by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arc<dyn PassiveAbility>> {
        self.abilities.get(key)
    }

    /// Check whether a key is registered.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.abilities.contains_key(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.abilities.keys().copied()
    }

    /// Number of registered abilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    /// Check if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

/// Collects abilities and validates them into a [`PassiveRegistry`].
#[derive(Debug, Default)]
pub struct PassiveRegistryBuilder {
    pending: Vec<Arc<dyn PassiveAbility>>,
}

impl PassiveRegistryBuilder {
    /// Queue an ability for registration.
    #[must_use]
    pub fn with(mut self, ability: Arc<dyn PassiveAbility>) -> Self {
        self.pending.push(ability);
        self
    }

    /// Queue a built-in variant.
    #[must_use]
    pub fn with_kind(self, kind: PassiveKind) -> Self {
        self.with(kind.instance())
    }

    /// Validate and freeze the registry.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::MalformedRegistry`] if a key is blank or
    /// registered twice.
    pub fn build(self) -> Result<PassiveRegistry> {
        let mut abilities = BTreeMap::new();
        for ability in self.pending {
            let key = ability.key();
            if key.trim().is_empty() {
                return Err(BattleError::MalformedRegistry(
                    "passive key must not be empty".to_string(),
                ));
            }
            if abilities.insert(key, ability).is_some() {
                return Err(BattleError::MalformedRegistry(format!(
                    "passive key '{key}' registered twice"
                )));
            }
        }
        Ok(PassiveRegistry { abilities })
    }
}
