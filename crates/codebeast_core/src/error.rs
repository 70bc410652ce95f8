//! Error types for the battle engine.
//!
//! Gameplay failures (an empty side, a unit that never gets to act) are
//! ordinary [`crate::result::Outcome`] values. The variants here cover
//! configuration and data problems only.

use thiserror::Error;

use crate::combatant::CombatantId;

/// Result type alias using [`BattleError`].
pub type Result<T> = std::result::Result<T, BattleError>;

/// Top-level error type for the battle engine and its data files.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BattleError {
    /// A unit names a passive key that is not in the registry.
    ///
    /// The engine logs this and leaves the passive slot empty; tooling
    /// reports it as a validation failure.
    #[error("Unknown passive ability: {0}")]
    UnknownPassive(String),

    /// The passive registry itself is malformed (empty or duplicate keys).
    #[error("Malformed passive registry: {0}")]
    MalformedRegistry(String),

    /// A roster is unusable. Raised by validation, never by the simulator.
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path (or label) of the data that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// A hook or lookup referenced a combatant outside the roster.
    #[error("Combatant not found: {0}")]
    CombatantNotFound(CombatantId),
}
