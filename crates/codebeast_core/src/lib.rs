//! # Codebeast Core
//!
//! Deterministic auto-battle engine for Codebeast squads.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO beyond parsing strings handed to it
//! - No randomness and no clocks
//!
//! Identical inputs always produce an identical [`result::BattleResult`],
//! including the full turn log. This enables:
//! - Server-authoritative battle resolution
//! - Replaying battles from their inputs
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`battle`] - Turn loop, targeting, damage and outcome rules
//! - [`combatant`] - Per-battle unit state
//! - [`state`] - Battle state container shared with passive hooks
//! - [`passive`] - Passive abilities, registry, catalog and dispatch engine
//! - [`result`] - Battle outcome and turn log
//! - [`data`] - Serializable unit snapshots and matchups

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod battle;
pub mod combatant;
pub mod data;
pub mod error;
pub mod passive;
pub mod result;
pub mod state;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::battle::{Battle, BattleConfig, BattleSimulator, DEFAULT_TURN_CAP};
    pub use crate::combatant::{Combatant, CombatantId, Health, Side};
    pub use crate::data::{Matchup, Rarity, UnitMeta, UnitSnapshot};
    pub use crate::error::{BattleError, Result};
    pub use crate::passive::{
        PassiveAbility, PassiveCatalog, PassiveEngine, PassiveInfo, PassiveKind, PassiveRegistry,
    };
    pub use crate::result::{BattleResult, Outcome, Participant, TurnLogEntry};
    pub use crate::state::{BattleState, EffectBag};
}
