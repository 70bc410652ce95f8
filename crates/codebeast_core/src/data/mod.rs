//! Data structures for roster input.
//!
//! This module contains pure data structures describing the units handed to
//! the engine. All structs are designed to be deserialized from RON files.
//!
//! **Note:** This module contains no IO - it only defines data types.
//! File loading is handled by `codebeast_tools`.

mod matchup;
mod unit_data;

pub use matchup::Matchup;
pub use unit_data::{Rarity, UnitMeta, UnitSnapshot};
