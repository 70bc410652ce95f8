//! # Codebeast Development Tools
//!
//! Command-line tools for development:
//! - Matchup simulation from RON files
//! - Data validators
//! - Passive descriptions
//!
//! All file IO for the workspace lives here; `codebeast_core` only parses
//! strings.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod loader;
pub mod report;
pub mod validate;

pub use error::{Result, ToolError};
