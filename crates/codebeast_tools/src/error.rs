//! Error types for the tools.

use codebeast_core::error::BattleError;
use thiserror::Error;

/// Result type alias using [`ToolError`].
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors raised by the tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Failed to read a file or directory.
    #[error("IO error reading '{path}': {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Directory does not exist.
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    /// Engine or data error.
    #[error(transparent)]
    Battle(#[from] BattleError),

    /// JSON output failed.
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation found problems.
    #[error("{0} validation issue(s) found")]
    ValidationFailed(usize),
}
