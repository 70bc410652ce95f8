//! Data validation utilities.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use codebeast_core::combatant::Side;
use codebeast_core::data::{Matchup, UnitSnapshot};
use codebeast_core::error::BattleError;
use codebeast_core::passive::PassiveEngine;

use crate::error::{Result, ToolError};
use crate::loader::{self, CATALOG_FILE};

/// One problem found in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// File the problem was found in.
    pub file: String,
    /// What is wrong.
    pub error: BattleError,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.error)
    }
}

/// Outcome of validating a data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of files parsed.
    pub files_checked: usize,
    /// Every problem found, in file order.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Check if no problems were found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

fn check_side(side: Side, units: &[UnitSnapshot], engine: &PassiveEngine) -> Vec<BattleError> {
    let label = side.label();
    let mut errors = Vec::new();

    if units.is_empty() {
        errors.push(BattleError::InvalidRoster(format!("{label} side is empty")));
    }

    let mut seen = HashSet::new();
    for unit in units {
        if !seen.insert(unit.id) {
            errors.push(BattleError::InvalidRoster(format!(
                "{label} unit id {} appears more than once",
                unit.id
            )));
        }
        if unit.hp == 0 {
            errors.push(BattleError::InvalidRoster(format!(
                "{label} unit '{}' has zero hp",
                unit.name
            )));
        }
        if let Err(e) = engine.check_explicit_passive(&unit.meta()) {
            errors.push(e);
        }
    }

    errors
}

/// Check one matchup against the engine's registry.
///
/// Reports empty sides, duplicate unit ids within a side, units with zero hp
/// and explicit passive keys missing from the registry.
#[must_use]
pub fn validate_matchup(matchup: &Matchup, engine: &PassiveEngine) -> Vec<BattleError> {
    let mut errors = check_side(Side::Attacker, &matchup.attackers, engine);
    errors.extend(check_side(Side::Defender, &matchup.defenders, engine));
    errors
}

/// Validate all RON data files in a directory.
///
/// Parse failures are reported as issues rather than aborting, so one bad
/// file does not hide problems in the others.
///
/// # Errors
///
/// Returns an error if the directory itself cannot be read.
pub fn validate_data_directory(path: &Path) -> Result<ValidationReport> {
    let engine = PassiveEngine::default();
    let mut report = ValidationReport::default();

    let catalog_path = path.join(CATALOG_FILE);
    if catalog_path.is_file() {
        report.files_checked += 1;
        if let Err(e) = loader::load_catalog(&catalog_path) {
            report.issues.push(issue(&catalog_path, e));
        }
    }

    for file in loader::matchup_files(path)? {
        report.files_checked += 1;
        match loader::load_matchup(&file) {
            Ok(matchup) => {
                for error in validate_matchup(&matchup, &engine) {
                    tracing::warn!(file = %file.display(), "{error}");
                    report.issues.push(ValidationIssue {
                        file: file.display().to_string(),
                        error,
                    });
                }
            }
            Err(e) => report.issues.push(issue(&file, e)),
        }
    }

    Ok(report)
}

fn issue(file: &Path, error: ToolError) -> ValidationIssue {
    tracing::warn!(file = %file.display(), "{error}");
    let error = match error {
        ToolError::Battle(e) => e,
        other => BattleError::DataParseError {
            path: file.display().to_string(),
            message: other.to_string(),
        },
    };
    ValidationIssue {
        file: file.display().to_string(),
        error,
    }
}
