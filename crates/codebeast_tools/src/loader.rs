//! Data file loading.
//!
//! Loads matchups and the passive catalog from RON files.

use std::fs;
use std::path::{Path, PathBuf};

use codebeast_core::data::Matchup;
use codebeast_core::passive::{PassiveCatalog, PassiveEngine, PassiveRegistry};

use crate::error::{Result, ToolError};

/// File name of the optional catalog inside a data directory.
pub const CATALOG_FILE: &str = "passives.ron";

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "assets/data";

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| ToolError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Load a matchup from a RON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_matchup(path: &Path) -> Result<Matchup> {
    let content = read(path)?;
    let mut matchup = Matchup::from_ron_str(&path.display().to_string(), &content)?;
    if matchup.name.is_empty() {
        if let Some(stem) = path.file_stem() {
            matchup.name = stem.to_string_lossy().into_owned();
        }
    }
    Ok(matchup)
}

/// Load a passive catalog from a RON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_catalog(path: &Path) -> Result<PassiveCatalog> {
    let content = read(path)?;
    Ok(PassiveCatalog::from_ron_str(
        &path.display().to_string(),
        &content,
    )?)
}

/// Matchup files in a directory, sorted by path. The catalog file is skipped.
///
/// # Errors
///
/// Returns an error if `dir` is missing or cannot be listed.
pub fn matchup_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ToolError::DirectoryNotFound(dir.display().to_string()));
    }

    let io_err = |source| ToolError::Io {
        path: dir.display().to_string(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_ron = path.extension().is_some_and(|e| e == "ron");
        let is_catalog = path.file_name().is_some_and(|n| n == CATALOG_FILE);
        if is_ron && !is_catalog {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Build an engine for a matchup file.
///
/// Uses the built-in registry, plus the `passives.ron` catalog next to the
/// matchup when there is one. A catalog that fails to load is logged and the
/// built-in catalog is used instead.
pub fn engine_for(matchup_path: &Path) -> PassiveEngine {
    let catalog_path = matchup_path
        .parent()
        .map_or_else(|| PathBuf::from(CATALOG_FILE), |dir| dir.join(CATALOG_FILE));

    if !catalog_path.is_file() {
        return PassiveEngine::default();
    }

    match load_catalog(&catalog_path) {
        Ok(catalog) => {
            tracing::debug!(
                path = %catalog_path.display(),
                entries = catalog.len(),
                "Loaded passive catalog"
            );
            PassiveEngine::new(PassiveRegistry::builtin(), catalog)
        }
        Err(e) => {
            tracing::warn!("Failed to load catalog from {:?}: {}", catalog_path, e);
            PassiveEngine::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATCHUP: &str = r#"(
        attackers: [(id: 1, name: "Volt", hp: 100, attack: 30, defense: 10, speed: 20)],
        defenders: [(id: 2, name: "Moss", hp: 100, attack: 20, defense: 20, speed: 10)],
    )"#;

    #[test]
    fn test_load_matchup_names_from_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floor_one.ron");
        fs::write(&path, MATCHUP).unwrap();

        let matchup = load_matchup(&path).unwrap();
        assert_eq!(matchup.name, "floor_one");
        assert_eq!(matchup.attackers.len(), 1);
        assert_eq!(matchup.config.turn_cap, 50);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_matchup(&dir.path().join("nope.ron")).unwrap_err();
        assert!(matches!(err, ToolError::Io { .. }));
    }

    #[test]
    fn test_matchup_files_skips_catalog_and_other_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.ron"), MATCHUP).unwrap();
        fs::write(dir.path().join("a.ron"), MATCHUP).unwrap();
        fs::write(dir.path().join(CATALOG_FILE), "[]").unwrap();
        fs::write(dir.path().join("notes.txt"), "hi").unwrap();

        let files = matchup_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.ron", "b.ron"]);
    }

    #[test]
    fn test_matchup_files_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = matchup_files(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, ToolError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_engine_picks_up_sibling_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.ron");
        fs::write(&path, MATCHUP).unwrap();
        assert_eq!(engine_for(&path).catalog().len(), 4);

        fs::write(
            dir.path().join(CATALOG_FILE),
            r#"[(key: "tech_overclock", display_name: "Zap", description: "Zaps.")]"#,
        )
        .unwrap();
        let engine = engine_for(&path);
        assert_eq!(engine.catalog().len(), 1);
        assert_eq!(engine.catalog().describe("tech_overclock"), "Zap: Zaps.");
    }
}
