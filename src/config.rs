//! Storage location and one-time startup migration.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Application directory under the per-user configuration directory.
const APP_DIR_NAME: &str = "melodeon";

/// Current catalog file, kept in the application directory.
pub const STORE_FILE_NAME: &str = "melodeon-2.db";

/// Store files from incompatible earlier formats. Deleted at startup before
/// the current store is opened; there is no in-place migration between
/// formats.
const LEGACY_STORE_FILES: &[&str] = &["melodeon-1.db"];

/// Default location of the catalog for this user, creating the application
/// directory when it does not exist yet.
pub fn store_path() -> Result<PathBuf> {
    let config = dirs::config_dir().context("no user configuration directory available")?;
    store_path_in(&config)
}

fn store_path_in(base: &Path) -> Result<PathBuf> {
    let dir = base.join(APP_DIR_NAME);
    fs::create_dir_all(&dir)
        .with_context(|| format!("could not create catalog directory {:?}", dir))?;
    Ok(dir.join(STORE_FILE_NAME))
}

/// Delete legacy-format catalog files from the application directory.
/// Failure to delete is a warning, not fatal; the old file is simply
/// ignored from then on.
pub fn remove_legacy_stores() {
    if let Some(config) = dirs::config_dir() {
        remove_legacy_stores_in(&config.join(APP_DIR_NAME));
    }
}

fn remove_legacy_stores_in(dir: &Path) {
    for name in LEGACY_STORE_FILES {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => info!("Removed legacy catalog {:?}", path),
            Err(e) => warn!("Unable to delete legacy catalog {:?}: {}", path, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_files_are_deleted_current_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let legacy = dir.path().join("melodeon-1.db");
        let current = dir.path().join(STORE_FILE_NAME);
        fs::write(&legacy, b"old").unwrap();
        fs::write(&current, b"new").unwrap();

        remove_legacy_stores_in(dir.path());

        assert!(!legacy.exists());
        assert!(current.exists());
    }

    #[test]
    fn store_path_lives_in_the_app_directory() {
        let base = tempfile::tempdir().unwrap();
        let path = store_path_in(base.path()).unwrap();
        assert_eq!(path, base.path().join("melodeon").join(STORE_FILE_NAME));
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn missing_legacy_files_are_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        remove_legacy_stores_in(dir.path());
    }
}
