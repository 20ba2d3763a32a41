//! Picks the authoritative config file for this process.
//!
//! Resolution never fails. Every filesystem problem is logged and the
//! process carries on with whatever is (or is not) on disk; a missing file
//! is later bootstrapped with defaults.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::ConfigOrigin;

use super::paths::{ConfigLocations, has_config_extension};

/// Outcome of [`resolve_config_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub path: PathBuf,
    pub origin: ConfigOrigin,
    /// The legacy username-named file was renamed to `path`.
    pub legacy_migrated: bool,
    /// Admin file copied to `path` because no config existed yet.
    pub seeded_from: Option<PathBuf>,
}

pub fn resolve_config_path(locations: &ConfigLocations) -> Resolution {
    let local = locations.local_override_file();
    let (path, origin) = if local.is_file() {
        tracing::debug!(path = %local.display(), "using local config override");
        (local, ConfigOrigin::LocalOverride)
    } else {
        ensure_app_dir(locations.app_dir());
        let shared = locations.shared_config_file();
        tracing::debug!(path = %shared.display(), "using user config file");
        (shared, ConfigOrigin::Shared)
    };

    let legacy_migrated = locations
        .legacy_config_file()
        .is_some_and(|legacy| migrate_legacy_file(&legacy, &path));

    let seeded_from = if path.exists() {
        None
    } else {
        seed_from_admin_dir(locations.admin_dir(), &path)
    };

    Resolution {
        path,
        origin,
        legacy_migrated,
        seeded_from,
    }
}

fn ensure_app_dir(app_dir: &Path) {
    if let Err(e) = fs::create_dir_all(app_dir) {
        tracing::warn!(
            path = %app_dir.display(),
            error = %e,
            "could not create application data directory"
        );
    }
}

/// Rename `legacy` to `target`. Returns true when the file moved.
///
/// An existing `target` is never replaced; the legacy file stays in place
/// so the user can merge settings by hand.
pub fn migrate_legacy_file(legacy: &Path, target: &Path) -> bool {
    if !legacy.is_file() {
        return false;
    }

    let result = if target.exists() {
        Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "destination already exists",
        ))
    } else {
        fs::rename(legacy, target)
    };

    match result {
        Ok(()) => {
            tracing::info!(
                from = %legacy.display(),
                to = %target.display(),
                "renamed config file to new naming format"
            );
            true
        }
        Err(e) => {
            tracing::error!(
                legacy = %legacy.display(),
                path = %target.display(),
                error = %e,
                "failed to update the config file name to the new format. \
                 The previous config file is still in the same folder; copy its \
                 settings into the new file, then remove the old one as it is no \
                 longer used"
            );
            false
        }
    }
}

/// Copy the first admin-provided config file to `target`.
///
/// Only the first candidate (sorted by file name) is tried. Returns the
/// source path when the copy succeeded.
pub fn seed_from_admin_dir(admin_dir: &Path, target: &Path) -> Option<PathBuf> {
    let source = first_admin_config(admin_dir)?;
    match fs::copy(&source, target) {
        Ok(_) => {
            tracing::debug!(source = %source.display(), "configured from admin file");
            Some(source)
        }
        Err(e) => {
            tracing::debug!(
                source = %source.display(),
                error = %e,
                "error copying admin config file"
            );
            None
        }
    }
}

fn first_admin_config(admin_dir: &Path) -> Option<PathBuf> {
    let entries = match fs::read_dir(admin_dir) {
        Ok(entries) => entries,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(
                    path = %admin_dir.display(),
                    error = %e,
                    "cannot read admin config directory"
                );
            }
            return None;
        }
    };

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_config_extension(path))
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}
