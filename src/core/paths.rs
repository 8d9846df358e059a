// src/core/paths.rs

use crate::constants::{APP_DIR, SCRIPTS_SUBDIR};
use crate::models::Settings;
use lazy_static::lazy_static;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Could not find system data directory.")]
    DataDirNotFound,
    #[error("Could not find home directory.")]
    HomeDirNotFound,
    #[error("Could not create directory '{path}': {source}")]
    DirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Returns the scriptorium configuration directory (`~/.config/scriptorium`),
/// creating it if absent.
///
/// Memoized: the first call computes and caches the path, subsequent calls
/// return the cached value.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    let mut cached = CONFIG_DIR.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(path) = &*cached {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(APP_DIR);
    ensure_dir(&config_path)?;

    *cached = Some(config_path.clone());
    Ok(config_path)
}

/// The default scripts location when `script_directory` is not configured:
/// a fixed subdirectory of the platform data dir.
pub fn default_scripts_dir() -> Result<PathBuf, PathError> {
    Ok(dirs::data_dir()
        .ok_or(PathError::DataDirNotFound)?
        .join(APP_DIR)
        .join(SCRIPTS_SUBDIR))
}

/// Expands a user-entered directory path.
///
/// `~` alone is the home directory; `~/x` and `~\x` both resolve against it.
/// Environment variables are expanded, and anything still relative afterwards
/// is resolved against the home directory rather than the process cwd, since
/// the setting describes a per-user location.
pub fn resolve_directory_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;

    if trimmed == "~" {
        return Ok(home);
    }
    if let Some(rest) = trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        return Ok(clean(home.join(rest)));
    }

    let expanded = shellexpand::env(trimmed)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| trimmed.to_string());
    let path = PathBuf::from(expanded);
    if path.is_absolute() {
        Ok(clean(path))
    } else {
        Ok(clean(home.join(path)))
    }
}

/// Picks the effective scripts directory: the configured `script_directory`
/// when set and non-empty, else the platform default. Does not touch the
/// filesystem.
pub fn choose_scripts_dir(settings: &Settings) -> Result<PathBuf, PathError> {
    match settings.script_directory.as_deref().map(str::trim) {
        Some(configured) if !configured.is_empty() => resolve_directory_path(configured),
        _ => default_scripts_dir(),
    }
}

/// Resolves the effective scripts directory from settings, creating it lazily.
pub fn scripts_dir(settings: &Settings) -> Result<PathBuf, PathError> {
    let dir = choose_scripts_dir(settings)?;
    ensure_dir(&dir)?;
    Ok(dir)
}

fn ensure_dir(path: &std::path::Path) -> Result<(), PathError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| PathError::DirCreation {
            path: path.display().to_string(),
            source: e,
        })?;
    }
    Ok(())
}

// Strips the verbose `\\?\` prefix Windows canonicalization likes to add.
fn clean(path: PathBuf) -> PathBuf {
    dunce::simplified(&path).to_path_buf()
}
