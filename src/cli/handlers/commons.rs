// src/cli/handlers/commons.rs

// Shared bootstrap and lookup helpers used by multiple handlers.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::core::{paths, settings, storage};
use crate::models::{ScriptEntry, ScriptKind};
use crate::state::Session;

/// Builds the session for this invocation: loads user-level settings, surfaces
/// the workspace-settings warning, and feeds `[custom]` entries through the
/// registration API.
pub fn bootstrap_session() -> Result<Session> {
    let settings = settings::load_settings().context("Failed to load settings")?;
    let session = Session::new(settings);

    if let Ok(cwd) = std::env::current_dir() {
        if let Some(file) = settings::workspace_settings_in(&cwd) {
            // Workspace-level settings are never honored; say so once.
            if session.warn_once_workspace_settings() {
                eprintln!(
                    "{} {}",
                    "Warning:".yellow().bold(),
                    format!(
                        "ignoring workspace settings file '{}'; only user-level settings are honored.",
                        file.display()
                    )
                    .yellow()
                );
            }
        }
    }

    // Settings-sourced custom interpreters go through the same registration
    // path as API callers, so they obey the same rules (no shadowing
    // built-ins, last one wins). A bad entry is skipped, not fatal.
    for (extension, config) in session.settings.custom.clone() {
        match session.register_interpreter(&extension, &config.command, config.label.as_deref()) {
            // The handle is dropped on purpose: entries from the settings
            // file live for the whole process.
            Ok(_registration) => {}
            Err(e) => {
                log::warn!("Rejected custom interpreter for '{extension}': {e}");
                eprintln!(
                    "{} {}",
                    "Warning:".yellow().bold(),
                    format!("skipping custom interpreter for '{extension}': {e}").yellow()
                );
            }
        }
    }

    Ok(session)
}

/// The effective vault directory, created lazily.
pub fn scripts_dir(session: &Session) -> Result<PathBuf> {
    Ok(paths::scripts_dir(&session.settings)?)
}

/// Finds a script by user-entered name and pairs it with its handler.
pub fn locate_script(session: &Session, name: &str) -> Result<(ScriptEntry, ScriptKind)> {
    let dir = scripts_dir(session)?;
    storage::find_script(session, &dir, name)
}
