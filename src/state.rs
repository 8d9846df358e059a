// src/state.rs

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use thiserror::Error;

use crate::core::descriptors;
use crate::models::{CustomInterpreterEntry, Settings};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Interpreter extension cannot be empty.")]
    EmptyExtension,
    #[error("Interpreter command cannot be empty.")]
    EmptyCommand,
    #[error("Extension '{0}' is handled natively and cannot be overridden.")]
    ShadowsBuiltin(String),
}

/// All mutable state of one scriptorium process.
///
/// There are no ambient globals: the custom-interpreter registry, the listing
/// refresh revision and the one-shot warning flags all live here and are passed
/// by reference to whoever needs them. Everything uses interior mutability so
/// handlers can share the session freely.
pub struct Session {
    pub settings: Settings,
    custom: Mutex<HashMap<String, CustomInterpreterEntry>>,
    refresh_revision: AtomicU64,
    warned_workspace_settings: AtomicBool,
    warned_unreadable_dir: AtomicBool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("refresh_revision", &self.refresh_revision)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            custom: Mutex::new(HashMap::new()),
            refresh_revision: AtomicU64::new(0),
            warned_workspace_settings: AtomicBool::new(false),
            warned_unreadable_dir: AtomicBool::new(false),
        }
    }

    /// Registers a custom interpreter for an extension with no built-in handler.
    ///
    /// The extension is normalized before the collision check, so `rb`, `.RB`
    /// and `.rb` all address the same entry. Registering twice for the same
    /// extension replaces the earlier entry (last registration wins). Built-in
    /// extensions are rejected outright.
    pub fn register_interpreter(
        &self,
        extension: &str,
        command: &str,
        label: Option<&str>,
    ) -> Result<InterpreterRegistration, RegistryError> {
        let ext = descriptors::normalize_extension(extension).ok_or(RegistryError::EmptyExtension)?;
        let command = command.trim();
        if command.is_empty() {
            return Err(RegistryError::EmptyCommand);
        }
        if descriptors::is_builtin_extension(&ext) {
            return Err(RegistryError::ShadowsBuiltin(ext));
        }

        let entry = CustomInterpreterEntry {
            extension: ext.clone(),
            command: command.to_string(),
            label: label.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()),
        };
        log::debug!("Registering interpreter '{}' for '{}'", entry.command, ext);
        self.lock_custom().insert(ext.clone(), entry);
        self.bump_refresh();

        Ok(InterpreterRegistration {
            extension: ext,
            command: command.to_string(),
        })
    }

    /// Returns the custom entry for a canonical extension, if any.
    pub fn custom_entry(&self, extension: &str) -> Option<CustomInterpreterEntry> {
        self.lock_custom().get(extension).cloned()
    }

    /// All custom entries, sorted by extension for stable listings.
    pub fn custom_entries(&self) -> Vec<CustomInterpreterEntry> {
        let mut entries: Vec<_> = self.lock_custom().values().cloned().collect();
        entries.sort_by(|a, b| a.extension.cmp(&b.extension));
        entries
    }

    /// Monotonic counter bumped whenever the set of known script types changes,
    /// so listing surfaces know to re-render.
    pub fn refresh_revision(&self) -> u64 {
        self.refresh_revision.load(Ordering::Relaxed)
    }

    fn bump_refresh(&self) {
        self.refresh_revision.fetch_add(1, Ordering::Relaxed);
        log::trace!("Refresh revision bumped");
    }

    /// Returns true the first time it is called, false afterwards.
    pub fn warn_once_workspace_settings(&self) -> bool {
        !self.warned_workspace_settings.swap(true, Ordering::Relaxed)
    }

    /// Returns true the first time it is called, false afterwards.
    pub fn warn_once_unreadable_dir(&self) -> bool {
        !self.warned_unreadable_dir.swap(true, Ordering::Relaxed)
    }

    fn lock_custom(&self) -> std::sync::MutexGuard<'_, HashMap<String, CustomInterpreterEntry>> {
        self.custom.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Disposal handle returned by [`Session::register_interpreter`].
///
/// Dropping the handle does nothing; removal is explicit via [`dispose`].
///
/// [`dispose`]: InterpreterRegistration::dispose
#[derive(Debug)]
pub struct InterpreterRegistration {
    extension: String,
    command: String,
}

impl InterpreterRegistration {
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Removes the registered entry, but only if it is still exactly the one
    /// this handle created (command equality). A stale handle whose entry was
    /// since replaced is a no-op, which guards against late unregister calls
    /// clobbering a newer registration.
    ///
    /// Returns whether an entry was actually removed; the refresh revision is
    /// only bumped in that case.
    pub fn dispose(self, session: &Session) -> bool {
        let mut custom = session.lock_custom();
        let matches = custom
            .get(&self.extension)
            .is_some_and(|entry| entry.command == self.command);
        if !matches {
            log::trace!("Stale dispose for '{}' ignored", self.extension);
            return false;
        }
        custom.remove(&self.extension);
        drop(custom);
        session.bump_refresh();
        true
    }
}
