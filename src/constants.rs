// src/constants.rs

/// The name of the scriptorium configuration directory under the system config dir.
pub const APP_DIR: &str = "scriptorium";

/// The name of the user-level settings file (inside ~/.config/scriptorium/).
pub const SETTINGS_FILENAME: &str = "config.toml";

/// Workspace-level settings files that are detected but never honored.
pub const WORKSPACE_SETTINGS_FILENAMES: &[&str] = &["scriptorium.toml", ".scriptorium.toml"];

/// The default scripts subdirectory under the system data dir.
pub const SCRIPTS_SUBDIR: &str = "scripts";
