// src/core/settings.rs

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::constants::{SETTINGS_FILENAME, WORKSPACE_SETTINGS_FILENAMES};
use crate::core::paths::{self, PathError};
use crate::models::Settings;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("Failed to parse '{path}': {source}")]
    TomlParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize default settings: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Loads the user-level settings file, writing a default one on first use so
/// the user has something concrete to edit.
pub fn load_settings() -> Result<Settings, SettingsError> {
    let settings_path = paths::get_config_dir()?.join(SETTINGS_FILENAME);
    if !settings_path.exists() {
        let defaults = Settings::default();
        let toml_string = toml::to_string_pretty(&defaults)?;
        fs::write(&settings_path, toml_string)?;
        log::debug!("Seeded default settings at {}", settings_path.display());
        return Ok(defaults);
    }

    let content = fs::read_to_string(&settings_path)?;
    toml::from_str(&content).map_err(|e| SettingsError::TomlParse {
        path: settings_path.display().to_string(),
        source: e,
    })
}

/// Returns the first workspace-level settings file present in `dir`, if any.
///
/// Workspace-level settings are never honored: only the user-level value (or
/// its built-in default) participates in resolution. The caller surfaces a
/// one-time warning when this returns `Some`.
pub fn workspace_settings_in(dir: &Path) -> Option<PathBuf> {
    WORKSPACE_SETTINGS_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_settings_detection() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(workspace_settings_in(tmp.path()).is_none());

        let file = tmp.path().join("scriptorium.toml");
        fs::write(&file, "script_directory = \"~/elsewhere\"\n").unwrap();
        assert_eq!(workspace_settings_in(tmp.path()), Some(file));
    }

    #[test]
    fn test_settings_roundtrip_with_custom_table() {
        let text = r#"
            script_directory = "~/scripts"

            [interpreters]
            python = "python3.12"
            "ts-node" = "npx tsx"

            [custom.".rb"]
            command = "ruby"
            label = "Ruby"
        "#;
        let settings: Settings = toml::from_str(text).unwrap();
        assert_eq!(settings.script_directory.as_deref(), Some("~/scripts"));
        assert_eq!(settings.interpreters.get("python"), Some("python3.12"));
        assert_eq!(settings.interpreters.get("ts-node"), Some("npx tsx"));
        assert_eq!(settings.custom[".rb"].command, "ruby");
    }

    #[test]
    fn test_missing_sections_default() {
        let settings: Settings = toml::from_str("").unwrap();
        assert!(settings.script_directory.is_none());
        assert!(settings.interpreters.get("bash").is_none());
        assert!(settings.custom.is_empty());
    }
}
