// src/models.rs

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::core::command_builder;

// --- Script Descriptors ---

/// A fixed, compile-time descriptor for a script type scriptorium handles natively.
///
/// Built-in descriptors are the single source of truth for how an extension maps
/// to its interpreter defaults and command construction. The table itself lives
/// in `core::descriptors`.
pub struct BuiltinDescriptor {
    /// Canonical extension key: lowercase, with the leading dot.
    pub extension: &'static str,
    /// Human-readable label shown in listings ("Python", "PowerShell", ...).
    pub label: &'static str,
    /// Optional editor language tag associated with this script type.
    pub language: Option<&'static str>,
    /// Settings key under `[interpreters]` that overrides candidate probing.
    pub settings_key: Option<&'static str>,
    /// Default interpreter candidates, tried in priority order.
    pub candidates: &'static [&'static str],
    /// Builds the final shell command line from (interpreter, script path).
    pub build: fn(&str, &Path) -> String,
}

impl fmt::Debug for BuiltinDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinDescriptor")
            .field("extension", &self.extension)
            .field("label", &self.label)
            .field("candidates", &self.candidates)
            .finish_non_exhaustive()
    }
}

/// A user-registered interpreter for an extension with no built-in support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomInterpreterEntry {
    /// Canonical extension key: lowercase, with the leading dot.
    pub extension: String,
    /// The interpreter command token, possibly with arguments (e.g. "npx tsx").
    pub command: String,
    pub label: Option<String>,
}

/// The resolved handler for a script extension.
///
/// Lookup order is always built-in table first, then the runtime custom
/// registry; a custom entry can never shadow a built-in.
#[derive(Debug)]
pub enum ScriptKind {
    Builtin(&'static BuiltinDescriptor),
    Custom(CustomInterpreterEntry),
}

impl ScriptKind {
    pub fn extension(&self) -> &str {
        match self {
            Self::Builtin(d) => d.extension,
            Self::Custom(e) => &e.extension,
        }
    }

    pub fn label(&self) -> Cow<'_, str> {
        match self {
            Self::Builtin(d) => Cow::Borrowed(d.label),
            Self::Custom(e) => match &e.label {
                Some(label) => Cow::Borrowed(label.as_str()),
                None => Cow::Owned(format!("Custom ({})", e.extension)),
            },
        }
    }

    pub fn language(&self) -> Option<&str> {
        match self {
            Self::Builtin(d) => d.language,
            Self::Custom(_) => None,
        }
    }

    /// The `[interpreters]` settings key honored before candidate probing.
    pub fn settings_key(&self) -> Option<&str> {
        match self {
            Self::Builtin(d) => d.settings_key,
            Self::Custom(_) => None,
        }
    }

    /// Default interpreter candidates in priority order. For a custom entry the
    /// registered command is the one and only candidate.
    pub fn candidates(&self) -> Vec<String> {
        match self {
            Self::Builtin(d) => d.candidates.iter().map(|c| (*c).to_string()).collect(),
            Self::Custom(e) => vec![e.command.clone()],
        }
    }

    /// Builds the final shell command line for this script type.
    pub fn build_command(&self, interpreter: &str, script: &Path) -> String {
        match self {
            Self::Builtin(d) => (d.build)(interpreter, script),
            Self::Custom(_) => command_builder::build_simple(interpreter, script),
        }
    }
}

// --- Run Tracking ---

/// Correlation token for one script execution.
///
/// Handles only need to be unique with overwhelming probability; a millisecond
/// timestamp prefix plus a random UUID suffix is plenty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunHandle(String);

impl RunHandle {
    pub fn new() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        Self(format!("{}-{}", millis, Uuid::new_v4()))
    }
}

impl Default for RunHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Terminal outcome of one supervised run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Exited(i32),
    /// The host could not report an exit code. Treated as success; see DESIGN.md.
    Unknown,
}

impl RunOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Unknown | Self::Exited(0))
    }

    pub fn code(self) -> Option<i32> {
        match self {
            Self::Exited(code) => Some(code),
            Self::Unknown => None,
        }
    }
}

// --- Listing ---

/// One script file in the vault, as shown by `list`.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptEntry {
    pub name: String,
    pub label: String,
    pub path: PathBuf,
}

// --- Settings ---

/// User-level settings, loaded from `~/.config/scriptorium/config.toml`.
///
/// Only the user-level file is ever honored. A workspace-level file in the
/// current directory is detected and ignored with a one-time warning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Where scripts live. Tilde-expanded; relative paths resolve against the
    /// home directory. Empty or unset means the platform default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_directory: Option<String>,

    #[serde(default)]
    pub interpreters: InterpreterOverrides,

    /// Custom interpreters fed through the registration API at startup,
    /// keyed by extension.
    #[serde(default)]
    pub custom: HashMap<String, CustomInterpreterConfig>,
}

/// Per-script-type interpreter overrides. A non-empty value short-circuits
/// candidate probing entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterpreterOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub powershell: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    #[serde(default, rename = "ts-node", skip_serializing_if = "Option::is_none")]
    pub ts_node: Option<String>,
}

impl InterpreterOverrides {
    /// Looks up an override by its descriptor settings key.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "powershell" => self.powershell.as_deref(),
            "bash" => self.bash.as_deref(),
            "python" => self.python.as_deref(),
            "node" => self.node.as_deref(),
            "ts-node" => self.ts_node.as_deref(),
            _ => None,
        }
    }
}

/// One `[custom]` settings entry: `".rb" = { command = "ruby", label = "Ruby" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomInterpreterConfig {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}
