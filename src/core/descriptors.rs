// src/core/descriptors.rs

use crate::core::command_builder;
use crate::models::{BuiltinDescriptor, ScriptKind};
use crate::state::Session;

/// The fixed table of natively supported script types.
///
/// Order matters only for display; lookups are exact-match on the canonical
/// extension. Candidates are probed in the order given here.
pub static BUILTIN_DESCRIPTORS: &[BuiltinDescriptor] = &[
    BuiltinDescriptor {
        extension: ".ps1",
        label: "PowerShell",
        language: Some("powershell"),
        settings_key: Some("powershell"),
        candidates: &["pwsh", "powershell"],
        build: command_builder::build_powershell,
    },
    BuiltinDescriptor {
        extension: ".sh",
        label: "Shell",
        language: Some("shellscript"),
        settings_key: Some("bash"),
        candidates: &["bash", "sh"],
        build: command_builder::build_simple,
    },
    BuiltinDescriptor {
        extension: ".py",
        label: "Python",
        language: Some("python"),
        settings_key: Some("python"),
        candidates: &["python3", "python"],
        build: command_builder::build_simple,
    },
    BuiltinDescriptor {
        extension: ".js",
        label: "JavaScript",
        language: Some("javascript"),
        settings_key: Some("node"),
        candidates: &["node"],
        build: command_builder::build_simple,
    },
    BuiltinDescriptor {
        extension: ".ts",
        label: "TypeScript",
        language: Some("typescript"),
        settings_key: Some("ts-node"),
        candidates: &["ts-node", "npx ts-node"],
        build: command_builder::build_simple,
    },
];

/// Normalizes an extension to its canonical form: trimmed, lowercased, with a
/// single leading dot. Returns `None` when nothing usable remains.
///
/// Every lookup and insert goes through this, so `rb`, `.RB` and ` .rb `
/// all address the same registry slot.
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!(".{}", trimmed.to_lowercase()))
}

pub fn is_builtin_extension(canonical: &str) -> bool {
    BUILTIN_DESCRIPTORS.iter().any(|d| d.extension == canonical)
}

/// Resolves the handler for an extension: built-in table first, then the
/// session's custom registry.
pub fn resolve(session: &Session, extension: &str) -> Option<ScriptKind> {
    let ext = normalize_extension(extension)?;
    if let Some(descriptor) = BUILTIN_DESCRIPTORS.iter().find(|d| d.extension == ext) {
        return Some(ScriptKind::Builtin(descriptor));
    }
    session.custom_entry(&ext).map(ScriptKind::Custom)
}

/// Every extension currently handled, built-ins first, for error hints.
pub fn known_extensions(session: &Session) -> Vec<String> {
    let mut extensions: Vec<String> = BUILTIN_DESCRIPTORS
        .iter()
        .map(|d| d.extension.to_string())
        .collect();
    extensions.extend(session.custom_entries().into_iter().map(|e| e.extension));
    extensions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Settings;
    use std::path::Path;

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("py").as_deref(), Some(".py"));
        assert_eq!(normalize_extension(".PY").as_deref(), Some(".py"));
        assert_eq!(normalize_extension("  .Rb  ").as_deref(), Some(".rb"));
        assert_eq!(normalize_extension(""), None);
        assert_eq!(normalize_extension("  ."), None);
    }

    #[test]
    fn test_builtin_lookup_is_case_insensitive() {
        let session = Session::new(Settings::default());
        let kind = resolve(&session, ".Ps1").unwrap();
        assert_eq!(kind.extension(), ".ps1");
        assert_eq!(kind.label(), "PowerShell");
    }

    #[test]
    fn test_unknown_extension_resolves_to_none() {
        let session = Session::new(Settings::default());
        assert!(resolve(&session, ".txt").is_none());
    }

    #[test]
    fn test_custom_lookup_synthesizes_label() {
        let session = Session::new(Settings::default());
        session.register_interpreter(".rb", "ruby", None).unwrap();

        let kind = resolve(&session, "RB").unwrap();
        assert_eq!(kind.label(), "Custom (.rb)");
        assert_eq!(kind.candidates(), vec!["ruby".to_string()]);
    }

    #[test]
    fn test_custom_command_builder_quotes_path() {
        let session = Session::new(Settings::default());
        session.register_interpreter(".rb", "ruby", None).unwrap();
        let kind = resolve(&session, ".rb").unwrap();

        let command = kind.build_command("ruby", Path::new("/tmp/it's here/x.rb"));
        let expected = format!("ruby {}", command_builder::quote("/tmp/it's here/x.rb"));
        assert_eq!(command, expected);
    }

    #[test]
    fn test_powershell_builder_is_wired_to_descriptor() {
        let session = Session::new(Settings::default());
        let kind = resolve(&session, ".ps1").unwrap();
        let command = kind.build_command("pwsh", Path::new("x.ps1"));
        assert!(command.contains("-NoProfile -ExecutionPolicy Bypass -File"));
    }

    #[test]
    fn test_known_extensions_lists_builtins_then_customs() {
        let session = Session::new(Settings::default());
        session.register_interpreter(".rb", "ruby", None).unwrap();
        let known = known_extensions(&session);
        assert!(known.contains(&".py".to_string()));
        assert_eq!(known.last().map(String::as_str), Some(".rb"));
    }
}
