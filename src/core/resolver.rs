// src/core/resolver.rs
//
// Maps a script kind to the interpreter command that will run it: a configured
// override wins outright, else the first default candidate that actually
// exists in the environment. Probing must never execute a candidate; listing
// the vault should have zero side effects.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::models::ScriptKind;
use crate::state::Session;

/// Extracts the leading executable token from a command string.
///
/// A leading single or double quote delimits the token (so `"C:\Program
/// Files\pwsh.exe" -NoLogo` yields the quoted path); otherwise the token ends
/// at the first whitespace run. An unterminated quote swallows the rest of
/// the string.
pub fn leading_token(command: &str) -> Option<&str> {
    let trimmed = command.trim();
    let mut chars = trimmed.chars();
    match chars.next()? {
        quote @ ('"' | '\'') => {
            let rest = chars.as_str();
            match rest.find(quote) {
                Some(end) => rest.get(..end),
                None => Some(rest),
            }
        }
        _ => trimmed.split_whitespace().next(),
    }
}

/// Tests whether an interpreter candidate exists, without executing it.
///
/// Absolute paths are checked directly on the filesystem. Anything else is
/// handed to the platform's PATH-search utility; a nonzero exit or a failure
/// to run the utility both count as "not available".
pub async fn is_available(candidate: &str) -> bool {
    let Some(token) = leading_token(candidate) else {
        return false;
    };
    let token_path = Path::new(token);
    if token_path.is_absolute() {
        return token_path.exists();
    }

    let lookup = if cfg!(target_os = "windows") { "where" } else { "which" };
    match Command::new(lookup)
        .arg(token)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
    {
        Ok(status) => status.success(),
        Err(e) => {
            log::debug!("PATH lookup via '{lookup}' failed for '{token}': {e}");
            false
        }
    }
}

/// Resolves the interpreter command for a script kind.
///
/// A non-empty `[interpreters]` override is returned immediately, without
/// probing: the user said so. Otherwise the default candidates are probed in
/// order and the first available one wins. `None` means the caller must
/// report "no interpreter found" and abort the run.
pub async fn resolve_interpreter(session: &Session, kind: &ScriptKind) -> Option<String> {
    if let Some(key) = kind.settings_key() {
        if let Some(configured) = session.settings.interpreters.get(key) {
            let configured = configured.trim();
            if !configured.is_empty() {
                log::debug!("Using configured interpreter '{configured}' for '{key}'");
                return Some(configured.to_string());
            }
        }
    }

    for candidate in kind.candidates() {
        if is_available(&candidate).await {
            log::debug!("Interpreter candidate '{candidate}' is available");
            return Some(candidate);
        }
        log::trace!("Interpreter candidate '{candidate}' not found");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InterpreterOverrides, Settings};
    use crate::core::descriptors;

    #[test]
    fn test_leading_token_plain() {
        assert_eq!(leading_token("python3"), Some("python3"));
        assert_eq!(leading_token("  npx ts-node  "), Some("npx"));
        assert_eq!(leading_token(""), None);
        assert_eq!(leading_token("   "), None);
    }

    #[test]
    fn test_leading_token_quoted() {
        assert_eq!(
            leading_token(r#""C:\Program Files\pwsh.exe" -NoLogo"#),
            Some(r"C:\Program Files\pwsh.exe")
        );
        assert_eq!(leading_token("'/opt/my python/bin/python'"), Some("/opt/my python/bin/python"));
        // Unterminated quote swallows the remainder.
        assert_eq!(leading_token("\"C:\\pwsh.exe"), Some("C:\\pwsh.exe"));
    }

    #[tokio::test]
    async fn test_absolute_path_availability_is_an_existence_check() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().into_owned();
        assert!(is_available(&path).await);

        let gone = file.path().with_extension("missing");
        assert!(!is_available(&gone.to_string_lossy()).await);
    }

    #[tokio::test]
    async fn test_nonexistent_command_is_unavailable() {
        assert!(!is_available("scriptorium-test-no-such-interpreter-a8f2").await);
    }

    #[tokio::test]
    async fn test_override_short_circuits_probing() {
        let settings = Settings {
            interpreters: InterpreterOverrides {
                python: Some("  /nonexistent/python9  ".to_string()),
                ..InterpreterOverrides::default()
            },
            ..Settings::default()
        };
        let session = Session::new(settings);
        let kind = descriptors::resolve(&session, ".py").unwrap();

        // The override is trusted verbatim (trimmed), even though it would
        // never pass the availability probe.
        assert_eq!(
            resolve_interpreter(&session, &kind).await.as_deref(),
            Some("/nonexistent/python9")
        );
    }

    #[tokio::test]
    async fn test_custom_kind_resolves_through_its_command() {
        let session = Session::new(Settings::default());
        let file = tempfile::NamedTempFile::new().unwrap();
        let interp = file.path().to_string_lossy().into_owned();
        session.register_interpreter(".xyz", &interp, None).unwrap();

        let kind = descriptors::resolve(&session, ".xyz").unwrap();
        assert_eq!(resolve_interpreter(&session, &kind).await, Some(interp));
    }

    #[tokio::test]
    async fn test_no_candidate_available_resolves_to_none() {
        let session = Session::new(Settings::default());
        session
            .register_interpreter(".xyz", "scriptorium-test-no-such-interpreter-b7e1", None)
            .unwrap();
        let kind = descriptors::resolve(&session, ".xyz").unwrap();
        assert_eq!(resolve_interpreter(&session, &kind).await, None);
    }
}
