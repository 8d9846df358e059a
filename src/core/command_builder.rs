// src/core/command_builder.rs
//
// Pure construction of the final shell command line. Script paths come from
// user-chosen file names, so quoting must survive spaces, quotes and shell
// metacharacters on both platform families.

use std::path::Path;

/// Quotes a value for POSIX shells: wrap in single quotes, escaping embedded
/// single quotes with the close-escape-reopen `'\''` technique.
pub fn quote_posix(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Quotes a value for cmd.exe-style parsing: wrap in double quotes, doubling
/// any embedded double quote.
pub fn quote_windows(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Quotes a value for the host platform's shell.
pub fn quote(value: &str) -> String {
    if cfg!(target_os = "windows") {
        quote_windows(value)
    } else {
        quote_posix(value)
    }
}

/// The default rule: `<interpreter> <quoted script path>`.
pub fn build_simple(interpreter: &str, script: &Path) -> String {
    format!("{} {}", interpreter, quote(&script.to_string_lossy()))
}

/// PowerShell needs fixed flags so a run is not derailed by the user's startup
/// profile or an execution-policy prompt; scripts in the vault are locally
/// authored, so bypassing the policy here is the intended behavior.
pub fn build_powershell(interpreter: &str, script: &Path) -> String {
    format!(
        "{} -NoProfile -ExecutionPolicy Bypass -File {}",
        interpreter,
        quote(&script.to_string_lossy())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_quote_posix_plain_and_spaces() {
        assert_eq!(quote_posix("/home/u/run.sh"), "'/home/u/run.sh'");
        assert_eq!(quote_posix("my script.sh"), "'my script.sh'");
    }

    #[test]
    fn test_quote_posix_embedded_single_quote() {
        // it's.sh -> 'it'\''s.sh'
        assert_eq!(quote_posix("it's.sh"), "'it'\\''s.sh'");
    }

    #[test]
    fn test_quote_posix_metacharacters_stay_literal() {
        assert_eq!(quote_posix("a;rm -rf$HOME`x`.sh"), "'a;rm -rf$HOME`x`.sh'");
    }

    #[test]
    fn test_quote_windows_doubles_embedded_quotes() {
        assert_eq!(quote_windows("my script.ps1"), "\"my script.ps1\"");
        assert_eq!(quote_windows("sa\"y.ps1"), "\"sa\"\"y.ps1\"");
    }

    #[test]
    fn test_build_simple() {
        let script = PathBuf::from("/tmp/my scripts/hello.py");
        let expected = format!("python3 {}", quote("/tmp/my scripts/hello.py"));
        assert_eq!(build_simple("python3", &script), expected);
    }

    #[test]
    fn test_build_powershell_injects_fixed_flags() {
        let script = PathBuf::from("/tmp/deploy.ps1");
        let command = build_powershell("pwsh", &script);
        assert!(command.starts_with("pwsh -NoProfile -ExecutionPolicy Bypass -File "));
        assert!(command.ends_with(&quote("/tmp/deploy.ps1")));
    }
}
