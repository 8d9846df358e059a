// src/core/validator.rs
//
// Pure validation of user-entered script names. Names become real files in the
// vault directory, so they must be safe on every platform the vault could be
// synced to, not just the current one. That makes the Windows rules (reserved
// basenames, trailing space/period) unconditional.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    // Forbidden anywhere in a file name: path separators, Windows-reserved
    // punctuation and C0 control characters.
    static ref INVALID_CHARS: Regex = Regex::new(r#"[<>:"/\\|?*\x00-\x1F]"#).unwrap();
    static ref RESERVED_BASENAMES: Regex =
        Regex::new(r"(?i)^(con|prn|aux|nul|com[1-9]|lpt[1-9])$").unwrap();
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Script name cannot be empty.")]
    Empty,
    #[error("Script name cannot contain '/' or '\\'.")]
    PathSeparator,
    #[error("Script name contains characters that are not allowed in file names.")]
    InvalidCharacters,
    #[error("Script name cannot end with a space or a period.")]
    TrailingSpaceOrPeriod,
    #[error("'{0}' is a reserved name and cannot be used.")]
    Reserved(String),
}

/// Validates a script file name (with or without extension).
pub fn validate_script_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Empty);
    }
    if name == "." || name == ".." {
        return Err(ValidationError::Reserved(name.to_string()));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(ValidationError::PathSeparator);
    }
    if INVALID_CHARS.is_match(name) {
        return Err(ValidationError::InvalidCharacters);
    }
    if name.ends_with(' ') || name.ends_with('.') {
        return Err(ValidationError::TrailingSpaceOrPeriod);
    }
    // Windows reserves these regardless of extension: `con.ps1` is as
    // unusable as `con`.
    let basename = name.split('.').next().unwrap_or(name);
    if RESERVED_BASENAMES.is_match(basename) {
        return Err(ValidationError::Reserved(name.to_string()));
    }
    Ok(())
}

/// Appends `extension` to `name` unless it already carries it
/// (case-insensitively). Idempotent: normalizing an already-normalized name
/// returns it unchanged.
///
/// `extension` must be canonical (lowercase, leading dot).
pub fn normalize_script_file_name(name: &str, extension: &str) -> String {
    if name.to_lowercase().ends_with(extension) {
        name.to_string()
    } else {
        format!("{name}{extension}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names_pass() {
        assert!(validate_script_name("my-script").is_ok());
        assert!(validate_script_name("my-script.ps1").is_ok());
        assert!(validate_script_name("backup_2024.sh").is_ok());
        assert!(validate_script_name("constants.py").is_ok());
    }

    #[test]
    fn test_empty_and_dot_names_fail() {
        assert_eq!(validate_script_name(""), Err(ValidationError::Empty));
        assert!(matches!(validate_script_name("."), Err(ValidationError::Reserved(_))));
        assert!(matches!(validate_script_name(".."), Err(ValidationError::Reserved(_))));
    }

    #[test]
    fn test_path_separators_fail() {
        assert_eq!(validate_script_name("a/b.sh"), Err(ValidationError::PathSeparator));
        assert_eq!(validate_script_name("a\\b.sh"), Err(ValidationError::PathSeparator));
    }

    #[test]
    fn test_control_and_reserved_characters_fail() {
        assert_eq!(validate_script_name("a\tb.sh"), Err(ValidationError::InvalidCharacters));
        assert_eq!(validate_script_name("a:b.sh"), Err(ValidationError::InvalidCharacters));
        assert_eq!(validate_script_name("a*b.sh"), Err(ValidationError::InvalidCharacters));
        assert_eq!(validate_script_name("a\"b.sh"), Err(ValidationError::InvalidCharacters));
    }

    #[test]
    fn test_trailing_space_or_period_fails() {
        assert_eq!(
            validate_script_name("script "),
            Err(ValidationError::TrailingSpaceOrPeriod)
        );
        assert_eq!(
            validate_script_name("script."),
            Err(ValidationError::TrailingSpaceOrPeriod)
        );
    }

    #[test]
    fn test_windows_reserved_basenames_fail() {
        for name in ["con", "NUL", "com1", "lpt9", "con.ps1", "aux.sh"] {
            assert!(
                matches!(validate_script_name(name), Err(ValidationError::Reserved(_))),
                "expected '{name}' to be rejected"
            );
        }
    }

    #[test]
    fn test_normalize_appends_extension() {
        assert_eq!(normalize_script_file_name("script", ".ps1"), "script.ps1");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        assert_eq!(normalize_script_file_name("script.ps1", ".ps1"), "script.ps1");
        // Case-insensitive: an existing extension in another case is kept.
        assert_eq!(normalize_script_file_name("script.PS1", ".ps1"), "script.PS1");
    }
}
