// src/core/storage.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use walkdir::WalkDir;

use crate::core::descriptors;
use crate::models::{ScriptEntry, ScriptKind};
use crate::state::Session;

/// Lists the scripts in the vault: immediate file entries whose extension has
/// a handler (built-in or custom), sorted case-insensitively by name.
///
/// Subdirectories and files with no handler are silently skipped; they are
/// allowed to live in the directory, they just are not scripts.
pub fn list_scripts(session: &Session, dir: &Path) -> Result<Vec<ScriptEntry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to read '{}'", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(kind) = kind_for_file(session, entry.path()) else {
            log::trace!("Skipping '{name}': no handler for its extension");
            continue;
        };
        entries.push(ScriptEntry {
            name,
            label: kind.label().into_owned(),
            path: entry.into_path(),
        });
    }

    entries.sort_by_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Resolves the handler for a file from its extension, if it has one.
pub fn kind_for_file(session: &Session, path: &Path) -> Option<ScriptKind> {
    let extension = path.extension()?.to_string_lossy();
    descriptors::resolve(session, &extension)
}

/// Creates a new script file in the vault, refusing to overwrite.
///
/// The file is seeded with a minimal stub appropriate for its type so a fresh
/// script is immediately runnable.
pub fn create_script(dir: &Path, file_name: &str, kind: &ScriptKind) -> Result<PathBuf> {
    let path = dir.join(file_name);
    if path.exists() {
        return Err(anyhow!("Script '{}' already exists.", file_name));
    }
    fs::write(&path, stub_for(kind))
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    log::debug!("Created script at {}", path.display());
    Ok(path)
}

fn stub_for(kind: &ScriptKind) -> &'static str {
    match kind.extension() {
        ".sh" => "#!/usr/bin/env bash\nset -euo pipefail\n\n",
        ".py" => "#!/usr/bin/env python3\n\n",
        _ => "",
    }
}

/// Finds a script by name, tolerating an omitted extension.
///
/// An exact file-name match wins. Otherwise the name is matched against the
/// stems of the listed scripts; a unique match is used, an ambiguous one is
/// reported with all contenders.
pub fn find_script(session: &Session, dir: &Path, name: &str) -> Result<(ScriptEntry, ScriptKind)> {
    let exact = dir.join(name);
    if exact.is_file() {
        let kind = kind_for_file(session, &exact).ok_or_else(|| {
            anyhow!(
                "No interpreter is registered for '{}'. Known extensions: {}",
                name,
                descriptors::known_extensions(session).join(", ")
            )
        })?;
        let entry = ScriptEntry {
            name: name.to_string(),
            label: kind.label().into_owned(),
            path: exact,
        };
        return Ok((entry, kind));
    }

    let matches: Vec<ScriptEntry> = list_scripts(session, dir)?
        .into_iter()
        .filter(|entry| Path::new(&entry.name).file_stem().is_some_and(|s| s == name))
        .collect();

    if matches.len() > 1 {
        let names: Vec<String> = matches.into_iter().map(|e| e.name).collect();
        return Err(anyhow!(
            "Script name '{}' is ambiguous: {}. Use the full file name.",
            name,
            names.join(", ")
        ));
    }
    match matches.into_iter().next() {
        Some(entry) => {
            let kind = kind_for_file(session, &entry.path)
                .ok_or_else(|| anyhow!("No interpreter is registered for '{}'.", entry.name))?;
            Ok((entry, kind))
        }
        None => Err(anyhow!(
            "Script '{}' not found in '{}'. Try 'scriptorium list'.",
            name,
            dir.display()
        )),
    }
}
