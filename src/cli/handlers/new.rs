// src/cli/handlers/new.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

use crate::cli::handlers::commons;
use crate::core::{descriptors, storage, validator};
use crate::models::ScriptKind;
use crate::state::Session;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Creates a new script in the vault.")]
struct NewArgs {
    /// The script name, with or without extension.
    name: String,

    /// Script type when the name does not carry a known extension (e.g. `--ext py`).
    #[arg(long, short)]
    ext: Option<String>,
}

pub fn handle(args: Vec<String>, session: &Session) -> Result<()> {
    let new_args = NewArgs::try_parse_from(&args)?;

    let (file_name, kind) = target_file(session, &new_args.name, new_args.ext.as_deref())?;
    validator::validate_script_name(&file_name)?;

    let dir = commons::scripts_dir(session)?;
    let path = storage::create_script(&dir, &file_name, &kind)?;

    println!(
        "\n{} Created {} ({}).",
        "✓".green(),
        path.display().to_string().cyan(),
        kind.label()
    );
    println!("  Run it with: {}", format!("scriptorium run {file_name}").green());
    Ok(())
}

/// Works out the final file name and its handler from the name and the
/// optional `--ext` flag.
fn target_file(session: &Session, name: &str, ext: Option<&str>) -> Result<(String, ScriptKind)> {
    if let Some(raw) = ext {
        let canonical = descriptors::normalize_extension(raw)
            .ok_or_else(|| anyhow!("Extension cannot be empty."))?;
        let kind = descriptors::resolve(session, &canonical).ok_or_else(|| {
            anyhow!(
                "No interpreter is registered for '{}'. Known extensions: {}",
                canonical,
                descriptors::known_extensions(session).join(", ")
            )
        })?;
        return Ok((
            validator::normalize_script_file_name(name, &canonical),
            kind,
        ));
    }

    let from_name = std::path::Path::new(name)
        .extension()
        .and_then(|e| descriptors::resolve(session, &e.to_string_lossy()));
    match from_name {
        Some(kind) => Ok((name.to_string(), kind)),
        None => Err(anyhow!(
            "Cannot tell the script type from '{}'. Use a known extension or pass --ext. Known extensions: {}",
            name,
            descriptors::known_extensions(session).join(", ")
        )),
    }
}
