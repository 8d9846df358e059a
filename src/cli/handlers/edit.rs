// src/cli/handlers/edit.rs

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::env;

use crate::cli::handlers::commons;
use crate::state::Session;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Opens a script in your editor.")]
struct EditArgs {
    /// Script name, with or without extension.
    script: String,
}

pub async fn handle(args: Vec<String>, session: &Session) -> Result<()> {
    let edit_args = EditArgs::try_parse_from(&args)?;
    let (entry, _) = commons::locate_script(session, &edit_args.script)?;

    let editor = preferred_editor();
    // $VISUAL/$EDITOR may carry arguments ("code --wait"), so split properly.
    let parts = shlex::split(&editor)
        .ok_or_else(|| anyhow!("Could not parse editor command '{editor}'."))?;
    let (program, editor_args) = parts
        .split_first()
        .ok_or_else(|| anyhow!("Editor command is empty; set $EDITOR."))?;

    log::debug!("Opening {} with '{}'", entry.path.display(), editor);
    let status = tokio::process::Command::new(program)
        .args(editor_args)
        .arg(&entry.path)
        .status()
        .await
        .with_context(|| format!("Failed to launch editor '{program}'"))?;

    if !status.success() {
        log::warn!("Editor exited with {:?}", status.code());
    }
    Ok(())
}

fn preferred_editor() -> String {
    for var in ["VISUAL", "EDITOR"] {
        if let Ok(value) = env::var(var) {
            if !value.trim().is_empty() {
                return value;
            }
        }
    }
    if cfg!(target_os = "windows") {
        "notepad".to_string()
    } else {
        "vi".to_string()
    }
}
