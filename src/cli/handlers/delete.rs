// src/cli/handlers/delete.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};
use std::fs;

use crate::cli::handlers::commons;
use crate::state::Session;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Deletes a script from the vault.")]
struct DeleteArgs {
    /// Script name, with or without extension.
    script: String,

    /// Skip the confirmation prompt.
    #[arg(long, short)]
    yes: bool,
}

pub fn handle(args: Vec<String>, session: &Session) -> Result<()> {
    let delete_args = DeleteArgs::try_parse_from(&args)?;
    let (entry, _) = commons::locate_script(session, &delete_args.script)?;

    if !delete_args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete '{}'? This cannot be undone.", entry.name))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("\nOperation cancelled.");
            return Ok(());
        }
    }

    fs::remove_file(&entry.path)
        .with_context(|| format!("Failed to delete '{}'", entry.path.display()))?;
    println!("\n{} Deleted '{}'.", "✓".green(), entry.name);
    Ok(())
}
