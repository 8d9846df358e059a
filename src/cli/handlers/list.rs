// src/cli/handlers/list.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::cli::handlers::commons;
use crate::core::storage;
use crate::models::ScriptEntry;
use crate::state::Session;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists the scripts in the vault.")]
struct ListArgs {
    /// Emit the listing as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

pub fn handle(args: Vec<String>, session: &Session) -> Result<()> {
    let list_args = ListArgs::try_parse_from(&args)?;
    let dir = commons::scripts_dir(session)?;

    let entries = match storage::list_scripts(session, &dir) {
        Ok(entries) => entries,
        Err(e) => {
            // An unreadable vault is reported once per process and the
            // listing degrades to empty rather than aborting.
            log::warn!("Could not list '{}': {e:#}", dir.display());
            if session.warn_once_unreadable_dir() {
                eprintln!(
                    "{} {}",
                    "Warning:".yellow().bold(),
                    format!("could not read the scripts directory: {e:#}").yellow()
                );
            }
            Vec::new()
        }
    };

    if list_args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    print_table(&dir, &entries);
    Ok(())
}

fn print_table(dir: &std::path::Path, entries: &[ScriptEntry]) {
    println!("\n{}", format!("Scripts in {}", dir.display()).bold());
    if entries.is_empty() {
        println!("  (none yet — create one with 'scriptorium new <name>')");
        return;
    }
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in entries {
        // Pad before coloring; ANSI escapes would throw the column off.
        println!(
            "  {}  {}",
            format!("{:<width$}", entry.name).cyan(),
            format!("[{}]", entry.label).dimmed()
        );
    }
}
