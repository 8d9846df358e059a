// src/cli/handlers/run.rs

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::Colorize;

use crate::cli::handlers::commons;
use crate::core::resolver;
use crate::models::{RunHandle, RunOutcome};
use crate::state::Session;
use crate::system::supervisor::RunSupervisor;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Runs a script through its matching interpreter.")]
struct RunArgs {
    /// Script name, with or without extension.
    script: String,
}

pub async fn handle(args: Vec<String>, session: &Session) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;
    let (entry, kind) = commons::locate_script(session, &run_args.script)?;

    // Resolution failure means the run is never launched.
    let Some(interpreter) = resolver::resolve_interpreter(session, &kind).await else {
        let mut message = format!(
            "No interpreter found for '{}' ({}). Tried: {}.",
            entry.name,
            kind.label(),
            kind.candidates().join(", ")
        );
        if let Some(key) = kind.settings_key() {
            message.push_str(&format!(
                " Set [interpreters] {key} in your settings to point at one."
            ));
        }
        return Err(anyhow!(message));
    };

    let command = kind.build_command(&interpreter, &entry.path);
    let dir = entry
        .path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    println!("{} {}", "→".blue(), command.green());
    let supervisor = RunSupervisor::new();
    let outcome = supervisor
        .execute(&command, &dir, RunHandle::new())
        .await
        .with_context(|| format!("Failed to run '{}'", entry.name))?;

    match outcome {
        RunOutcome::Exited(0) => {
            println!("\n{} '{}' finished successfully.", "✓".green(), entry.name);
        }
        RunOutcome::Unknown => {
            // No exit code reported by the host; treated as success.
            println!("\n{} '{}' finished (exit status unknown).", "✓".green(), entry.name);
        }
        RunOutcome::Exited(code) => {
            println!(
                "\n{} '{}' finished with exit code {}.",
                "!".yellow().bold(),
                entry.name,
                code.to_string().yellow()
            );
            // Hand the script's code on to our own caller.
            std::process::exit(code);
        }
    }
    Ok(())
}
