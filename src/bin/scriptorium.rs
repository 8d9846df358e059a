// src/bin/scriptorium.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;
use scriptorium::cli::{Cli, handlers};

// --- Command Definition and Registry ---

/// Defines a system command and its aliases. Dispatch itself happens in
/// `run_cli`; this table is the single source of truth for what counts as a
/// command (anything else is a script name).
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
}

static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition { name: "delete", aliases: &["del", "rm"] },
    CommandDefinition { name: "edit", aliases: &[] },
    CommandDefinition { name: "interpreters", aliases: &["int"] },
    CommandDefinition { name: "list", aliases: &["ls"] },
    CommandDefinition { name: "new", aliases: &["add"] },
    CommandDefinition { name: "run", aliases: &[] },
    CommandDefinition { name: "which", aliases: &[] },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// The main entry point: sets up logging, parses arguments, dispatches to the
/// correct handler, and performs centralized error handling.
#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()).await {
        // Every failure funnels through here; nothing below is fatal on its own.
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Routes the invocation: a known command dispatches to its handler, anything
/// else is treated as a script name and becomes a `run`.
async fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {cli:?}");
    let session = handlers::commons::bootstrap_session()?;

    let Some(first) = cli.command_or_script else {
        // Bare `scriptorium` shows the vault.
        return handlers::list::handle(Vec::new(), &session);
    };

    let (action, action_args) = if let Some(command) = find_command(&first) {
        (command.name, cli.args)
    } else {
        let mut run_args = vec![first];
        run_args.extend(cli.args);
        ("run", run_args)
    };

    match action {
        "delete" => handlers::delete::handle(action_args, &session),
        "edit" => handlers::edit::handle(action_args, &session).await,
        "interpreters" => handlers::interpreters::handle(action_args, &session).await,
        "list" => handlers::list::handle(action_args, &session),
        "new" => handlers::new::handle(action_args, &session),
        "run" => handlers::run::handle(action_args, &session).await,
        "which" => handlers::which::handle(action_args, &session).await,
        other => Err(anyhow!("Unknown command '{other}'.")),
    }
}
