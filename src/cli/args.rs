// src/cli/args.rs

use clap::Parser;

/// scriptorium: a personal script vault and runner.
///
/// The first argument is either a command (`list`, `new`, `run`, `which`,
/// `edit`, `delete`, `interpreters`) or, as a shortcut, the name of a script
/// to run:
///
/// - `scriptorium backup` expands to `scriptorium run backup`
/// - `scriptorium` alone lists the vault
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// A command name, or a script name as a shortcut for `run`.
    pub command_or_script: Option<String>,

    /// All remaining arguments, handed to the selected command's own parser.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
