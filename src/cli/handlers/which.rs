// src/cli/handlers/which.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::cli::handlers::commons;
use crate::core::resolver;
use crate::state::Session;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Shows how a script would be run, without running it."
)]
struct WhichArgs {
    /// Script name, with or without extension.
    script: String,
}

pub async fn handle(args: Vec<String>, session: &Session) -> Result<()> {
    let which_args = WhichArgs::try_parse_from(&args)?;
    let (entry, kind) = commons::locate_script(session, &which_args.script)?;

    let field = |label: &str| format!("{label:<12}").dimmed();
    println!("\n{}{}", field("script"), entry.path.display());
    println!("{}{}", field("type"), kind.label());

    match resolver::resolve_interpreter(session, &kind).await {
        Some(interpreter) => {
            let command = kind.build_command(&interpreter, &entry.path);
            println!("{}{}", field("interpreter"), interpreter);
            println!("{}{}", field("command"), command.green());
        }
        None => {
            println!(
                "{}{} (tried: {})",
                field("interpreter"),
                "not found".red(),
                kind.candidates().join(", ")
            );
        }
    }
    Ok(())
}
