// src/cli/handlers/interpreters.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::core::{descriptors, resolver};
use crate::models::ScriptKind;
use crate::state::Session;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Shows every known script type and the interpreter it resolves to."
)]
struct InterpretersArgs {}

pub async fn handle(args: Vec<String>, session: &Session) -> Result<()> {
    InterpretersArgs::try_parse_from(&args)?;

    println!("\n{}", "Built-in script types".bold());
    for descriptor in descriptors::BUILTIN_DESCRIPTORS {
        print_row(session, &ScriptKind::Builtin(descriptor)).await;
    }

    let customs = session.custom_entries();
    if !customs.is_empty() {
        println!("\n{}", "Custom script types".bold());
        for entry in customs {
            print_row(session, &ScriptKind::Custom(entry)).await;
        }
    }
    Ok(())
}

async fn print_row(session: &Session, kind: &ScriptKind) {
    let resolved = match resolver::resolve_interpreter(session, kind).await {
        Some(interpreter) => interpreter.green(),
        None => format!("not found (tried: {})", kind.candidates().join(", ")).red(),
    };
    println!(
        "  {}  {}  {}",
        format!("{:<5}", kind.extension()).cyan(),
        format!("{:<14}", kind.label()),
        resolved
    );
}
