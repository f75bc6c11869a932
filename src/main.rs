use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use plusvalenze::cli::{runner, Cli};

fn main() -> Result<()> {
    // Initialize logging on stderr so stdout stays clean for tables and JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color || cli.json || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let output = runner::run(&cli)?;
    println!("{}", output);
    Ok(())
}
