//! Pillbox CLI
//!
//! `pillbox serve` runs the HTTP API with its retention worker;
//! `pillbox sweep` runs a single retention pass.

use anyhow::Context;
use clap::Parser;
use pillbox_server::cli::{Cli, Command};
use pillbox_server::config::PillboxConfig;
use pillbox_server::logging::init_tracing;
use pillbox_server::{run_sweep, start_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PillboxConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PillboxConfig::default(),
    };

    init_tracing(&config.logging);
    if cli.config.is_none() {
        tracing::warn!("No config file specified, using defaults");
    }

    match cli.command() {
        Command::Serve => start_server(config).await?,
        Command::Sweep => {
            let metrics = run_sweep(&config)?;
            let count = metrics.last_deleted.unwrap_or(0);
            if config.janitor.dry_run {
                println!("Would delete {} old entries.", count);
            } else {
                println!("Deleted {} old entries.", count);
            }
            println!("\n{}", metrics.summary());
        }
    }

    Ok(())
}
