//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pillbox - Pill identification catalog with automatic retention.
#[derive(Debug, Parser)]
#[command(name = "pillbox")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, global = true, env = "PILLBOX_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Serve the HTTP API and run the retention worker (default)
    Serve,

    /// Run one retention pass and exit
    Sweep,
}

impl Cli {
    /// The subcommand to run, `serve` when none was given
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli::try_parse_from(["pillbox"]).unwrap();
        assert_eq!(cli.command(), Command::Serve);
    }

    #[test]
    fn test_sweep_with_config() {
        let cli = Cli::try_parse_from(["pillbox", "sweep", "--config", "pillbox.toml"]).unwrap();
        assert_eq!(cli.command(), Command::Sweep);
        assert_eq!(cli.config, Some(PathBuf::from("pillbox.toml")));
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["pillbox", "migrate"]).is_err());
    }
}
