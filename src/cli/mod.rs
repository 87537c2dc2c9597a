//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::{Config, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// UI State Machine CLI
#[derive(Parser, Debug)]
#[command(name = "ui-fsm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Folder holding states.csv and transitions.csv (overrides config)
    #[arg(short, long, global = true, env = "UI_FSM_MACHINE")]
    pub machine: Option<PathBuf>,

    /// Log level (overrides config, RUST_LOG overrides both)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the states, transitions and shape of a machine
    Inspect {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Find the shortest path between two states
    Path {
        /// Destination state name
        #[arg(short, long)]
        to: String,

        /// Start state name (initial state if omitted)
        #[arg(short, long)]
        from: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// List the states an action may lead to
    Simulate {
        /// Action label; epsilon when omitted
        #[arg(short, long)]
        action: Option<String>,

        /// State to simulate from (initial state if omitted)
        #[arg(short, long)]
        from: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Replay a trace of observed states against the machine
    Drive {
        /// CSV trace with one `state[,confidence]` row per observation
        trace: PathBuf,

        /// Polling interval in milliseconds (overrides config)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Stop once this state is entered (overrides config)
        #[arg(long)]
        until: Option<String>,

        /// Ignore observations below this confidence (overrides config)
        #[arg(long)]
        min_confidence: Option<f32>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
}

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// DOT format (Graphviz), inspect only
    Dot,
    /// Plain text table
    Table,
}

/// Execute the CLI command
pub async fn execute(args: Cli, config: Config) -> Result<()> {
    match args.command {
        Commands::Inspect { .. } => commands::inspect::execute(args, config),
        Commands::Path { .. } => commands::path::execute(args, config),
        Commands::Simulate { .. } => commands::simulate::execute(args, config),
        Commands::Drive { .. } => commands::drive::execute(args, config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["ui-fsm", "--machine", "resources/menu", "inspect"]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["ui-fsm", "path", "--to", "bag", "-o", "json"]).unwrap();
        match cli.command {
            Commands::Path { to, from, output } => {
                assert_eq!(to, "bag");
                assert_eq!(from, None);
                assert_eq!(output, OutputFormat::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_simulate_defaults_to_epsilon() {
        let cli = Cli::try_parse_from(["ui-fsm", "simulate", "--from", "menu"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Simulate { action: None, .. }
        ));
    }

    #[test]
    fn test_drive_requires_trace() {
        assert!(Cli::try_parse_from(["ui-fsm", "drive"]).is_err());
        assert!(Cli::try_parse_from(["ui-fsm", "drive", "trace.csv", "--until", "bag"]).is_ok());
    }
}
