use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Trigger/action workflow engine: evaluate price conditions every tick and
/// dispatch the trading actions wired to them.
#[derive(Parser)]
#[command(name = "trigger-flow", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Output the JSON schema of the graph snapshot format
    Schema,

    /// Validate a graph snapshot and report wiring warnings
    Validate {
        /// Path to the graph JSON file
        file: PathBuf,
    },

    /// Visualize a graph as ASCII or DOT
    Visualize {
        /// Path to the graph JSON file
        file: PathBuf,

        /// Output format: ascii (default) or dot
        #[arg(long, default_value = "ascii")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List all trigger and action kinds and their parameters
    ListNodes,

    /// Output an example graph JSON to stdout
    Example,

    /// Run a graph against the simulated price feed
    Run {
        /// Path to the graph JSON file
        file: PathBuf,

        /// Milliseconds between ticks
        #[arg(long, default_value = "3000", env = "TRIGGER_FLOW_INTERVAL_MS")]
        interval_ms: u64,

        /// Seed for the simulated feed (random if omitted)
        #[arg(long, env = "TRIGGER_FLOW_SEED")]
        seed: Option<u64>,

        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,

        /// Run a single tick then exit
        #[arg(long)]
        once: bool,

        /// Snapshot file written after every tick; resumed from if it exists
        #[arg(long)]
        state_file: Option<PathBuf>,

        /// Comma-separated symbols to simulate (default: SOL,BTC,ETH,BNB,ADA,XRP,DOT,DOGE)
        #[arg(long)]
        symbols: Option<String>,
    },
}
