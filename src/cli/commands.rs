//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Browse and approve transactions
#[derive(Parser, Debug)]
#[command(name = "txn-approvals")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL (overrides the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Page through transactions
    List {
        /// Number of pages to fetch
        #[arg(short, long, default_value = "1", conflicts_with = "all")]
        pages: usize,

        /// Fetch until the last page
        #[arg(long)]
        all: bool,
    },

    /// Approve a transaction
    Approve {
        /// Transaction ID
        transaction_id: String,

        /// Revoke the approval instead of granting it
        #[arg(long)]
        revoke: bool,
    },

    /// Print the effective configuration
    Config,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable output
    Pretty,
}
