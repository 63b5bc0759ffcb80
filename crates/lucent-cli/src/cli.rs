//! CLI argument definitions using clap
//!
//! Command implementations live in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Lucent - Rank financial insights and project cash flow
#[derive(Parser)]
#[command(name = "lucent")]
#[command(about = "Insight ranking and cash-flow projection for personal finance", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to the data-dir override, then built-ins)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank an insight snapshot into quick insights, sections and chips
    Insights {
        /// Insight snapshot (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Number of quick insights (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Project cash flow from a transaction ledger
    Project {
        /// Ledger file (JSON or CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Current balance (overrides any balance in the file)
        #[arg(short, long, allow_negative_numbers = true)]
        balance: Option<f64>,
    },

    /// Build the full dashboard from an insight snapshot and a ledger
    Dashboard {
        /// Insight snapshot (JSON)
        #[arg(short, long)]
        insights: PathBuf,

        /// Ledger file (JSON or CSV)
        #[arg(short, long)]
        ledger: PathBuf,

        /// Current balance (overrides any balance in the ledger)
        #[arg(short, long, allow_negative_numbers = true)]
        balance: Option<f64>,
    },

    /// Show the effective configuration and where it came from
    Config,
}
