//! Lucent CLI - Insight ranking and cash-flow projection
//!
//! Usage:
//!   lucent insights --file insights.json     Rank an insight snapshot
//!   lucent project --file ledger.csv         Project cash flow
//!   lucent dashboard -i insights.json -l ledger.json
//!   lucent config                            Show effective configuration

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let (config, source) = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Insights { file, limit } => commands::cmd_insights(&config, &file, limit, cli.json),
        Commands::Project { file, balance } => {
            commands::cmd_project(&config, &file, balance, cli.json)
        }
        Commands::Dashboard {
            insights,
            ledger,
            balance,
        } => commands::cmd_dashboard(&config, &insights, &ledger, balance, cli.json),
        Commands::Config => commands::cmd_config(&config, &source, cli.json),
    }
}
