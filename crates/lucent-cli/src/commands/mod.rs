//! CLI command implementations
//!
//! Commands are organized by engine:
//! - `insights` - Insight ranking (quick insights, sections, chips)
//! - `projection` - Cash-flow projection
//! - `dashboard` - Both engines over a snapshot pair
//! - `config` - Effective configuration display

pub mod config;
pub mod dashboard;
pub mod insights;
pub mod projection;

// Re-export command functions for main.rs
pub use config::*;
pub use dashboard::*;
pub use insights::*;
pub use projection::*;

use std::path::Path;

use anyhow::{Context, Result};
use lucent_core::{ConfigSource, EngineConfig};
use serde::Serialize;

/// Resolve the effective configuration
pub fn load_config(explicit: Option<&Path>) -> Result<(EngineConfig, ConfigSource)> {
    let (config, source) = EngineConfig::load(explicit).context("Failed to load configuration")?;
    tracing::debug!(source = %source, "Loaded configuration");
    Ok((config, source))
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
