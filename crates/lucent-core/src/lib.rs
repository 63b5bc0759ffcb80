//! Lucent Core Library
//!
//! Presentation-side engines for the Lucent personal finance dashboard:
//! - Insight ranking: merge, quick insights, sections, summary chips
//! - Cash-flow projection from a transaction ledger
//! - Domain and family taxonomy registry
//! - Layered TOML configuration for every tunable
//! - Snapshot loading (JSON and CSV) and content fingerprints

pub mod config;
pub mod dashboard;
pub mod error;
pub mod fingerprint;
pub mod format;
pub mod insights;
pub mod ledger;
pub mod models;
pub mod projection;
pub mod registry;

#[cfg(test)]
mod test_utils;

pub use config::{ConfigSource, EngineConfig};
pub use dashboard::Dashboard;
pub use error::{Error, Result};
pub use fingerprint::Fingerprints;
pub use insights::{InsightEngine, InsightView, Sections, SummaryChip};
pub use models::{InsightSnapshot, LedgerSnapshot, MergedInsight, Priority, TransactionRecord};
pub use projection::{CashFlowProjection, DataGap, Projection, ProjectionEngine};
