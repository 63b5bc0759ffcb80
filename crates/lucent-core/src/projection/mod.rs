//! Cash-flow projection
//!
//! Buckets a ledger by calendar month, derives average income, spending and
//! volatility over the recent window, then reconstructs past month-end
//! balances from the current one and extends the average net forward with a
//! widening uncertainty band.
//!
//! A ledger with no balance or no transactions is still `collecting`; one
//! with fewer populated months than the configured minimum is `insufficient`.

mod buckets;
mod engine;
mod stats;
mod types;

pub use buckets::{bucket_transactions, MonthBucket, MonthKey, SampleTransaction};
pub use engine::ProjectionEngine;
pub use stats::{classify_confidence, compute_stats, CashFlowStats, IncomeConfidence};
pub use types::{
    CashFlowProjection, CategoryImpact, DataGap, ForecastPoint, HistoricalPoint, Projection,
    TimelinePoint,
};
