//! Dashboard command: both engines over one snapshot pair

use std::path::Path;

use anyhow::{Context, Result};
use lucent_core::ledger::{load_insight_snapshot, load_ledger};
use lucent_core::{Dashboard, EngineConfig, InsightView};

use super::insights::print_view;
use super::print_json;
use super::projection::print_projection;

pub fn cmd_dashboard(
    config: &EngineConfig,
    insights: &Path,
    ledger: &Path,
    balance: Option<f64>,
    json: bool,
) -> Result<()> {
    let snapshot = load_insight_snapshot(insights)
        .with_context(|| format!("Failed to load insight snapshot {}", insights.display()))?;
    let ledger = load_ledger(ledger, balance)
        .with_context(|| format!("Failed to load ledger {}", ledger.display()))?;

    let dashboard = Dashboard::build(&snapshot, &ledger, config)?;

    if json {
        return print_json(&dashboard);
    }

    let view = InsightView {
        quick_insights: dashboard.quick_insights,
        sections: dashboard.sections,
        summary_chips: dashboard.summary_chips,
    };
    print_view(&view, snapshot.insight_count());
    print_projection(&dashboard.projection, config.projection.min_months);

    println!();
    println!(
        "   Fingerprints: insights {} │ ledger {}",
        &dashboard.fingerprints.insights[..12],
        &dashboard.fingerprints.ledger[..12]
    );
    Ok(())
}
