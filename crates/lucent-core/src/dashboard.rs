//! Dashboard assembly: every insight view plus the cash-flow projection

use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::fingerprint::Fingerprints;
use crate::insights::{InsightEngine, Sections, SummaryChip};
use crate::models::{InsightSnapshot, LedgerSnapshot, MergedInsight};
use crate::projection::{Projection, ProjectionEngine};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub quick_insights: Vec<MergedInsight>,
    pub sections: Sections,
    pub summary_chips: Vec<SummaryChip>,
    pub projection: Projection,
    pub fingerprints: Fingerprints,
}

impl Dashboard {
    /// Merge the snapshot once and derive every view from it
    pub fn build(
        snapshot: &InsightSnapshot,
        ledger: &LedgerSnapshot,
        config: &EngineConfig,
    ) -> Result<Self> {
        let view = InsightEngine::new(config).analyze(snapshot);
        let projection = ProjectionEngine::new(&config.projection).project(ledger);
        let fingerprints = Fingerprints::of(snapshot, ledger)?;

        tracing::info!(
            quick = view.quick_insights.len(),
            sectioned = view.sections.total(),
            chips = view.summary_chips.len(),
            projected = projection.has_data(),
            "Built dashboard"
        );

        Ok(Self {
            quick_insights: view.quick_insights,
            sections: view.sections,
            summary_chips: view.summary_chips,
            projection,
            fingerprints,
        })
    }
}
