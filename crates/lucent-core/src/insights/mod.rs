//! Insight Engine - ranking and aggregation of analytic findings
//!
//! Turns an insight snapshot (Domain -> Family -> Insight) into the small,
//! diverse, priority-ordered sets the dashboard surfaces. Everything here is
//! a pure function of the snapshot and the configuration.
//!
//! ## Pipeline
//!
//! - **Merge** - flatten the tree and collapse duplicate findings
//! - **Quick insights** - family-diverse top-N for at-a-glance display
//! - **Sections** - highlights, major spending, cross-domain, per-domain
//! - **Summary chips** - short label/value highlights
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lucent_core::{EngineConfig, InsightEngine};
//!
//! let config = EngineConfig::embedded()?;
//! let engine = InsightEngine::new(&config);
//! let view = engine.analyze(&snapshot);
//! ```

pub mod chips;
pub mod merge;
pub mod quick;
pub mod scoring;
pub mod sections;

pub use chips::{build_summary_chips, SummaryChip};
pub use merge::merge_insights;
pub use quick::select_quick_insights;
pub use scoring::{InsightScore, Ranker};
pub use sections::{allocate_sections, DomainSection, Sections};

use serde::Serialize;

use crate::config::EngineConfig;
use crate::models::{InsightSnapshot, MergedInsight};

/// Everything the rendering layer needs from one insight snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightView {
    pub quick_insights: Vec<MergedInsight>,
    pub sections: Sections,
    pub summary_chips: Vec<SummaryChip>,
}

impl InsightView {
    /// Nothing to show in any group
    pub fn is_empty(&self) -> bool {
        self.quick_insights.is_empty()
            && self.sections.is_empty()
            && self.summary_chips.is_empty()
    }
}

/// Ranking engine bound to a configuration
pub struct InsightEngine<'c> {
    config: &'c EngineConfig,
}

impl<'c> InsightEngine<'c> {
    pub fn new(config: &'c EngineConfig) -> Self {
        Self { config }
    }

    pub fn ranker(&self) -> Ranker<'c> {
        Ranker::new(&self.config.quick_scores)
    }

    pub fn merge(&self, snapshot: &InsightSnapshot) -> Vec<MergedInsight> {
        merge_insights(snapshot)
    }

    /// Quick insights with the configured limit
    pub fn quick_insights(&self, merged: &[MergedInsight]) -> Vec<MergedInsight> {
        self.quick_insights_with_limit(merged, self.config.quick_limit)
    }

    pub fn quick_insights_with_limit(
        &self,
        merged: &[MergedInsight],
        limit: usize,
    ) -> Vec<MergedInsight> {
        select_quick_insights(merged, limit, &self.ranker())
    }

    pub fn sections(&self, merged: &[MergedInsight]) -> Sections {
        allocate_sections(merged, &self.config.sections, &self.ranker())
    }

    pub fn summary_chips(&self, merged: &[MergedInsight]) -> Vec<SummaryChip> {
        build_summary_chips(merged, &self.config.chips)
    }

    /// Merge once, then derive every view from the merged collection
    pub fn analyze(&self, snapshot: &InsightSnapshot) -> InsightView {
        self.analyze_with_limit(snapshot, self.config.quick_limit)
    }

    pub fn analyze_with_limit(&self, snapshot: &InsightSnapshot, limit: usize) -> InsightView {
        let merged = self.merge(snapshot);
        InsightView {
            quick_insights: self.quick_insights_with_limit(&merged, limit),
            sections: self.sections(&merged),
            summary_chips: self.summary_chips(&merged),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use crate::test_utils::*;

    fn sample_snapshot() -> InsightSnapshot {
        snapshot(vec![
            domain(
                "financial_health",
                vec![
                    family(
                        "balance_warning",
                        vec![insight("bw", "Low Account Balance", Priority::High)
                            .with_metric("current_balance", 150.0)],
                    ),
                    family(
                        "fee_detection",
                        vec![insight("fee", "ATM Fee Drain", Priority::Low)
                            .created("2024-04-02T10:00:00")],
                    ),
                ],
            ),
            domain(
                "spending_patterns",
                vec![family(
                    "favorite_merchants",
                    vec![
                        insight("fav", "Blue Bottle is a Favorite", Priority::Low),
                        insight("fav2", "Tartine is a Favorite", Priority::Low),
                    ],
                )],
            ),
            domain(
                "spending_trends",
                vec![family(
                    "favorite_merchants",
                    vec![insight("fav-dup", "Blue Bottle is a Favorite", Priority::Medium)],
                )],
            ),
        ])
    }

    #[test]
    fn test_analyze_empty_snapshot() {
        let config = EngineConfig::default();
        let view = InsightEngine::new(&config).analyze(&InsightSnapshot::default());
        assert!(view.quick_insights.is_empty());
        assert!(view.sections.is_empty());
        assert!(view.summary_chips.is_empty());
        assert!(view.is_empty());
    }

    #[test]
    fn test_zero_quick_limit_keeps_sections_and_chips() {
        let config = EngineConfig::embedded().unwrap();
        let view = InsightEngine::new(&config).analyze_with_limit(&sample_snapshot(), 0);
        assert!(view.quick_insights.is_empty());
        assert_eq!(view.sections.total(), 4);
        assert!(!view.summary_chips.is_empty());
        assert!(!view.is_empty());
    }

    #[test]
    fn test_analyze_uses_merged_collection_everywhere() {
        let config = EngineConfig::embedded().unwrap();
        let engine = InsightEngine::new(&config);
        let view = engine.analyze(&sample_snapshot());

        let quick: Vec<&str> = view.quick_insights.iter().map(|m| m.id()).collect();
        assert_eq!(quick, vec!["bw", "fee", "fav-dup", "fav2"]);

        assert!(view.sections.iter().all(|m| m.id() != "fav"));
        assert_eq!(view.sections.total(), 4);

        assert_eq!(view.summary_chips[0].label, "Balance");
        assert_eq!(view.summary_chips[1].value, "Blue Bottle");
        assert_eq!(view.summary_chips.len(), 3);
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let config = EngineConfig::embedded().unwrap();
        let engine = InsightEngine::new(&config);
        let snap = sample_snapshot();
        assert_eq!(engine.analyze(&snap), engine.analyze(&snap));
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let config = EngineConfig::embedded().unwrap();
        let view = InsightEngine::new(&config).analyze(&sample_snapshot());
        let json = serde_json::to_value(&view).unwrap();
        assert!(json["quickInsights"].is_array());
        assert!(json["sections"]["keyHighlights"].is_array());
        assert!(json["sections"]["byDomain"].is_array());
        assert_eq!(json["quickInsights"][0]["familyKey"], "balance_warning");
        assert_eq!(json["quickInsights"][0]["title"], "Low Account Balance");
        assert_eq!(json["summaryChips"][0]["label"], "Balance");
    }
}
