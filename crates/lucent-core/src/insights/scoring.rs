//! Insight scoring and the single ranking order
//!
//! Every ranked list in the engine sorts with [`Ranker::compare`]:
//! higher quick score first, then higher priority, then most recent.

use std::cmp::Ordering;

use serde::Serialize;

use crate::config::QuickScoreTable;
use crate::models::{parse_timestamp, MergedInsight};

/// Sortable ranks for one insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightScore {
    /// 0 = high, 1 = medium, 2 = low, 3 = unknown
    pub priority_rank: u8,
    /// Family actionability (higher = more actionable)
    pub quick_score: i64,
    /// Negated epoch milliseconds of the latest activity, 0 if unparseable
    pub recency_score: i64,
}

impl Ord for InsightScore {
    /// `Less` means "ranks ahead of"
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .quick_score
            .cmp(&self.quick_score)
            .then_with(|| self.priority_rank.cmp(&other.priority_rank))
            .then_with(|| self.recency_score.cmp(&other.recency_score))
    }
}

impl PartialOrd for InsightScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Scores insights against a quick-score table
#[derive(Debug, Clone, Copy)]
pub struct Ranker<'a> {
    table: &'a QuickScoreTable,
}

impl<'a> Ranker<'a> {
    pub fn new(table: &'a QuickScoreTable) -> Self {
        Self { table }
    }

    pub fn score(&self, insight: &MergedInsight) -> InsightScore {
        InsightScore {
            priority_rank: insight.priority().rank(),
            quick_score: self.table.score(&insight.family_key),
            recency_score: recency_score(insight.insight.activity_timestamp()),
        }
    }

    pub fn compare(&self, a: &MergedInsight, b: &MergedInsight) -> Ordering {
        self.score(a).cmp(&self.score(b))
    }

    /// Stable sort, best first
    pub fn sort(&self, insights: &mut [&MergedInsight]) {
        insights.sort_by_cached_key(|insight| self.score(insight));
    }

    /// All insights, best first
    pub fn ranked<'m>(&self, insights: &'m [MergedInsight]) -> Vec<&'m MergedInsight> {
        let mut ranked: Vec<&MergedInsight> = insights.iter().collect();
        self.sort(&mut ranked);
        ranked
    }
}

fn recency_score(timestamp: Option<&str>) -> i64 {
    timestamp
        .and_then(parse_timestamp)
        .map(|ts| -ts.timestamp_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use crate::test_utils::*;

    fn table() -> QuickScoreTable {
        QuickScoreTable::new(10)
            .with_score("balance_warning", 100)
            .with_score("fee_detection", 50)
    }

    #[test]
    fn test_score_components() {
        let table = table();
        let ranker = Ranker::new(&table);

        let insight = merged("a", "balance_warning", "Low Balance", Priority::Medium)
            .created("2024-05-01T00:00:00Z");
        let score = ranker.score(&insight);
        assert_eq!(score.priority_rank, 1);
        assert_eq!(score.quick_score, 100);
        assert_eq!(score.recency_score, -1_714_521_600_000);

        let unknown = merged("b", "mystery", "Mystery", Priority::Unknown).created("yesterday");
        let score = ranker.score(&unknown);
        assert_eq!(score.priority_rank, 3);
        assert_eq!(score.quick_score, 10);
        assert_eq!(score.recency_score, 0);
    }

    #[test]
    fn test_update_timestamp_wins() {
        let table = table();
        let ranker = Ranker::new(&table);
        let mut insight = merged("a", "fee_detection", "Fees", Priority::Low)
            .created("2024-01-01T00:00:00Z");
        insight.insight.updated_at = Some("2024-02-01T00:00:00Z".to_string());
        assert_eq!(
            ranker.score(&insight).recency_score,
            -parse_timestamp("2024-02-01T00:00:00Z").unwrap().timestamp_millis()
        );
    }

    #[test]
    fn test_comparator_levels() {
        let table = table();
        let ranker = Ranker::new(&table);

        // Quick score dominates priority
        let low_actionable = merged("a", "balance_warning", "A", Priority::Low);
        let high_generic = merged("b", "other", "B", Priority::High);
        assert_eq!(ranker.compare(&low_actionable, &high_generic), Ordering::Less);

        // Same family: priority decides
        let high = merged("c", "fee_detection", "C", Priority::High);
        let medium = merged("d", "fee_detection", "D", Priority::Medium);
        assert_eq!(ranker.compare(&high, &medium), Ordering::Less);

        // Same family and priority: newer first
        let newer = merged("e", "fee_detection", "E", Priority::High).created("2024-06-01");
        let older = merged("f", "fee_detection", "F", Priority::High).created("2024-01-01");
        assert_eq!(ranker.compare(&newer, &older), Ordering::Less);
        assert_eq!(ranker.compare(&older, &newer), Ordering::Greater);

        // Unparseable timestamps sort after dated ones
        let undated = merged("g", "fee_detection", "G", Priority::High);
        assert_eq!(ranker.compare(&older, &undated), Ordering::Less);
    }

    #[test]
    fn test_comparator_is_consistent_and_transitive() {
        let table = table();
        let ranker = Ranker::new(&table);
        let items = vec![
            merged("1", "balance_warning", "1", Priority::Low).created("2024-03-01"),
            merged("2", "fee_detection", "2", Priority::High).created("2024-02-01"),
            merged("3", "fee_detection", "3", Priority::High).created("2024-04-01"),
            merged("4", "other", "4", Priority::Medium),
            merged("5", "other", "5", Priority::Unknown).created("2023-12-01"),
            merged("6", "balance_warning", "6", Priority::Low).created("2024-03-01"),
        ];

        for a in &items {
            assert_eq!(ranker.compare(a, a), Ordering::Equal);
            for b in &items {
                assert_eq!(ranker.compare(a, b), ranker.compare(a, b));
                assert_eq!(ranker.compare(a, b), ranker.compare(b, a).reverse());
                for c in &items {
                    if ranker.compare(a, b) != Ordering::Greater
                        && ranker.compare(b, c) != Ordering::Greater
                    {
                        assert_ne!(ranker.compare(a, c), Ordering::Greater);
                    }
                }
            }
        }

        let ranked: Vec<&str> = ranker.ranked(&items).iter().map(|i| i.id()).collect();
        assert_eq!(ranked, vec!["1", "6", "3", "2", "4", "5"]);
    }
}
