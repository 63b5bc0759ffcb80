//! Structured section view
//!
//! Partitions merged insights into highlights, major spending, cross-domain
//! and per-domain groups. An insight claimed by an earlier group is never
//! offered to a later one, and the total across groups respects the cap.

use std::collections::HashSet;

use serde::Serialize;

use crate::config::SectionConfig;
use crate::models::MergedInsight;

use super::scoring::Ranker;

/// Insights of one domain not already claimed elsewhere
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSection {
    pub domain_key: String,
    pub domain_name: String,
    pub domain_description: String,
    pub insights: Vec<MergedInsight>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sections {
    pub key_highlights: Vec<MergedInsight>,
    pub major_spending: Vec<MergedInsight>,
    pub cross_domain: Vec<MergedInsight>,
    pub by_domain: Vec<DomainSection>,
}

impl Sections {
    /// Insights across all groups
    pub fn total(&self) -> usize {
        self.key_highlights.len()
            + self.major_spending.len()
            + self.cross_domain.len()
            + self.by_domain.iter().map(|d| d.insights.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Every insight in display order
    pub fn iter(&self) -> impl Iterator<Item = &MergedInsight> {
        self.key_highlights
            .iter()
            .chain(self.major_spending.iter())
            .chain(self.cross_domain.iter())
            .chain(self.by_domain.iter().flat_map(|d| d.insights.iter()))
    }
}

/// Tracks which merged insights have been placed, by position
struct Claims<'m> {
    ranked: Vec<(usize, &'m MergedInsight)>,
    claimed: HashSet<usize>,
}

impl<'m> Claims<'m> {
    fn new(merged: &'m [MergedInsight], ranker: &Ranker<'_>) -> Self {
        let mut ranked: Vec<(usize, &MergedInsight)> = merged.iter().enumerate().collect();
        ranked.sort_by_cached_key(|(_, insight)| ranker.score(insight));
        Self {
            ranked,
            claimed: HashSet::new(),
        }
    }

    /// Claim the best `limit` unclaimed insights matching `filter`
    fn take(&mut self, limit: usize, filter: impl Fn(&MergedInsight) -> bool) -> Vec<MergedInsight> {
        let picked: Vec<(usize, &MergedInsight)> = self
            .ranked
            .iter()
            .filter(|(index, insight)| !self.claimed.contains(index) && filter(*insight))
            .take(limit)
            .copied()
            .collect();

        picked
            .into_iter()
            .map(|(index, insight)| {
                self.claimed.insert(index);
                insight.clone()
            })
            .collect()
    }
}

/// Allocate merged insights into display sections
pub fn allocate_sections(
    merged: &[MergedInsight],
    config: &SectionConfig,
    ranker: &Ranker<'_>,
) -> Sections {
    let mut claims = Claims::new(merged, ranker);

    let key_highlights = claims.take(config.highlights, |_| true);
    let major_spending = claims.take(config.major_spending_limit, |i| {
        i.family_key == config.major_spending_family
    });
    let cross_domain = claims.take(config.cross_domain_limit, |i| {
        config.cross_domain_families.contains(&i.family_key)
    });

    let mut by_domain = Vec::new();
    for domain_key in domain_sequence(merged, &config.domain_order) {
        let insights = claims.take(config.per_domain_limit, |i| i.domain_key == domain_key);
        if let Some(first) = insights.first() {
            by_domain.push(DomainSection {
                domain_key: domain_key.to_string(),
                domain_name: first.domain_name.clone(),
                domain_description: first.domain_description.clone(),
                insights,
            });
        }
    }

    let mut sections = Sections {
        key_highlights,
        major_spending,
        cross_domain,
        by_domain,
    };
    let trimmed = trim_to_cap(&mut sections, config.cap);

    tracing::debug!(
        highlights = sections.key_highlights.len(),
        major_spending = sections.major_spending.len(),
        cross_domain = sections.cross_domain.len(),
        domains = sections.by_domain.len(),
        trimmed,
        "Allocated insight sections"
    );

    sections
}

/// Configured order first, then unlisted domains in first-seen order
fn domain_sequence<'a>(merged: &'a [MergedInsight], order: &'a [String]) -> Vec<&'a str> {
    let mut sequence: Vec<&str> = order.iter().map(String::as_str).collect();
    for insight in merged {
        if !sequence.contains(&insight.domain_key.as_str()) {
            sequence.push(&insight.domain_key);
        }
    }
    sequence
}

/// Drop insights from the tail until the total fits, returning how many went
///
/// Domain groups go first, last domain first; a domain emptied this way is
/// removed. Only if that is not enough are cross-domain, major spending and
/// finally highlights shortened.
fn trim_to_cap(sections: &mut Sections, cap: usize) -> usize {
    let mut excess = sections.total().saturating_sub(cap);
    let before = excess;

    for domain in sections.by_domain.iter_mut().rev() {
        while excess > 0 && domain.insights.pop().is_some() {
            excess -= 1;
        }
    }
    sections.by_domain.retain(|d| !d.insights.is_empty());

    for group in [
        &mut sections.cross_domain,
        &mut sections.major_spending,
        &mut sections.key_highlights,
    ] {
        while excess > 0 && group.pop().is_some() {
            excess -= 1;
        }
    }

    before - excess
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuickScoreTable;
    use crate::models::Priority;
    use crate::registry;
    use crate::test_utils::*;

    fn table() -> QuickScoreTable {
        QuickScoreTable::new(10)
            .with_score("balance_warning", 100)
            .with_score("fee_detection", 90)
            .with_score("cash_buffer", 85)
            .with_score("category_spike", 80)
            .with_score("income_pattern", 75)
            .with_score("subscription_volume", 70)
    }

    /// Two insights in every registry family
    fn full_snapshot() -> Vec<MergedInsight> {
        registry::FAMILIES
            .iter()
            .flat_map(|f| {
                (0..2).map(move |i| {
                    merged(
                        &format!("{}-{}", f.key, i),
                        f.key,
                        &format!("{} #{}", f.name, i),
                        if i == 0 { Priority::High } else { Priority::Low },
                    )
                })
            })
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let table = table();
        let sections = allocate_sections(&[], &SectionConfig::default(), &Ranker::new(&table));
        assert!(sections.is_empty());
        assert!(sections.by_domain.is_empty());
    }

    #[test]
    fn test_groups_and_claims() {
        let table = table();
        let ranker = Ranker::new(&table);
        let items = vec![
            merged("bw", "balance_warning", "Low Balance", Priority::High),
            merged("fee", "fee_detection", "ATM Fees", Priority::Low),
            merged("sat1", "category_saturation", "Dining Dominates", Priority::Medium),
            merged("sat2", "category_saturation", "Travel Dominates", Priority::Low),
            merged("aff", "cross_user_affinity", "Users who love X", Priority::Medium),
            merged("local", "local_support", "Local Support", Priority::Low),
        ];
        let config = SectionConfig {
            highlights: 2,
            ..SectionConfig::default()
        };

        let sections = allocate_sections(&items, &config, &ranker);

        let ids = |v: &[MergedInsight]| v.iter().map(|m| m.id().to_string()).collect::<Vec<_>>();
        assert_eq!(ids(&sections.key_highlights), vec!["bw", "fee"]);
        assert_eq!(ids(&sections.major_spending), vec!["sat1", "sat2"]);
        assert_eq!(ids(&sections.cross_domain), vec!["aff"]);
        assert_eq!(sections.by_domain.len(), 1);
        assert_eq!(sections.by_domain[0].domain_key, "sustainability_local");
        assert_eq!(sections.by_domain[0].domain_name, "Sustainability & Local Impact");
        assert_eq!(ids(&sections.by_domain[0].insights), vec!["local"]);
    }

    #[test]
    fn test_highlights_claim_before_major_spending() {
        let table = QuickScoreTable::new(10).with_score("category_saturation", 99);
        let ranker = Ranker::new(&table);
        let items = vec![
            merged("sat1", "category_saturation", "A", Priority::High),
            merged("sat2", "category_saturation", "B", Priority::Low),
        ];
        let config = SectionConfig {
            highlights: 1,
            ..SectionConfig::default()
        };

        let sections = allocate_sections(&items, &config, &ranker);
        assert_eq!(sections.key_highlights[0].id(), "sat1");
        assert_eq!(sections.major_spending.len(), 1);
        assert_eq!(sections.major_spending[0].id(), "sat2");
    }

    #[test]
    fn test_cap_and_uniqueness_on_full_snapshot() {
        let table = table();
        let ranker = Ranker::new(&table);
        let items = full_snapshot();
        let sections = allocate_sections(&items, &SectionConfig::default(), &ranker);

        assert_eq!(sections.total(), 15);
        assert_eq!(sections.key_highlights.len(), 5);
        assert_eq!(sections.major_spending.len(), 2);
        assert_eq!(sections.cross_domain.len(), 3);

        let ids: Vec<&str> = sections.iter().map(|m| m.id()).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());

        // Head domains survive trimming, tail domains are dropped
        assert_eq!(sections.by_domain[0].domain_key, "spending_patterns");
        assert_eq!(sections.by_domain[0].insights.len(), 2);
        assert!(sections.by_domain.iter().all(|d| !d.insights.is_empty()));
        assert!(!sections
            .by_domain
            .iter()
            .any(|d| d.domain_key == "long_term_goals"));
    }

    #[test]
    fn test_trim_removes_from_tail_domains_first() {
        let section = |key: &str, n: usize| DomainSection {
            domain_key: key.to_string(),
            domain_name: key.to_string(),
            domain_description: String::new(),
            insights: (0..n)
                .map(|i| merged(&format!("{}{}", key, i), "cost_drift", "t", Priority::Low))
                .collect(),
        };
        let mut sections = Sections {
            key_highlights: vec![merged("h", "cost_drift", "h", Priority::High)],
            major_spending: vec![],
            cross_domain: vec![],
            by_domain: vec![section("a", 2), section("b", 2), section("c", 1)],
        };

        let trimmed = trim_to_cap(&mut sections, 4);
        assert_eq!(trimmed, 2);
        assert_eq!(sections.total(), 4);
        let keys: Vec<&str> = sections.by_domain.iter().map(|d| d.domain_key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(sections.by_domain[1].insights.len(), 1);
        assert_eq!(sections.by_domain[1].insights[0].id(), "b0");
    }

    #[test]
    fn test_small_cap_shortens_fixed_groups() {
        let table = table();
        let ranker = Ranker::new(&table);
        let config = SectionConfig {
            cap: 4,
            ..SectionConfig::default()
        };
        let sections = allocate_sections(&full_snapshot(), &config, &ranker);
        assert_eq!(sections.total(), 4);
        assert!(sections.by_domain.is_empty());
        assert!(sections.cross_domain.is_empty());
        assert!(sections.major_spending.is_empty());
        assert_eq!(sections.key_highlights.len(), 4);
    }

    #[test]
    fn test_unlisted_domain_comes_last() {
        let table = table();
        let ranker = Ranker::new(&table);
        let items = vec![
            in_domain(merged("x", "side_hustle", "Side", Priority::High), "side_projects"),
            merged("y", "savings_milestone", "Savings", Priority::Low),
        ];
        let config = SectionConfig {
            highlights: 0,
            ..SectionConfig::default()
        };
        let sections = allocate_sections(&items, &config, &ranker);
        let keys: Vec<&str> = sections.by_domain.iter().map(|d| d.domain_key.as_str()).collect();
        assert_eq!(keys, vec!["long_term_goals", "side_projects"]);
    }
}
