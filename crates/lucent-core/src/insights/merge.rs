//! Cross-domain deduplication
//!
//! Flattens the Domain -> Family -> Insight tree. The same finding can be
//! surfaced under more than one domain; `(family key, title)` identifies it,
//! and the highest-priority instance survives. Entries missing a domain key,
//! family key or title cannot be placed and are skipped with a warning.

use std::collections::HashMap;

use crate::models::{InsightSnapshot, MergedInsight};
use crate::registry;

/// Flatten and deduplicate a snapshot
///
/// Output keeps first-seen order (domain, then family, then insight). When a
/// later duplicate has a strictly better priority it replaces the earlier
/// instance in place; ties keep the first one.
pub fn merge_insights(snapshot: &InsightSnapshot) -> Vec<MergedInsight> {
    let mut merged: Vec<MergedInsight> = Vec::with_capacity(snapshot.insight_count());
    let mut seen: HashMap<(String, String), usize> = HashMap::new();
    let mut collisions = 0usize;

    for domain in &snapshot.domains {
        if domain.key.trim().is_empty() {
            tracing::warn!(families = domain.families.len(), "Skipping domain without a key");
            continue;
        }
        let domain_name = non_empty_or(&domain.name, || registry::domain_name(&domain.key));
        let domain_description = non_empty_or(&domain.description, || {
            registry::domain_description(&domain.key).to_string()
        });

        for family in &domain.families {
            if family.key.trim().is_empty() {
                tracing::warn!(
                    domain = %domain.key,
                    insights = family.insights.len(),
                    "Skipping family without a key"
                );
                continue;
            }
            let family_name = non_empty_or(&family.name, || registry::family_name(&family.key));
            let family_description = non_empty_or(&family.description, || {
                registry::family_description(&family.key).to_string()
            });

            for insight in &family.insights {
                if insight.title.trim().is_empty() {
                    tracing::warn!(
                        id = %insight.id,
                        family = %family.key,
                        "Skipping insight without a title"
                    );
                    continue;
                }
                let candidate = MergedInsight {
                    insight: insight.clone(),
                    domain_key: domain.key.clone(),
                    domain_name: domain_name.clone(),
                    domain_description: domain_description.clone(),
                    family_key: family.key.clone(),
                    family_name: family_name.clone(),
                    family_description: family_description.clone(),
                };

                let key = (family.key.clone(), insight.title.clone());
                match seen.get(&key) {
                    Some(&index) => {
                        collisions += 1;
                        if candidate.priority().rank() < merged[index].priority().rank() {
                            merged[index] = candidate;
                        }
                    }
                    None => {
                        seen.insert(key, merged.len());
                        merged.push(candidate);
                    }
                }
            }
        }
    }

    tracing::debug!(
        unique = merged.len(),
        collisions,
        "Merged insight snapshot"
    );

    merged
}

fn non_empty_or(value: &str, fallback: impl FnOnce() -> String) -> String {
    if value.trim().is_empty() {
        fallback()
    } else {
        value.to_string()
    }
}
