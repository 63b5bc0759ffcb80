//! Quick insights: a short, family-diverse top-N
//!
//! Insights are queued per family. Each pick takes the head of the best
//! queue, where queues that have given up fewer items come first and ties
//! are broken by comparing their heads. No family supplies a second item
//! until every family with items left has supplied one.

use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::models::MergedInsight;

use super::scoring::Ranker;

/// One family's insights, best first
struct FamilyQueue<'m> {
    family: &'m str,
    items: VecDeque<&'m MergedInsight>,
    taken: usize,
}

/// Select up to `limit` insights, favoring breadth across families
///
/// Returns fewer than `limit` when the input runs out; never pads.
pub fn select_quick_insights(
    merged: &[MergedInsight],
    limit: usize,
    ranker: &Ranker<'_>,
) -> Vec<MergedInsight> {
    let mut queues = family_queues(merged, ranker);
    let mut selected = Vec::with_capacity(limit.min(merged.len()));

    while selected.len() < limit {
        queues.sort_by(|a, b| compare_queues(a, b, ranker));

        let Some(queue) = queues.first_mut() else {
            break;
        };
        let Some(head) = queue.items.pop_front() else {
            // Best queue is empty, so all are
            break;
        };
        queue.taken += 1;
        tracing::trace!(family = queue.family, id = head.id(), "Quick insight picked");
        selected.push(head.clone());
    }

    tracing::debug!(
        families = queues.len(),
        selected = selected.len(),
        limit,
        "Selected quick insights"
    );

    selected
}

/// Queues in first-appearance order, each sorted by the ranker
fn family_queues<'m>(merged: &'m [MergedInsight], ranker: &Ranker<'_>) -> Vec<FamilyQueue<'m>> {
    let mut groups: Vec<(&'m str, Vec<&'m MergedInsight>)> = Vec::new();
    for insight in merged {
        match groups.iter_mut().find(|(key, _)| *key == insight.family_key) {
            Some((_, items)) => items.push(insight),
            None => groups.push((insight.family_key.as_str(), vec![insight])),
        }
    }

    groups
        .into_iter()
        .map(|(family, mut items)| {
            ranker.sort(&mut items);
            FamilyQueue {
                family,
                items: items.into(),
                taken: 0,
            }
        })
        .collect()
}

/// Empty queues last, then fewest taken, then best head
fn compare_queues(a: &FamilyQueue<'_>, b: &FamilyQueue<'_>, ranker: &Ranker<'_>) -> Ordering {
    match (a.items.front(), b.items.front()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(head_a), Some(head_b)) => a
            .taken
            .cmp(&b.taken)
            .then_with(|| ranker.compare(head_a, head_b)),
    }
}
