//! Summary chips: a handful of label/value highlights
//!
//! Named rules run first, in order. Each one targets a single family and
//! formats a bespoke chip from that family's payload; a rule that finds no
//! usable insight is skipped and leaves its family available. Generic
//! `family name: title` chips then top the list up to the minimum.

use std::collections::HashSet;

use serde::Serialize;

use crate::config::ChipConfig;
use crate::format::currency;
use crate::models::MergedInsight;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryChip {
    pub label: String,
    pub value: String,
}

impl SummaryChip {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A named extraction rule bound to one family
struct ChipRule {
    name: &'static str,
    family: &'static str,
    extract: fn(&MergedInsight) -> Option<SummaryChip>,
}

const FAVORITE_SUFFIX: &str = " is a Favorite";

const RULES: &[ChipRule] = &[
    ChipRule { name: "balance", family: "balance_warning", extract: balance },
    ChipRule { name: "favorite_merchant", family: "favorite_merchants", extract: favorite_merchant },
    ChipRule { name: "local_impact", family: "local_support", extract: local_impact },
    ChipRule { name: "subscriptions", family: "subscription_volume", extract: subscriptions },
    ChipRule { name: "top_category", family: "category_saturation", extract: top_category },
    ChipRule { name: "typical_deposit", family: "income_pattern", extract: typical_deposit },
    ChipRule { name: "consistency", family: "consistency_score", extract: consistency },
    ChipRule { name: "savings", family: "savings_milestone", extract: savings },
    ChipRule { name: "fees", family: "fee_detection", extract: fees },
];

fn balance(i: &MergedInsight) -> Option<SummaryChip> {
    let balance = i.insight.metric("current_balance")?;
    Some(SummaryChip::new("Balance", currency(balance)))
}

/// "Blue Bottle is a Favorite" -> "Blue Bottle"
fn favorite_merchant(i: &MergedInsight) -> Option<SummaryChip> {
    let title = i.title().trim();
    let merchant = title.strip_suffix(FAVORITE_SUFFIX).unwrap_or(title).trim();
    (!merchant.is_empty()).then(|| SummaryChip::new("Favorite spot", merchant))
}

fn local_impact(i: &MergedInsight) -> Option<SummaryChip> {
    let share = i.insight.metric("local_percentage")?;
    Some(SummaryChip::new("Local impact", format!("{:.0}% local", share.round())))
}

fn subscriptions(i: &MergedInsight) -> Option<SummaryChip> {
    let count = i.insight.metric("merchant_count")?;
    Some(SummaryChip::new("Subscriptions", format!("{:.0} recurring", count)))
}

fn top_category(i: &MergedInsight) -> Option<SummaryChip> {
    let category = i.insight.text("category")?;
    let value = match i.insight.metric("current_share") {
        Some(share) => format!("{} ({:.0}%)", category, share.round()),
        None => category.to_string(),
    };
    Some(SummaryChip::new("Top category", value))
}

/// Deposits are stored as negative amounts upstream
fn typical_deposit(i: &MergedInsight) -> Option<SummaryChip> {
    let deposit = i.insight.metric("average_deposit")?;
    Some(SummaryChip::new("Typical deposit", currency(deposit.abs())))
}

fn consistency(i: &MergedInsight) -> Option<SummaryChip> {
    let score = i.insight.metric("score")?;
    Some(SummaryChip::new("Consistency", format!("{:.0}%", score)))
}

fn savings(i: &MergedInsight) -> Option<SummaryChip> {
    let savings = i.insight.metric("current_savings")?;
    Some(SummaryChip::new("Savings", currency(savings)))
}

fn fees(i: &MergedInsight) -> Option<SummaryChip> {
    let fees = i.insight.metric("total_fees")?;
    Some(SummaryChip::new("Fees", currency(fees)))
}

/// Build summary chips from the merged collection
pub fn build_summary_chips(merged: &[MergedInsight], config: &ChipConfig) -> Vec<SummaryChip> {
    let mut chips = Vec::new();
    let mut used: HashSet<&str> = HashSet::new();

    for rule in RULES {
        if chips.len() >= config.max {
            break;
        }
        let chip = merged
            .iter()
            .filter(|i| i.family_key == rule.family)
            .find_map(|i| (rule.extract)(i));
        match chip {
            Some(chip) => {
                tracing::trace!(rule = rule.name, "Summary chip rule matched");
                used.insert(rule.family);
                chips.push(chip);
            }
            None => tracing::trace!(rule = rule.name, "Summary chip rule skipped"),
        }
    }

    let named = chips.len();
    let target = config.min.max(named).min(config.max);
    for insight in merged {
        if chips.len() >= target {
            break;
        }
        if !used.insert(insight.family_key.as_str()) {
            continue;
        }
        chips.push(SummaryChip::new(insight.family_name.clone(), insight.title()));
    }

    tracing::debug!(
        named,
        generic = chips.len() - named,
        "Built summary chips"
    );

    chips
}
