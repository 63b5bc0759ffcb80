//! Insight ranking command

use std::path::Path;

use anyhow::{Context, Result};
use lucent_core::ledger::load_insight_snapshot;
use lucent_core::models::MergedInsight;
use lucent_core::{EngineConfig, InsightEngine, InsightView, Priority};

use super::{print_json, truncate};

pub fn cmd_insights(
    config: &EngineConfig,
    file: &Path,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let snapshot = load_insight_snapshot(file)
        .with_context(|| format!("Failed to load insight snapshot {}", file.display()))?;

    let engine = InsightEngine::new(config);
    let view = engine.analyze_with_limit(&snapshot, limit.unwrap_or(config.quick_limit));

    if json {
        return print_json(&view);
    }

    print_view(&view, snapshot.insight_count());
    Ok(())
}

pub(crate) fn print_view(view: &InsightView, total: usize) {
    println!();
    println!("💡 Insights ({} in snapshot)", total);
    println!("   ─────────────────────────────────────────────────────────────");

    if view.is_empty() {
        println!("   No insights yet.");
        return;
    }

    if !view.summary_chips.is_empty() {
        let chips: Vec<String> = view
            .summary_chips
            .iter()
            .map(|c| format!("{}: {}", c.label, c.value))
            .collect();
        println!("   {}", chips.join("  │  "));
        println!();
    }

    if !view.quick_insights.is_empty() {
        println!("   Quick insights");
        for insight in &view.quick_insights {
            print_insight(insight);
        }
    }

    let sections = &view.sections;
    print_group("Key highlights", &sections.key_highlights);
    print_group("Major spending", &sections.major_spending);
    print_group("Cross-domain", &sections.cross_domain);
    for domain in &sections.by_domain {
        print_group(&domain.domain_name, &domain.insights);
    }
}

fn print_group(heading: &str, insights: &[MergedInsight]) {
    if insights.is_empty() {
        return;
    }
    println!();
    println!("   {}", heading);
    for insight in insights {
        print_insight(insight);
    }
}

fn print_insight(insight: &MergedInsight) {
    println!(
        "   {} {:45} {:>22}",
        priority_icon(insight.priority()),
        truncate(insight.title(), 45),
        truncate(&insight.family_name, 22)
    );
}

fn priority_icon(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "🔴",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
        Priority::Unknown => "⚪",
    }
}
