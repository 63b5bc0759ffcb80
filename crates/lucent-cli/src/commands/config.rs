//! Configuration display command

use anyhow::Result;
use lucent_core::config::default_config_path;
use lucent_core::{ConfigSource, EngineConfig};

use super::print_json;

pub fn cmd_config(config: &EngineConfig, source: &ConfigSource, json: bool) -> Result<()> {
    if json {
        return print_json(config);
    }

    println!();
    println!("⚙️  Configuration");
    println!("   Source: {}", source);
    if let Some(path) = default_config_path() {
        println!("   Override path: {}", path.display());
    }
    println!("   ─────────────────────────────────────────────────────────────");

    println!("   Quick insights: {}", config.quick_limit);
    let mut scores: Vec<(&str, i64)> = config.quick_scores.iter().collect();
    scores.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    println!(
        "   Quick scores: {} families, default {}",
        scores.len(),
        config.quick_scores.default_score()
    );
    for (family, score) in scores {
        println!("     {:28} {:>4}", family, score);
    }

    let sections = &config.sections;
    println!(
        "   Sections: cap {} │ highlights {} │ major spending {} ({}) │ cross-domain {} │ per domain {}",
        sections.cap,
        sections.highlights,
        sections.major_spending_limit,
        sections.major_spending_family,
        sections.cross_domain_limit,
        sections.per_domain_limit
    );
    println!("   Domain order: {}", sections.domain_order.join(", "));
    println!("   Chips: {} to {}", config.chips.min, config.chips.max);

    let projection = &config.projection;
    println!(
        "   Projection: window {} │ min {} │ forecast {} months │ anomaly {}σ",
        projection.window_months,
        projection.min_months,
        projection.forecast_months,
        projection.anomaly_sigma
    );
    println!(
        "   Income confidence: high < {} │ medium < {}",
        projection.high_confidence_cv, projection.medium_confidence_cv
    );

    Ok(())
}
