//! Cash-flow projection command

use std::path::Path;

use anyhow::{Context, Result};
use lucent_core::ledger::load_ledger;
use lucent_core::projection::TimelinePoint;
use lucent_core::{DataGap, EngineConfig, Projection, ProjectionEngine};

use super::{print_json, truncate};

pub fn cmd_project(
    config: &EngineConfig,
    file: &Path,
    balance: Option<f64>,
    json: bool,
) -> Result<()> {
    let ledger = load_ledger(file, balance)
        .with_context(|| format!("Failed to load ledger {}", file.display()))?;

    let projection = ProjectionEngine::new(&config.projection).project(&ledger);

    if json {
        return print_json(&projection);
    }

    print_projection(&projection, config.projection.min_months);
    Ok(())
}

pub(crate) fn print_projection(projection: &Projection, min_months: usize) {
    println!();
    println!("📈 Cash-Flow Projection");
    println!("   ─────────────────────────────────────────────────────────────");

    let p = match projection {
        Projection::Unavailable { reason } => {
            match reason {
                DataGap::Collecting => {
                    println!("   Still collecting data: add a current balance and some transactions.")
                }
                DataGap::Insufficient => println!(
                    "   Not enough history yet: at least {} months of transactions are needed.",
                    min_months
                ),
            }
            return;
        }
        Projection::Ready(p) => p,
    };

    println!("   Window: {}", p.window_label);
    println!(
        "   Income ${:.2}/mo │ Spending ${:.2}/mo │ Net ${:.2}/mo │ Confidence {}",
        p.expected_income, p.expected_spending, p.projected_net, p.income_confidence
    );
    println!();
    println!(
        "   {:10} │ {:>12} │ {:>12} │ {:>12}",
        "Month", "Balance", "Low", "High"
    );
    println!("   ───────────┼──────────────┼──────────────┼──────────────");

    for point in &p.timeline {
        match point {
            TimelinePoint::Historical(h) => {
                let marker = if h.is_present {
                    " ◀ now"
                } else if h.anomaly {
                    " ⚠ spike"
                } else {
                    ""
                };
                println!(
                    "   {:10} │ {:>12.2} │ {:>12} │ {:>12}{}",
                    h.label, h.balance, "", "", marker
                );
            }
            TimelinePoint::Forecast(f) => println!(
                "   {:10} │ {:>12.2} │ {:>12.2} │ {:>12.2}",
                f.label, f.projected_balance, f.lower_balance, f.upper_balance
            ),
        }
    }

    println!();
    println!("   {}", p.outlook_summary);

    if !p.category_impacts.is_empty() {
        println!();
        println!("   Biggest categories last month");
        for impact in &p.category_impacts {
            println!(
                "   {:25} │ {:>10.2} │ {:>5.1}%",
                truncate(&impact.label, 25),
                impact.amount,
                impact.share * 100.0
            );
        }
    }

    for risk in &p.risk_indicators {
        println!("   ⚠️  {}", risk);
    }
}
