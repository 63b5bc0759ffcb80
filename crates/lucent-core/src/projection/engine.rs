//! Cash-flow projection: history reconstruction, forecast cone and narrative

use crate::config::ProjectionConfig;
use crate::format::currency;
use crate::models::{LedgerSnapshot, TransactionRecord};
use crate::registry::title_case;

use super::buckets::{bucket_transactions, MonthBucket};
use super::stats::{compute_stats, CashFlowStats, IncomeConfidence};
use super::types::{
    CashFlowProjection, CategoryImpact, DataGap, ForecastPoint, HistoricalPoint, Projection,
    TimelinePoint,
};

/// Categories reported from the latest month
const CATEGORY_IMPACTS: usize = 2;

/// Deficit months before it counts as a risk
const DEFICIT_MONTHS_RISK: usize = 2;

/// Below a cent a month, income and spending are treated as even
const STEADY_EPSILON: f64 = 0.005;

/// Cash-flow projection bound to a configuration
pub struct ProjectionEngine<'c> {
    config: &'c ProjectionConfig,
}

impl<'c> ProjectionEngine<'c> {
    pub fn new(config: &'c ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn project(&self, ledger: &LedgerSnapshot) -> Projection {
        self.project_transactions(&ledger.transactions, ledger.current_balance)
    }

    pub fn project_transactions(
        &self,
        transactions: &[TransactionRecord],
        current_balance: Option<f64>,
    ) -> Projection {
        let Some(balance) = current_balance else {
            tracing::debug!("No current balance, still collecting");
            return Projection::Unavailable {
                reason: DataGap::Collecting,
            };
        };
        if transactions.is_empty() {
            tracing::debug!("No transactions, still collecting");
            return Projection::Unavailable {
                reason: DataGap::Collecting,
            };
        }

        let buckets = bucket_transactions(transactions);
        if buckets.len() < self.config.min_months {
            tracing::debug!(
                months = buckets.len(),
                required = self.config.min_months,
                "Not enough history to project"
            );
            return Projection::Unavailable {
                reason: DataGap::Insufficient,
            };
        }

        let start = buckets.len().saturating_sub(self.config.window_months);
        let window = &buckets[start..];
        let stats = compute_stats(window, self.config);

        let history = self.reconstruct_history(window, balance, &stats);
        let forecast = self.forecast(window, balance, &stats);

        let outlook_summary = outlook(&stats, forecast.last());
        let risk_indicators = risks(&history, forecast.last(), &stats);
        let category_impacts = window.last().map(category_impacts).unwrap_or_default();
        let window_label = window_label(window);

        tracing::info!(
            months = window.len(),
            net = stats.net_change,
            confidence = %stats.confidence,
            risks = risk_indicators.len(),
            "Projected cash flow"
        );

        let timeline = history
            .into_iter()
            .map(TimelinePoint::Historical)
            .chain(forecast.into_iter().map(TimelinePoint::Forecast))
            .collect();

        Projection::Ready(Box::new(CashFlowProjection {
            timeline,
            outlook_summary,
            risk_indicators,
            category_impacts,
            income_confidence: stats.confidence,
            expected_income: stats.avg_income,
            expected_spending: stats.avg_spending,
            projected_net: stats.net_change,
            window_label,
            current_balance: balance,
            statistics: stats,
        }))
    }

    /// Walk backward from the present balance, undoing each month's net
    fn reconstruct_history(
        &self,
        window: &[MonthBucket],
        balance: f64,
        stats: &CashFlowStats,
    ) -> Vec<HistoricalPoint> {
        let threshold = stats.avg_spending + self.config.anomaly_sigma * stats.spending_std_dev;
        let mut running = balance;

        let mut history: Vec<HistoricalPoint> = window
            .iter()
            .rev()
            .map(|bucket| {
                let point = HistoricalPoint {
                    month: bucket.month,
                    label: bucket.month.label(),
                    balance: running,
                    income: bucket.income,
                    spending: bucket.spending,
                    net: bucket.net(),
                    anomaly: stats.spending_std_dev > 0.0 && bucket.spending > threshold,
                    is_present: false,
                };
                running -= bucket.net();
                point
            })
            .collect();
        history.reverse();

        if let Some(last) = history.last_mut() {
            last.is_present = true;
        }
        history
    }

    /// Extend the average net forward, widening the band by one volatility per month
    fn forecast(
        &self,
        window: &[MonthBucket],
        balance: f64,
        stats: &CashFlowStats,
    ) -> Vec<ForecastPoint> {
        let Some(last) = window.last() else {
            return Vec::new();
        };

        let mut projected = balance;
        let mut spread = 0.0;
        (1..=self.config.forecast_months)
            .map(|offset| {
                projected += stats.net_change;
                spread += stats.volatility;
                let month = last.month.plus(offset as u32);
                ForecastPoint {
                    month,
                    label: month.label(),
                    projected_balance: projected,
                    upper_balance: projected + spread,
                    lower_balance: projected - spread,
                    expected_income: stats.avg_income,
                    expected_spending: stats.avg_spending,
                    confidence: stats.confidence,
                }
            })
            .collect()
    }
}

fn outlook(stats: &CashFlowStats, horizon: Option<&ForecastPoint>) -> String {
    let net = stats.net_change;
    let Some(end) = horizon else {
        return "Not enough forecast horizon to describe an outlook.".to_string();
    };

    if net > STEADY_EPSILON {
        format!(
            "At your current pace your balance grows by about {} a month, reaching {} by {}.",
            currency(net),
            currency(end.projected_balance),
            end.label
        )
    } else if net < -STEADY_EPSILON {
        format!(
            "At your current pace your balance shrinks by about {} a month, falling to {} by {}.",
            currency(net.abs()),
            currency(end.projected_balance),
            end.label
        )
    } else {
        format!(
            "Income and spending are roughly even, so your balance should hold near {} through {}.",
            currency(end.projected_balance),
            end.label
        )
    }
}

fn risks(
    history: &[HistoricalPoint],
    horizon: Option<&ForecastPoint>,
    stats: &CashFlowStats,
) -> Vec<String> {
    let mut risks = Vec::new();

    let deficits = history.iter().filter(|p| p.net < 0.0).count();
    if deficits >= DEFICIT_MONTHS_RISK {
        risks.push(format!(
            "Spending outpaced income in {} of the last {} months.",
            deficits,
            history.len()
        ));
    }

    if let Some(end) = horizon {
        if end.lower_balance < 0.0 {
            risks.push(format!(
                "In a tougher scenario your balance could dip below zero by {}.",
                end.label
            ));
        }
    }

    if stats.confidence == IncomeConfidence::Low {
        risks.push("Income has been irregular, so this forecast is less certain.".to_string());
    }

    risks
}

fn category_impacts(latest: &MonthBucket) -> Vec<CategoryImpact> {
    latest
        .top_categories(CATEGORY_IMPACTS)
        .into_iter()
        .map(|(category, amount)| CategoryImpact {
            category: category.to_string(),
            label: title_case(category),
            amount,
            share: if latest.spending > 0.0 {
                amount / latest.spending
            } else {
                0.0
            },
        })
        .collect()
}

/// `"Jan 2024 to Mar 2024 (3 months)"`
fn window_label(window: &[MonthBucket]) -> String {
    match (window.first(), window.last()) {
        (Some(first), Some(last)) if first.month == last.month => {
            format!("{} (1 month)", first.month.label())
        }
        (Some(first), Some(last)) => format!(
            "{} to {} ({} months)",
            first.month.label(),
            last.month.label(),
            window.len()
        ),
        _ => String::new(),
    }
}
