//! Income and spending statistics over the projection window

use std::fmt;

use serde::Serialize;

use crate::config::ProjectionConfig;

use super::buckets::MonthBucket;

/// How predictable income has been
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeConfidence {
    High,
    Medium,
    Low,
}

impl IncomeConfidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeConfidence::High => "high",
            IncomeConfidence::Medium => "medium",
            IncomeConfidence::Low => "low",
        }
    }
}

impl fmt::Display for IncomeConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowStats {
    /// Mean over months that had any income
    pub avg_income: f64,
    /// Mean over every month in the window
    pub avg_spending: f64,
    /// Population standard deviation of monthly spending
    pub spending_std_dev: f64,
    pub net_change: f64,
    /// Monthly width added to the uncertainty cone
    pub volatility: f64,
    /// Deposit standard deviation over the monthly income average
    pub income_variation: Option<f64>,
    pub confidence: IncomeConfidence,
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

pub fn compute_stats(window: &[MonthBucket], config: &ProjectionConfig) -> CashFlowStats {
    let incomes: Vec<f64> = window
        .iter()
        .map(|b| b.income)
        .filter(|income| *income > 0.0)
        .collect();
    let spending: Vec<f64> = window.iter().map(|b| b.spending).collect();

    let avg_income = mean(&incomes);
    let avg_spending = mean(&spending);
    let spending_std_dev = population_std_dev(&spending);
    let volatility = if spending_std_dev > 0.0 {
        spending_std_dev
    } else {
        config.volatility_fallback * avg_spending
    };

    let events: Vec<f64> = window
        .iter()
        .flat_map(|b| b.income_events.iter().copied())
        .collect();
    // Spread of individual deposits relative to the monthly income average
    let income_variation = (avg_income > 0.0).then(|| population_std_dev(&events) / avg_income);

    CashFlowStats {
        avg_income,
        avg_spending,
        spending_std_dev,
        net_change: avg_income - avg_spending,
        volatility,
        income_variation,
        confidence: classify_confidence(income_variation, config),
    }
}

/// Bucket a coefficient of variation; no income at all is `Low`
pub fn classify_confidence(variation: Option<f64>, config: &ProjectionConfig) -> IncomeConfidence {
    match variation {
        Some(cv) if cv < config.high_confidence_cv => IncomeConfidence::High,
        Some(cv) if cv < config.medium_confidence_cv => IncomeConfidence::Medium,
        _ => IncomeConfidence::Low,
    }
}
