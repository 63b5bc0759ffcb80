//! Projection result types

use serde::{Serialize, Serializer};

use super::buckets::MonthKey;
use super::stats::{CashFlowStats, IncomeConfidence};

/// Why no projection could be made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataGap {
    /// No balance or no transactions yet
    Collecting,
    /// Too few populated months
    Insufficient,
}

impl DataGap {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataGap::Collecting => "collecting",
            DataGap::Insufficient => "insufficient",
        }
    }
}

/// A reconstructed month-end balance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPoint {
    pub month: MonthKey,
    pub label: String,
    pub balance: f64,
    pub income: f64,
    pub spending: f64,
    pub net: f64,
    /// Spending well above the window's norm
    pub anomaly: bool,
    /// The month the current balance belongs to
    pub is_present: bool,
}

/// A projected month with its uncertainty band
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub month: MonthKey,
    pub label: String,
    pub projected_balance: f64,
    pub upper_balance: f64,
    pub lower_balance: f64,
    pub expected_income: f64,
    pub expected_spending: f64,
    pub confidence: IncomeConfidence,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TimelinePoint {
    Historical(HistoricalPoint),
    Forecast(ForecastPoint),
}

impl TimelinePoint {
    pub fn month(&self) -> MonthKey {
        match self {
            TimelinePoint::Historical(p) => p.month,
            TimelinePoint::Forecast(p) => p.month,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryImpact {
    pub category: String,
    pub label: String,
    pub amount: f64,
    /// Fraction of the month's spending, 0.0 to 1.0
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowProjection {
    /// History followed by forecast, chronological
    pub timeline: Vec<TimelinePoint>,
    pub outlook_summary: String,
    pub risk_indicators: Vec<String>,
    pub category_impacts: Vec<CategoryImpact>,
    pub income_confidence: IncomeConfidence,
    pub expected_income: f64,
    pub expected_spending: f64,
    pub projected_net: f64,
    pub window_label: String,
    pub current_balance: f64,
    pub statistics: CashFlowStats,
}

impl CashFlowProjection {
    pub fn history(&self) -> impl Iterator<Item = &HistoricalPoint> {
        self.timeline.iter().filter_map(|p| match p {
            TimelinePoint::Historical(h) => Some(h),
            TimelinePoint::Forecast(_) => None,
        })
    }

    pub fn forecast(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.timeline.iter().filter_map(|p| match p {
            TimelinePoint::Forecast(f) => Some(f),
            TimelinePoint::Historical(_) => None,
        })
    }
}

/// Outcome of a projection request
///
/// Serializes as `{"hasData": false, "reason": ...}` or as the projection
/// body with `"hasData": true`.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Unavailable { reason: DataGap },
    Ready(Box<CashFlowProjection>),
}

impl Projection {
    pub fn has_data(&self) -> bool {
        matches!(self, Projection::Ready(_))
    }

    pub fn reason(&self) -> Option<DataGap> {
        match self {
            Projection::Unavailable { reason } => Some(*reason),
            Projection::Ready(_) => None,
        }
    }

    pub fn as_ready(&self) -> Option<&CashFlowProjection> {
        match self {
            Projection::Ready(p) => Some(p),
            Projection::Unavailable { .. } => None,
        }
    }
}

impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct WithFlag<'a, T: Serialize> {
            has_data: bool,
            #[serde(flatten)]
            body: &'a T,
        }

        #[derive(Serialize)]
        struct Gap {
            reason: DataGap,
        }

        match self {
            Projection::Unavailable { reason } => WithFlag {
                has_data: false,
                body: &Gap { reason: *reason },
            }
            .serialize(serializer),
            Projection::Ready(projection) => WithFlag {
                has_data: true,
                body: projection.as_ref(),
            }
            .serialize(serializer),
        }
    }
}
