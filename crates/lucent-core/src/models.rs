//! Data models for Lucent
//!
//! Snapshot types arrive from collaborators and are treated as read-only.
//! Deserialization is lenient: a malformed field degrades to a neutral value
//! (empty payload, zero amount, unknown priority) instead of rejecting the
//! whole snapshot.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Priority assigned to an insight by the upstream analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
    /// Missing or unrecognized priority
    #[default]
    Unknown,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Unknown => "unknown",
        }
    }

    /// Sort rank (lower = more important)
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
            Priority::Unknown => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(raw
            .as_str()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default())
    }
}

/// A single value inside an insight payload
///
/// Anything that is not a number or a string (booleans, arrays, objects)
/// is kept as `Null` so extraction rules can skip it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, from = "Value")]
pub enum PayloadValue {
    Number(f64),
    Text(String),
    Null,
}

impl PayloadValue {
    /// Numeric view; numeric strings are accepted
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PayloadValue::Number(n) if n.is_finite() => Some(*n),
            PayloadValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PayloadValue::Text(s) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<Value> for PayloadValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map(PayloadValue::Number).unwrap_or(PayloadValue::Null),
            Value::String(s) => PayloadValue::Text(s),
            _ => PayloadValue::Null,
        }
    }
}

/// Named metrics attached to an insight
pub type Payload = BTreeMap<String, PayloadValue>;

/// A single analytic finding produced upstream
///
/// Read with the snapshot's snake_case field names, written in camelCase
/// alongside the rest of the rendering-layer JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Insight {
    /// Opaque identifier, unique within a snapshot
    #[serde(default, deserialize_with = "opaque_string")]
    pub id: String,
    /// Empty when missing; untitled insights are dropped at merge time
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_payload")]
    pub data: Payload,
}

impl Insight {
    /// Numeric payload field, if present and well-formed
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.data.get(key).and_then(PayloadValue::as_f64)
    }

    /// Text payload field, if present and non-empty
    pub fn text(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(PayloadValue::as_str)
    }

    /// Most recent activity timestamp (update wins over creation)
    pub fn activity_timestamp(&self) -> Option<&str> {
        self.updated_at.as_deref().or(self.created_at.as_deref())
    }
}

/// Insights of one kind within a domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub insights: Vec<Insight>,
}

/// Top-level topic grouping families
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub families: Vec<Family>,
}

/// Insight tree as delivered by the analysis process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightSnapshot {
    #[serde(default)]
    pub domains: Vec<Domain>,
}

impl InsightSnapshot {
    pub fn insight_count(&self) -> usize {
        self.domains
            .iter()
            .flat_map(|d| d.families.iter())
            .map(|f| f.insights.len())
            .sum()
    }
}

/// An insight flattened out of the tree, annotated with where it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedInsight {
    #[serde(flatten)]
    pub insight: Insight,
    pub domain_key: String,
    pub domain_name: String,
    pub domain_description: String,
    pub family_key: String,
    pub family_name: String,
    pub family_description: String,
}

impl MergedInsight {
    pub fn id(&self) -> &str {
        &self.insight.id
    }

    pub fn title(&self) -> &str {
        &self.insight.title
    }

    pub fn priority(&self) -> Priority {
        self.insight.priority
    }
}

/// A ledger entry
///
/// Sign convention comes from the account aggregator:
/// negative = money in (income), positive = money out (spending).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default, deserialize_with = "opaque_string")]
    pub id: String,
    /// ISO date or datetime string
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category_primary: Option<String>,
}

impl TransactionRecord {
    pub fn is_income(&self) -> bool {
        self.amount < 0.0
    }

    pub fn is_spending(&self) -> bool {
        self.amount > 0.0
    }

    /// Merchant label, falling back to the raw description
    pub fn merchant(&self) -> &str {
        non_blank(self.merchant_name.as_deref())
            .or(non_blank(self.name.as_deref()))
            .unwrap_or("Unknown")
    }

    pub fn category(&self) -> &str {
        non_blank(self.category_primary.as_deref()).unwrap_or("UNCATEGORIZED")
    }

    /// Calendar date in UTC, `None` when the date string is unparseable
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Transactions plus the balance they lead up to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default, alias = "currentBalance", deserialize_with = "lenient_balance")]
    pub current_balance: Option<f64>,
}

/// Parse an ISO date, datetime or RFC 3339 timestamp into a UTC calendar date
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    parse_naive_datetime(raw)
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// Parse a timestamp into UTC; naive values are taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = parse_naive_datetime(raw) {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn parse_naive_datetime(raw: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn opaque_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(lenient_number(&raw).unwrap_or_else(|| {
        tracing::debug!(amount = %raw, "Non-numeric transaction amount, using 0");
        0.0
    }))
}

fn lenient_balance<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(lenient_number(&Value::deserialize(deserializer)?))
}

/// Payload may be an object, a JSON-encoded object string, or absent
fn lenient_payload<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Payload, D::Error> {
    let raw = match Value::deserialize(deserializer)? {
        Value::String(s) => serde_json::from_str::<Value>(&s).unwrap_or(Value::Null),
        other => other,
    };
    Ok(match raw {
        Value::Object(map) => map
            .into_iter()
            .map(|(k, v)| (k, PayloadValue::from(v)))
            .collect(),
        _ => Payload::new(),
    })
}
