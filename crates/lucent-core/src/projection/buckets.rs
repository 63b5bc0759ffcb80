//! Calendar-month bucketing of a transaction ledger

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::format::{add_months, month_label};
use crate::models::TransactionRecord;

/// Sample transactions kept per month
const SAMPLE_LIMIT: usize = 3;

/// Calendar month in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The month `offset` months later
    pub fn plus(&self, offset: u32) -> Self {
        Self::from_date(add_months(self.first_day(), offset))
    }

    /// `"Mar 2024"`
    pub fn label(&self) -> String {
        month_label(self.first_day())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleTransaction {
    pub id: String,
    pub date: NaiveDate,
    pub merchant: String,
    pub category: String,
    pub amount: f64,
}

/// One month of income and spending
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBucket {
    pub month: MonthKey,
    pub income: f64,
    pub spending: f64,
    pub spending_by_category: BTreeMap<String, f64>,
    /// Magnitude of each deposit
    pub income_events: Vec<f64>,
    /// Magnitude of each outflow
    pub spending_events: Vec<f64>,
    pub samples: Vec<SampleTransaction>,
}

impl MonthBucket {
    fn new(month: MonthKey) -> Self {
        Self {
            month,
            income: 0.0,
            spending: 0.0,
            spending_by_category: BTreeMap::new(),
            income_events: Vec::new(),
            spending_events: Vec::new(),
            samples: Vec::new(),
        }
    }

    fn add(&mut self, tx: &TransactionRecord, date: NaiveDate) {
        if tx.is_income() {
            let amount = tx.amount.abs();
            self.income += amount;
            self.income_events.push(amount);
        } else if tx.is_spending() {
            self.spending += tx.amount;
            self.spending_events.push(tx.amount);
            *self
                .spending_by_category
                .entry(tx.category().to_string())
                .or_insert(0.0) += tx.amount;
        }

        if self.samples.len() < SAMPLE_LIMIT {
            self.samples.push(SampleTransaction {
                id: tx.id.clone(),
                date,
                merchant: tx.merchant().to_string(),
                category: tx.category().to_string(),
                amount: tx.amount,
            });
        }
    }

    /// Income minus spending
    pub fn net(&self) -> f64 {
        self.income - self.spending
    }

    /// Largest spending categories, biggest first (ties by name)
    pub fn top_categories(&self, n: usize) -> Vec<(&str, f64)> {
        let mut categories: Vec<(&str, f64)> = self
            .spending_by_category
            .iter()
            .map(|(name, amount)| (name.as_str(), *amount))
            .collect();
        categories.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        categories.truncate(n);
        categories
    }
}

/// Group transactions by UTC month, oldest first
///
/// Records whose date cannot be parsed are skipped.
pub fn bucket_transactions(transactions: &[TransactionRecord]) -> Vec<MonthBucket> {
    let mut buckets: BTreeMap<MonthKey, MonthBucket> = BTreeMap::new();
    let mut skipped = 0usize;

    for tx in transactions {
        let Some(date) = tx.parsed_date() else {
            skipped += 1;
            tracing::warn!(id = %tx.id, date = %tx.date, "Skipping transaction with unparseable date");
            continue;
        };
        let month = MonthKey::from_date(date);
        buckets
            .entry(month)
            .or_insert_with(|| MonthBucket::new(month))
            .add(tx, date);
    }

    tracing::debug!(
        transactions = transactions.len(),
        months = buckets.len(),
        skipped,
        "Bucketed ledger by month"
    );

    buckets.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_month_key_ordering_and_labels() {
        let dec = MonthKey::new(2023, 12);
        let jan = MonthKey::new(2024, 1);
        assert!(dec < jan);
        assert_eq!(dec.plus(1), jan);
        assert_eq!(dec.plus(14), MonthKey::new(2025, 2));
        assert_eq!(jan.label(), "Jan 2024");
        assert_eq!(dec.to_string(), "2023-12");
    }

    #[test]
    fn test_bucketing_splits_income_and_spending() {
        let ledger = three_month_ledger();
        let buckets = bucket_transactions(&ledger.transactions);

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].month, MonthKey::new(2024, 1));
        assert_eq!(buckets[2].month, MonthKey::new(2024, 3));

        let march = &buckets[2];
        assert_eq!(march.income, 2000.0);
        assert_eq!(march.spending, 1600.0);
        assert_eq!(march.net(), 400.0);
        assert_eq!(march.income_events, vec![2000.0]);
        assert_eq!(march.spending_events, vec![1000.0, 450.0, 150.0]);
        assert_eq!(march.spending_by_category["RENT"], 1000.0);
        assert_eq!(march.samples.len(), 3);
    }

    #[test]
    fn test_unordered_input_and_bad_dates() {
        let txs = vec![
            tx("2024-03-05", 10.0, "FOOD_AND_DRINK"),
            tx("not a date", 999.0, "FOOD_AND_DRINK"),
            tx("2024-01-05", 20.0, "FOOD_AND_DRINK"),
            tx("2024-03-06T12:00:00Z", 5.0, "TRAVEL"),
        ];
        let buckets = bucket_transactions(&txs);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].spending, 20.0);
        assert_eq!(buckets[1].spending, 15.0);
    }

    #[test]
    fn test_top_categories() {
        let txs = vec![
            tx("2024-03-01", 50.0, "TRAVEL"),
            tx("2024-03-02", 200.0, "RENT"),
            tx("2024-03-03", 50.0, "COFFEE"),
            tx("2024-03-04", -900.0, "INCOME"),
        ];
        let buckets = bucket_transactions(&txs);
        let top = buckets[0].top_categories(2);
        assert_eq!(top, vec![("RENT", 200.0), ("COFFEE", 50.0)]);
        assert!(!buckets[0].spending_by_category.contains_key("INCOME"));
    }
}
