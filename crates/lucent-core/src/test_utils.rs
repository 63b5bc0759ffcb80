//! Fixture builders shared by unit tests

use crate::models::{
    Domain, Family, Insight, InsightSnapshot, LedgerSnapshot, MergedInsight, Payload,
    PayloadValue, Priority, TransactionRecord,
};
use crate::registry;

pub fn insight(id: &str, title: &str, priority: Priority) -> Insight {
    Insight {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        priority,
        created_at: None,
        updated_at: None,
        data: Payload::new(),
    }
}

/// Merged insight in the family's registry domain (or `spending_patterns`)
pub fn merged(id: &str, family: &str, title: &str, priority: Priority) -> MergedInsight {
    let domain = registry::family(family)
        .map(|f| f.domain)
        .unwrap_or("spending_patterns");
    MergedInsight {
        insight: insight(id, title, priority),
        domain_key: domain.to_string(),
        domain_name: registry::domain_name(domain),
        domain_description: String::new(),
        family_key: family.to_string(),
        family_name: registry::family_name(family),
        family_description: String::new(),
    }
}

/// Chainable tweaks for insight fixtures
pub trait InsightBuilder: Sized {
    fn insight_mut(&mut self) -> &mut Insight;

    fn created(mut self, ts: &str) -> Self {
        self.insight_mut().created_at = Some(ts.to_string());
        self
    }

    fn with_metric(mut self, key: &str, value: f64) -> Self {
        self.insight_mut()
            .data
            .insert(key.to_string(), PayloadValue::Number(value));
        self
    }

    fn with_text(mut self, key: &str, value: &str) -> Self {
        self.insight_mut()
            .data
            .insert(key.to_string(), PayloadValue::Text(value.to_string()));
        self
    }
}

impl InsightBuilder for Insight {
    fn insight_mut(&mut self) -> &mut Insight {
        self
    }
}

impl InsightBuilder for MergedInsight {
    fn insight_mut(&mut self) -> &mut Insight {
        &mut self.insight
    }
}

pub fn in_domain(mut insight: MergedInsight, domain: &str) -> MergedInsight {
    insight.domain_key = domain.to_string();
    insight.domain_name = registry::domain_name(domain);
    insight
}

pub fn family(key: &str, insights: Vec<Insight>) -> Family {
    Family {
        key: key.to_string(),
        name: registry::family_name(key),
        description: registry::family_description(key).to_string(),
        insights,
    }
}

pub fn domain(key: &str, families: Vec<Family>) -> Domain {
    Domain {
        key: key.to_string(),
        name: registry::domain_name(key),
        description: registry::domain_description(key).to_string(),
        families,
    }
}

pub fn snapshot(domains: Vec<Domain>) -> InsightSnapshot {
    InsightSnapshot { domains }
}

pub fn tx(date: &str, amount: f64, category: &str) -> TransactionRecord {
    TransactionRecord {
        id: format!("{}:{}:{}", date, amount, category),
        date: date.to_string(),
        amount,
        merchant_name: Some(format!("{} MERCHANT", category)),
        name: None,
        category_primary: Some(category.to_string()),
    }
}

pub fn ledger(transactions: Vec<TransactionRecord>, balance: Option<f64>) -> LedgerSnapshot {
    LedgerSnapshot {
        transactions,
        current_balance: balance,
    }
}

/// Three months with paychecks of 2000 and spending of 1500, 1700, 1600
pub fn three_month_ledger() -> LedgerSnapshot {
    ledger(
        vec![
            tx("2024-01-01", -2000.0, "INCOME"),
            tx("2024-01-10", 1000.0, "RENT"),
            tx("2024-01-20", 500.0, "FOOD_AND_DRINK"),
            tx("2024-02-01", -2000.0, "INCOME"),
            tx("2024-02-10", 1000.0, "RENT"),
            tx("2024-02-20", 700.0, "FOOD_AND_DRINK"),
            tx("2024-03-01", -2000.0, "INCOME"),
            tx("2024-03-10", 1000.0, "RENT"),
            tx("2024-03-15", 450.0, "FOOD_AND_DRINK"),
            tx("2024-03-20", 150.0, "TRANSPORTATION"),
        ],
        Some(5000.0),
    )
}
