//! Snapshot loading
//!
//! Ledgers come either as JSON (`{"transactions": [...], "current_balance": ...}`
//! or a bare transaction array) or as a CSV export with the columns
//! `id,date,amount,merchant_name,name,category_primary`. Insight snapshots are
//! always JSON.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{InsightSnapshot, LedgerSnapshot, TransactionRecord};

/// Load an insight snapshot from a JSON file
pub fn load_insight_snapshot(path: &Path) -> Result<InsightSnapshot> {
    let content = read_file(path)?;
    let snapshot: InsightSnapshot = serde_json::from_str(&content)?;
    debug!(
        path = %path.display(),
        domains = snapshot.domains.len(),
        insights = snapshot.insight_count(),
        "Loaded insight snapshot"
    );
    Ok(snapshot)
}

/// Load a ledger from a `.csv` or JSON file
///
/// `balance` overrides any balance recorded in the file.
pub fn load_ledger(path: &Path, balance: Option<f64>) -> Result<LedgerSnapshot> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let mut ledger = if is_csv {
        parse_ledger_csv(open_file(path)?)?
    } else {
        parse_ledger_json(&read_file(path)?)?
    };

    if balance.is_some() {
        ledger.current_balance = balance;
    }

    debug!(
        path = %path.display(),
        transactions = ledger.transactions.len(),
        has_balance = ledger.current_balance.is_some(),
        "Loaded ledger"
    );
    Ok(ledger)
}

/// Parse a ledger object or a bare array of transactions
pub fn parse_ledger_json(content: &str) -> Result<LedgerSnapshot> {
    match serde_json::from_str::<Value>(content)? {
        Value::Array(items) => Ok(LedgerSnapshot {
            transactions: serde_json::from_value(Value::Array(items))?,
            current_balance: None,
        }),
        object @ Value::Object(_) => Ok(serde_json::from_value(object)?),
        other => Err(Error::InvalidData(format!(
            "Expected a ledger object or transaction array, found {}",
            json_kind(&other)
        ))),
    }
}

/// Parse a CSV ledger; CSV files never carry a balance
pub fn parse_ledger_csv<R: Read>(reader: R) -> Result<LedgerSnapshot> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let tx = columns.transaction(&record, row);
        transactions.push(tx);
    }

    Ok(LedgerSnapshot {
        transactions,
        current_balance: None,
    })
}

/// Header positions for the CSV ledger columns
struct Columns {
    id: Option<usize>,
    date: usize,
    amount: usize,
    merchant_name: Option<usize>,
    name: Option<usize>,
    category_primary: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let required = |name: &str| {
            find(name).ok_or_else(|| Error::InvalidData(format!("CSV ledger missing `{}` column", name)))
        };

        Ok(Self {
            id: find("id"),
            date: required("date")?,
            amount: required("amount")?,
            merchant_name: find("merchant_name"),
            name: find("name"),
            category_primary: find("category_primary"),
        })
    }

    fn transaction(&self, record: &StringRecord, row: usize) -> TransactionRecord {
        let field = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let raw_amount = record.get(self.amount).unwrap_or_default();
        let amount = raw_amount.parse::<f64>().ok().filter(|a| a.is_finite()).unwrap_or_else(|| {
            debug!(row, amount = raw_amount, "Non-numeric transaction amount, using 0");
            0.0
        });

        TransactionRecord {
            id: field(self.id).unwrap_or_else(|| format!("row-{}", row + 1)),
            date: record.get(self.date).unwrap_or_default().to_string(),
            amount,
            merchant_name: field(self.merchant_name),
            name: field(self.name),
            category_primary: field(self.category_primary),
        }
    }
}

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
        _ => Error::Io(e),
    })
}

fn read_file(path: &Path) -> Result<String> {
    let mut content = String::new();
    open_file(path)?.read_to_string(&mut content)?;
    Ok(content)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CSV: &str = "\
id,date,amount,merchant_name,name,category_primary
t1,2024-01-03,-2000,,ACME PAYROLL,INCOME
t2,2024-01-09,42.50,Blue Bottle,BLUE BOTTLE #12,FOOD_AND_DRINK
,2024-01-10,oops,,,
";

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_csv_ledger() {
        let ledger = parse_ledger_csv(CSV.as_bytes()).unwrap();
        assert_eq!(ledger.transactions.len(), 3);
        assert_eq!(ledger.current_balance, None);

        let payroll = &ledger.transactions[0];
        assert_eq!(payroll.amount, -2000.0);
        assert!(payroll.is_income());
        assert_eq!(payroll.merchant(), "ACME PAYROLL");

        let coffee = &ledger.transactions[1];
        assert_eq!(coffee.merchant(), "Blue Bottle");
        assert_eq!(coffee.category(), "FOOD_AND_DRINK");

        let junk = &ledger.transactions[2];
        assert_eq!(junk.id, "row-3");
        assert_eq!(junk.amount, 0.0);
        assert_eq!(junk.category(), "UNCATEGORIZED");
    }

    #[test]
    fn test_csv_requires_date_and_amount() {
        let result = parse_ledger_csv("id,when,amount\n1,2024-01-01,5\n".as_bytes());
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_parse_json_object_and_array() {
        let object = parse_ledger_json(
            r#"{"currentBalance": "1250.75", "transactions": [{"id": 7, "date": "2024-02-01", "amount": "12.5"}]}"#,
        )
        .unwrap();
        assert_eq!(object.current_balance, Some(1250.75));
        assert_eq!(object.transactions[0].id, "7");
        assert_eq!(object.transactions[0].amount, 12.5);

        let array = parse_ledger_json(r#"[{"id": "a", "date": "2024-02-01", "amount": -5}]"#).unwrap();
        assert_eq!(array.transactions.len(), 1);
        assert_eq!(array.current_balance, None);

        assert!(matches!(parse_ledger_json("42"), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_load_ledger_balance_override() {
        let file = temp_file(".json", r#"{"current_balance": 10, "transactions": []}"#);
        assert_eq!(load_ledger(file.path(), None).unwrap().current_balance, Some(10.0));
        assert_eq!(
            load_ledger(file.path(), Some(99.0)).unwrap().current_balance,
            Some(99.0)
        );

        let csv = temp_file(".CSV", CSV);
        let ledger = load_ledger(csv.path(), Some(5.0)).unwrap();
        assert_eq!(ledger.transactions.len(), 3);
        assert_eq!(ledger.current_balance, Some(5.0));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_ledger(&dir.path().join("nope.json"), None);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_load_insight_snapshot() {
        let file = temp_file(
            ".json",
            r#"{"domains": [{"key": "financial_health", "name": "Financial Health", "families": [
                {"key": "balance_warning", "name": "Balance Warning", "insights": [
                    {"id": 1, "title": "Low Account Balance", "priority": "high",
                     "data": "{\"current_balance\": 120}"}
                ]}
            ]}]}"#,
        );
        let snapshot = load_insight_snapshot(file.path()).unwrap();
        assert_eq!(snapshot.insight_count(), 1);
        let insight = &snapshot.domains[0].families[0].insights[0];
        assert_eq!(insight.id, "1");
        assert_eq!(insight.metric("current_balance"), Some(120.0));
    }
}
