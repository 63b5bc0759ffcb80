//! Human-readable number formatting for chips and narratives

use chrono::{Datelike, NaiveDate};

/// Whole-dollar amount with thousands separators, e.g. `-$1,234`
pub fn currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(rounded.abs() as u64))
}

/// `"Mar 2024"`
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// First day of the month `offset` months after `date`'s month
pub fn add_months(date: NaiveDate, offset: u32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + offset as i32;
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
        .unwrap_or(date)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
