//! Test utilities for fintant-core
//!
//! Builders for transactions and balances anchored to a fixed "now" so
//! every test is deterministic.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::{Balances, Transaction};

/// Fixed reference instant: Wednesday 2026-03-18 12:00
pub fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 18)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// `base` shifted by a (possibly negative) number of days
pub fn at(base: NaiveDateTime, days: i64) -> NaiveDateTime {
    base + Duration::days(days)
}

/// Income transaction `days_ago` days before [`now`]
pub fn income(id: &str, days_ago: i64, amount: f64, merchant: &str) -> Transaction {
    Transaction::new(id, at(now(), -days_ago), amount, merchant, "salary")
}

/// Expense transaction `days_ago` days before [`now`]; `amount` is the
/// magnitude of the charge
pub fn debit(id: &str, days_ago: i64, amount: f64, merchant: &str, category: &str) -> Transaction {
    Transaction::new(id, at(now(), -days_ago), -amount, merchant, category)
}

pub fn balances(entries: &[(&str, f64)]) -> Balances {
    entries
        .iter()
        .map(|(name, amount)| (name.to_string(), *amount))
        .collect()
}

/// The sample history used by the demo driver, relative to [`now`]
pub fn sample_transactions() -> Vec<Transaction> {
    vec![
        income("t1", 7, 650.0, "Client A"),
        income("t2", 14, 700.0, "Client A"),
        income("t3", 21, 620.0, "Client B"),
        income("t4", 28, 700.0, "Client A"),
        debit("e1", 29, 12.99, "Spotify", "subscription"),
        debit("e2", 59, 12.49, "Spotify", "subscription"),
        debit("e3", 27, 59.99, "PhoneCo", "subscription"),
        debit("e4", 57, 59.99, "PhoneCo", "subscription"),
        debit("e5", 30, 800.0, "Landlord", "rent"),
        debit("e6", 60, 800.0, "Landlord", "rent"),
    ]
}
