//! Weekly income aggregation

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDateTime};

use crate::models::Transaction;

/// Sum income by ISO week over the last `weeks` weeks before `now`.
///
/// Only positive amounts count. Weeks without income are absent rather than
/// zero. The result is ordered oldest week first.
pub fn weekly_income(transactions: &[Transaction], weeks: u32, now: NaiveDateTime) -> Vec<f64> {
    let cutoff = now - Duration::days(i64::from(weeks) * 7);

    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for tx in transactions {
        if !tx.is_income() || tx.ts < cutoff {
            continue;
        }
        let week = tx.ts.iso_week();
        *buckets.entry((week.year(), week.week())).or_default() += tx.amount;
    }

    buckets.into_values().collect()
}
