//! Recurring obligation detection
//!
//! Finds merchants that charge roughly once a month and predicts when and
//! how much they will charge next. Merchants that do not fit the monthly
//! band are simply not reported.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};

use crate::config::ObligationConfig;
use crate::models::{round2, Transaction, UpcomingExpense};

/// Detects recurring (~monthly) debits
pub struct ObligationDetector {
    config: ObligationConfig,
}

impl ObligationDetector {
    pub fn new() -> Self {
        Self {
            config: ObligationConfig::default(),
        }
    }

    pub fn with_config(config: ObligationConfig) -> Self {
        Self { config }
    }

    /// Predict upcoming obligations from transaction history.
    ///
    /// Results are ordered by due date, then merchant. No due date is ever
    /// before `today`.
    pub fn detect(&self, transactions: &[Transaction], today: NaiveDate) -> Vec<UpcomingExpense> {
        let mut by_merchant: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
        for tx in transactions {
            if !tx.is_expense() {
                continue; // Skip income/credits
            }
            by_merchant.entry(tx.merchant.as_str()).or_default().push(tx);
        }

        let mut results: Vec<UpcomingExpense> = by_merchant
            .into_iter()
            .filter_map(|(merchant, charges)| self.predict(merchant, charges, today))
            .collect();

        results.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then_with(|| a.merchant.cmp(&b.merchant))
        });

        debug!(count = results.len(), "Recurring obligations detected");
        results
    }

    fn predict(
        &self,
        merchant: &str,
        mut charges: Vec<&Transaction>,
        today: NaiveDate,
    ) -> Option<UpcomingExpense> {
        let cfg = &self.config;

        if charges.len() < 2 {
            return None; // Need at least 2 charges to see a gap
        }

        charges.sort_by_key(|t| t.ts);

        let gaps: Vec<i64> = charges
            .windows(2)
            .map(|w| (w[1].ts.date() - w[0].ts.date()).num_days())
            .collect();
        let avg_gap = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;

        if avg_gap < cfg.min_gap_days || avg_gap > cfg.max_gap_days {
            debug!(merchant, avg_gap, "Not a monthly pattern");
            return None;
        }

        let last = charges.last()?;
        let window = cfg.amount_window.max(1);
        let recent = &charges[charges.len().saturating_sub(window)..];
        let amount = recent.iter().map(|t| t.amount.abs()).sum::<f64>() / recent.len() as f64;

        let mut due_date = last.ts.date() + Duration::days(avg_gap.round_ties_even() as i64);
        let mut certainty = cfg.certainty;

        // A predicted date in the past means the charge is late or missed
        if due_date < today {
            warn!(
                merchant,
                predicted = %due_date,
                "Recurring charge overdue, assuming it is still pending"
            );
            due_date = today + Duration::days(cfg.missed_grace_days);
            certainty = cfg.missed_certainty;
        }

        Some(UpcomingExpense {
            merchant: merchant.to_string(),
            due_date,
            expected_amount: round2(amount),
            certainty,
            category: last.category.clone(),
        })
    }
}

impl Default for ObligationDetector {
    fn default() -> Self {
        Self::new()
    }
}
