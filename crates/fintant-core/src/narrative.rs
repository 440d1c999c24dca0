//! Narrative rendering of a finished pipeline state
//!
//! Turns the forecast, plan, upcoming bills and safety options into a short
//! plain-text summary for the user. Runs after the pipeline is done and
//! never changes the state.

use chrono::{Duration, NaiveDate};

use crate::models::{PipelineState, SafetyOption};

/// Renders a finished state into user-facing text
pub trait NarrativeRenderer {
    fn render(&self, state: &PipelineState, today: NaiveDate) -> String;
}

/// Plain-text, bullet-style renderer
pub struct PlainTextRenderer {
    /// Window used for the "bills due" summary line
    bills_window_days: i64,
}

impl PlainTextRenderer {
    pub fn new() -> Self {
        Self {
            bills_window_days: 14,
        }
    }

    pub fn with_bills_window(days: i64) -> Self {
        Self {
            bills_window_days: days,
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl NarrativeRenderer for PlainTextRenderer {
    fn render(&self, state: &PipelineState, today: NaiveDate) -> String {
        let money = |amount: f64| format_money(amount, &state.currency);
        let mut lines: Vec<String> = Vec::new();

        lines.push(format!(
            "Here's the plan for the next {} days.",
            self.bills_window_days
        ));

        if let Some(fc) = &state.income_forecast {
            lines.push(format!(
                "Income outlook: expected {} (p10 {} / p90 {}, confidence {}%).",
                money(fc.expected),
                money(fc.p10),
                money(fc.p90),
                (fc.confidence * 100.0).round() as i64
            ));
        }

        let upcoming = state.upcoming();
        if !upcoming.is_empty() {
            let horizon = today + Duration::days(self.bills_window_days);
            let soon: Vec<_> = upcoming.iter().filter(|u| u.due_date <= horizon).collect();
            let total: f64 = soon.iter().map(|u| u.expected_amount).sum();
            lines.push(format!(
                "Bills due in {} days: {} across {} items.",
                self.bills_window_days,
                money(total),
                soon.len()
            ));
        }

        let Some(plan) = &state.allocation_plan else {
            return lines.join("\n");
        };

        if plan.shortfall > 0.0 {
            lines.push(format!(
                "Shortfall vs. buffer target: {}.",
                money(plan.shortfall)
            ));

            let options = state
                .safety_options
                .as_ref()
                .map(|o| o.options.as_slice())
                .unwrap_or_default();
            if !options.is_empty() {
                lines.push("Options to keep you safe:".to_string());
                for option in options {
                    lines.push(match option {
                        SafetyOption::RescheduleBill { days, .. } => format!(
                            "• Reschedule a bill by {} days (often accepted if requested early).",
                            days
                        ),
                        SafetyOption::MicroAdvance { amount, .. } => format!(
                            "• Micro-advance of {} (fee-free, auto-repay on income).",
                            money(*amount)
                        ),
                        SafetyOption::PartialPayment { .. } => {
                            "• Ask for a partial payment plan to split the bill.".to_string()
                        }
                    });
                }
            }
        } else if plan.actions.is_empty() {
            lines.push("No moves suggested right now. You're on track.".to_string());
        } else {
            lines.push("Suggested actions:".to_string());
            for action in &plan.actions {
                lines.push(format!(
                    "• {} {} → {}: {}",
                    action.kind.label(),
                    money(action.amount),
                    action.target,
                    action.rationale
                ));
            }
            lines.push("Approve any you like; we won't move money without your consent.".to_string());
        }

        lines.join("\n")
    }
}

/// Format an amount with two decimals, thousands separators and a currency
/// symbol (or the code for currencies without one)
pub fn format_money(amount: f64, currency: &str) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    let symbol = match currency.to_uppercase().as_str() {
        "EUR" => "€".to_string(),
        "USD" => "$".to_string(),
        "GBP" => "£".to_string(),
        other => format!("{} ", other),
    };

    format!("{}{}{}.{:02}", sign, symbol, grouped, frac)
}
