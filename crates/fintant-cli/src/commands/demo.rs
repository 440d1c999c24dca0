//! Demo command: the sample scenario, anchored to the current time

use std::path::Path;

use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use fintant_core::{Balances, Pipeline, PipelineState, Transaction};

use super::{load_config, render_outcome};

/// A month of freelance income plus rent and two subscriptions, with a
/// single checking account of 900
pub fn demo_state(now: NaiveDateTime) -> PipelineState {
    let ago = |days: i64| now - Duration::days(days);

    let transactions = vec![
        Transaction::new("t1", ago(7), 650.0, "Client A", "salary"),
        Transaction::new("t2", ago(14), 700.0, "Client A", "salary"),
        Transaction::new("t3", ago(21), 620.0, "Client B", "salary"),
        Transaction::new("t4", ago(28), 700.0, "Client A", "salary"),
        Transaction::new("e1", ago(29), -12.99, "Spotify", "subscription"),
        Transaction::new("e2", ago(59), -12.49, "Spotify", "subscription"),
        Transaction::new("e3", ago(27), -59.99, "PhoneCo", "subscription"),
        Transaction::new("e4", ago(57), -59.99, "PhoneCo", "subscription"),
        Transaction::new("e5", ago(30), -800.0, "Landlord", "rent"),
        Transaction::new("e6", ago(60), -800.0, "Landlord", "rent"),
    ];

    let mut balances = Balances::new();
    balances.insert("chk".to_string(), 900.0);

    PipelineState::new("EUR", balances, transactions)
}

/// Run the demo at `now` and return the printed output
pub fn run_demo(config_path: Option<&Path>, now: NaiveDateTime, json: bool) -> Result<String> {
    let (config, _) = load_config(config_path)?;
    let bills_window_days = config.allocation.bills_window_days;
    let out = Pipeline::with_config(config, now).run(demo_state(now));
    render_outcome(&out, now.date(), bills_window_days, json)
}

pub fn cmd_demo(config_path: Option<&Path>, json: bool) -> Result<()> {
    let now = chrono::Local::now().naive_local();
    println!("{}", run_demo(config_path, now, json)?);
    Ok(())
}
