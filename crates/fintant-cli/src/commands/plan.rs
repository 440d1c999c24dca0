//! Plan command: run the pipeline over caller-supplied data

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fintant_core::{parse_plan_request, parse_transactions_csv, Pipeline, PipelineState};
use tracing::info;

use super::{load_config, parse_balances, render_outcome, resolve_now};

/// Where the initial state comes from
pub enum PlanSource {
    /// JSON plan request
    Request(PathBuf),
    /// CSV history plus balances given on the command line
    Csv {
        path: PathBuf,
        balances: Vec<String>,
        currency: String,
    },
}

/// Build the initial pipeline state from a source
pub fn load_state(source: &PlanSource) -> Result<PipelineState> {
    match source {
        PlanSource::Request(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open file: {}", path.display()))?;
            let request = parse_plan_request(file)
                .with_context(|| format!("Failed to parse plan request: {}", path.display()))?;
            Ok(request.into())
        }
        PlanSource::Csv {
            path,
            balances,
            currency,
        } => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open file: {}", path.display()))?;
            let transactions = parse_transactions_csv(file)
                .with_context(|| format!("Failed to import transactions: {}", path.display()))?;
            let balances = parse_balances(balances)?;
            Ok(PipelineState::new(currency.as_str(), balances, transactions))
        }
    }
}

/// Run a plan and return the printed output
pub fn run_plan(
    config_path: Option<&Path>,
    source: &PlanSource,
    now: Option<&str>,
    json: bool,
) -> Result<String> {
    let (config, config_source) = load_config(config_path)?;
    let now = resolve_now(now)?;
    let state = load_state(source)?;

    info!(
        transactions = state.transactions.len(),
        config = %config_source,
        "Running plan"
    );

    let bills_window_days = config.allocation.bills_window_days;
    let pipeline = Pipeline::with_config(config, now);
    let out = pipeline.run(state);
    render_outcome(&out, now.date(), bills_window_days, json)
}

pub fn cmd_plan(
    config_path: Option<&Path>,
    source: PlanSource,
    now: Option<&str>,
    json: bool,
) -> Result<()> {
    println!("{}", run_plan(config_path, &source, now, json)?);
    Ok(())
}
