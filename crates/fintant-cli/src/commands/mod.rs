//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `plan` - Run the pipeline over a JSON request or CSV history
//! - `demo` - Run the built-in sample scenario
//! - `transfer` - Move money between buckets
//! - `config` - Show the effective planner configuration
//!
//! Shared helpers for config loading, clock injection and output live here.

pub mod config;
pub mod demo;
pub mod plan;
pub mod transfer;

pub use config::*;
pub use demo::*;
pub use plan::*;
pub use transfer::*;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use fintant_core::import::{parse_balance, parse_timestamp};
use fintant_core::{
    Balances, ConfigSource, NarrativeRenderer, PipelineState, PlainTextRenderer, PlannerConfig,
};

/// Load the planner config, honoring an explicit `--config` path.
///
/// An explicit path must exist; without one the data-dir override is used
/// when present, else the embedded defaults.
pub fn load_config(path: Option<&Path>) -> Result<(PlannerConfig, ConfigSource)> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            PlannerConfig::load_from(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))
        }
        None => PlannerConfig::load().context("Failed to load config"),
    }
}

/// Reference time for a run: the given timestamp, or the local wall clock
pub fn resolve_now(now: Option<&str>) -> Result<NaiveDateTime> {
    match now {
        Some(value) => parse_timestamp(value).with_context(|| format!("Invalid --now: {}", value)),
        None => Ok(Local::now().naive_local()),
    }
}

/// Collect `name=amount` entries into balances; later entries win
pub fn parse_balances(entries: &[String]) -> Result<Balances> {
    let mut balances = Balances::new();
    for entry in entries {
        let (name, amount) = parse_balance(entry)?;
        balances.insert(name, amount);
    }
    Ok(balances)
}

/// Render a finished state as the narrative or pretty JSON, followed by
/// its digest. The narrative summarizes bills over the same window the
/// planner reserved for.
pub fn render_outcome(
    state: &PipelineState,
    today: NaiveDate,
    bills_window_days: i64,
    json: bool,
) -> Result<String> {
    let body = if json {
        serde_json::to_string_pretty(state)?
    } else {
        PlainTextRenderer::with_bills_window(bills_window_days).render(state, today)
    };
    Ok(format!("{}\n\nDigest: {}", body, state.digest()?))
}
