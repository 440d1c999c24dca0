//! Fintant CLI - Short-horizon personal cash planner
//!
//! Usage:
//!   fintant plan --input request.json              Plan from a JSON request
//!   fintant plan --transactions tx.csv -b chk=900  Plan from CSV history
//!   fintant demo                                   Run the sample scenario
//!   fintant transfer -b chk=900 -b sav=0 --from chk --to sav --amount 90

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Plan {
            input,
            transactions,
            balance,
            currency,
            now,
            json,
        } => {
            let source = match (input, transactions) {
                (Some(path), _) => commands::PlanSource::Request(path),
                (None, Some(path)) => commands::PlanSource::Csv {
                    path,
                    balances: balance,
                    currency,
                },
                (None, None) => anyhow::bail!("Specify either --input or --transactions"),
            };
            commands::cmd_plan(config_path, source, now.as_deref(), json)
        }
        Commands::Demo { json } => commands::cmd_demo(config_path, json),
        Commands::Transfer {
            bucket,
            from,
            to,
            amount,
        } => commands::cmd_transfer(&bucket, &from, &to, amount),
        Commands::Config => commands::cmd_config(config_path),
    }
}
