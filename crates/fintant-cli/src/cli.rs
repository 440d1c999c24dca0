//! CLI argument definitions using clap
//!
//! The command implementations live in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fintant - See the next two weeks of cash coming
#[derive(Parser)]
#[command(name = "fintant")]
#[command(about = "Short-horizon personal cash planner", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Planner config file (defaults to the user data directory, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the decision pipeline and print the plan
    Plan {
        /// JSON plan request (currency, balances, transactions)
        #[arg(short, long, conflicts_with_all = ["transactions", "balance", "currency"])]
        input: Option<PathBuf>,

        /// CSV transaction history (id,timestamp,amount,merchant,category)
        #[arg(short, long)]
        transactions: Option<PathBuf>,

        /// Account balance as name=amount (repeatable)
        #[arg(short, long)]
        balance: Vec<String>,

        /// Currency code for the plan
        #[arg(long, default_value = "EUR")]
        currency: String,

        /// Reference time instead of the wall clock (e.g. 2026-03-18T12:00:00)
        #[arg(long)]
        now: Option<String>,

        /// Print the final state as JSON instead of the narrative
        #[arg(long)]
        json: bool,
    },

    /// Run the built-in sample scenario
    Demo {
        /// Print the final state as JSON instead of the narrative
        #[arg(long)]
        json: bool,
    },

    /// Move money between named buckets
    Transfer {
        /// Bucket balance as name=amount (repeatable)
        #[arg(short, long, required = true)]
        bucket: Vec<String>,

        /// Source bucket
        #[arg(long)]
        from: String,

        /// Destination bucket
        #[arg(long)]
        to: String,

        /// Amount to move
        #[arg(long)]
        amount: f64,
    },

    /// Show the effective planner configuration
    Config,
}
