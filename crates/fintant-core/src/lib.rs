//! Fintant Core Library
//!
//! Deterministic decision pipeline for short-horizon personal cash planning:
//! - Weekly income aggregation and a heuristic income forecast
//! - Recurring (~monthly) obligation detection
//! - Allocation planning against a minimum cash buffer
//! - Policy caps on suggested money movement
//! - Safety net options when a shortfall is projected
//!
//! Around the pipeline:
//! - Narrative rendering of a finished plan
//! - Bucket transfers for user-approved actions
//! - CSV/JSON import and TOML configuration

pub mod aggregate;
pub mod allocate;
pub mod config;
pub mod detect;
pub mod error;
pub mod forecast;
pub mod import;
pub mod models;
pub mod narrative;
pub mod pipeline;
pub mod policy;
pub mod route;
pub mod safety_net;
pub mod transfer;

/// Test utilities: fixed clock and transaction builders
#[cfg(test)]
pub mod test_utils;

pub use aggregate::weekly_income;
pub use allocate::AllocationPlanner;
pub use config::{ConfigSource, PlannerConfig};
pub use detect::ObligationDetector;
pub use error::{Error, Result, TransferError};
pub use forecast::IncomeForecaster;
pub use import::{parse_plan_request, parse_transactions_csv, PlanRequest};
pub use models::{
    AllocationAction, AllocationKind, AllocationPlan, Balances, IncomeForecast, PipelineState,
    SafetyOption, SafetyOptions, Transaction, UpcomingExpense,
};
pub use narrative::{NarrativeRenderer, PlainTextRenderer};
pub use pipeline::{Pipeline, Stage};
pub use policy::PolicyGuard;
pub use route::{next_stage, Route};
pub use safety_net::SafetyNetAdvisor;
pub use transfer::{transfer, TransferReceipt};
