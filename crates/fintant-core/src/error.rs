//! Error types for Fintant

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Validation failures of the bucket transfer operation.
///
/// All variants are caller-visible and non-retriable; the buckets are left
/// untouched whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error("Unknown bucket: {0}")]
    UnknownBucket(String),

    #[error("Transfer amount must be greater than zero (got {0})")]
    NonPositiveAmount(f64),

    #[error("Insufficient funds in {bucket}: available {available:.2}, requested {requested:.2}")]
    InsufficientFunds {
        bucket: String,
        available: f64,
        requested: f64,
    },
}
