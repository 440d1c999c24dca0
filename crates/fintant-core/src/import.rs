//! Transaction and plan request import
//!
//! Two input shapes are supported:
//! - CSV transaction history (`id,timestamp,amount,merchant,category`,
//!   any extra columns are kept as metadata)
//! - JSON plan requests carrying currency, balances and transactions

use std::collections::BTreeMap;
use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Balances, PipelineState, Transaction, DEFAULT_CURRENCY};

const REQUIRED_COLUMNS: [&str; 5] = ["id", "timestamp", "amount", "merchant", "category"];

/// A decision request as submitted by a caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub balances: Balances,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl From<PlanRequest> for PipelineState {
    fn from(request: PlanRequest) -> Self {
        PipelineState::new(request.currency, request.balances, request.transactions)
    }
}

/// Parse a JSON plan request
pub fn parse_plan_request<R: Read>(reader: R) -> Result<PlanRequest> {
    let request: PlanRequest = serde_json::from_reader(reader)?;
    debug!(
        transactions = request.transactions.len(),
        accounts = request.balances.len(),
        "Parsed plan request"
    );
    Ok(request)
}

/// Parse a timestamp in one of the accepted forms.
///
/// `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` or a bare date (midnight).
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(ts);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::Import(format!("Invalid timestamp: {}", value)))
}

/// Parse a finite monetary amount. `inf` and `NaN` are not amounts.
fn parse_amount(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a `name=amount` balance entry
pub fn parse_balance(entry: &str) -> Result<(String, f64)> {
    let (name, amount) = entry
        .split_once('=')
        .ok_or_else(|| Error::InvalidData(format!("Expected name=amount, got: {}", entry)))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidData(format!("Missing name in: {}", entry)));
    }
    let amount = parse_amount(amount)
        .ok_or_else(|| Error::InvalidData(format!("Invalid amount in: {}", entry)))?;
    Ok((name.to_string(), amount))
}

/// Generate a stable id for rows that do not carry one
fn generate_id(ts: &NaiveDateTime, merchant: &str, amount: f64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ts.to_string().as_bytes());
    hasher.update(merchant.as_bytes());
    hasher.update(amount.to_be_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..16].to_string()
}

/// Parse CSV transaction history
pub fn parse_transactions_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let mut positions = [0usize; 5];
    for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = column(name)
            .ok_or_else(|| Error::Import(format!("Missing column: {}", name)))?;
    }
    let [id_col, ts_col, amount_col, merchant_col, category_col] = positions;

    let mut transactions = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = index + 2;
        let field = |col: usize| record.get(col).unwrap_or("");

        let ts = parse_timestamp(field(ts_col))
            .map_err(|e| Error::Import(format!("Line {}: {}", line, e)))?;
        let amount = parse_amount(field(amount_col))
            .ok_or_else(|| Error::Import(format!("Line {}: invalid amount", line)))?;
        let merchant = field(merchant_col).to_string();
        if merchant.is_empty() {
            return Err(Error::Import(format!("Line {}: missing merchant", line)));
        }

        let id = match field(id_col) {
            "" => generate_id(&ts, &merchant, amount),
            id => id.to_string(),
        };

        let mut tx = Transaction::new(id, ts, amount, merchant, field(category_col));
        let meta = extra_columns(&headers, &record, &positions);
        if !meta.is_empty() {
            tx = tx.with_meta(meta);
        }
        transactions.push(tx);
    }

    debug!(count = transactions.len(), "Parsed transaction CSV");
    Ok(transactions)
}

/// Non-empty values of columns outside the required set
fn extra_columns(
    headers: &StringRecord,
    record: &StringRecord,
    required: &[usize],
) -> BTreeMap<String, Value> {
    headers
        .iter()
        .enumerate()
        .filter(|(i, _)| !required.contains(i))
        .filter_map(|(i, header)| {
            record
                .get(i)
                .filter(|v| !v.is_empty())
                .map(|v| (header.to_string(), Value::String(v.to_string())))
        })
        .collect()
}
