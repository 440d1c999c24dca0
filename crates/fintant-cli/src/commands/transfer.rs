//! Transfer command: execute an approved move between buckets

use anyhow::{Context, Result};
use fintant_core::{transfer, TransferReceipt};

use super::parse_balances;

pub fn run_transfer(
    buckets: &[String],
    from: &str,
    to: &str,
    amount: f64,
) -> Result<TransferReceipt> {
    let mut balances = parse_balances(buckets)?;
    let receipt = transfer(&mut balances, from, to, amount)
        .with_context(|| format!("Transfer of {:.2} from {} to {} failed", amount, from, to))?;
    Ok(receipt)
}

pub fn cmd_transfer(buckets: &[String], from: &str, to: &str, amount: f64) -> Result<()> {
    let receipt = run_transfer(buckets, from, to, amount)?;
    println!("✅ {}", receipt);
    Ok(())
}
