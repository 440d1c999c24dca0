//! Money movement between named buckets
//!
//! Only ever called after a user approves an allocation action. The
//! pipeline itself never moves money.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::TransferError;
use crate::models::Balances;

/// Result of a successful transfer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub from: String,
    pub to: String,
    pub amount: f64,
    /// Balance of `from` after the transfer
    pub from_balance: f64,
    /// Balance of `to` after the transfer
    pub to_balance: f64,
}

impl std::fmt::Display for TransferReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Transferred {:.2} from {} to {}. New balances: {}: {:.2}, {}: {:.2}",
            self.amount, self.from, self.to, self.from, self.from_balance, self.to, self.to_balance
        )
    }
}

/// Move `amount` from one bucket to another.
///
/// Checks run in order: both buckets exist, the amount is positive, the
/// source holds enough. On any error the buckets are left unchanged.
pub fn transfer(
    buckets: &mut Balances,
    from: &str,
    to: &str,
    amount: f64,
) -> Result<TransferReceipt, TransferError> {
    for name in [from, to] {
        if !buckets.contains_key(name) {
            return Err(TransferError::UnknownBucket(name.to_string()));
        }
    }

    // `!(amount > 0.0)` also rejects NaN
    if !(amount > 0.0) {
        return Err(TransferError::NonPositiveAmount(amount));
    }

    let available = buckets[from];
    if available < amount {
        return Err(TransferError::InsufficientFunds {
            bucket: from.to_string(),
            available,
            requested: amount,
        });
    }

    if let Some(balance) = buckets.get_mut(from) {
        *balance -= amount;
    }
    if let Some(balance) = buckets.get_mut(to) {
        *balance += amount;
    }

    let receipt = TransferReceipt {
        from: from.to_string(),
        to: to.to_string(),
        amount,
        from_balance: buckets[from],
        to_balance: buckets[to],
    };

    info!(from, to, amount, "Bucket transfer completed");
    Ok(receipt)
}
