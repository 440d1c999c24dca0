//! Safety net options for projected shortfalls
//!
//! Advisory only; nothing here moves money.

use tracing::debug;

use crate::config::SafetyNetConfig;
use crate::models::{round2, SafetyOption, SafetyOptions};

pub struct SafetyNetAdvisor {
    config: SafetyNetConfig,
}

impl SafetyNetAdvisor {
    pub fn new() -> Self {
        Self {
            config: SafetyNetConfig::default(),
        }
    }

    pub fn with_config(config: SafetyNetConfig) -> Self {
        Self { config }
    }

    /// Relief options sized to `shortfall`; empty when there is none
    pub fn advise(&self, shortfall: f64) -> SafetyOptions {
        if shortfall <= 0.0 {
            return SafetyOptions::default();
        }

        let days = self.config.reschedule_days;
        let options = vec![
            SafetyOption::RescheduleBill {
                days,
                note: format!("Ask landlord or utility for {}-day shift", days),
            },
            SafetyOption::MicroAdvance {
                amount: round2(shortfall.min(self.config.micro_advance_limit)),
                note: "Offer small, fee-free bridge".to_string(),
            },
            SafetyOption::PartialPayment {
                amount: round2(shortfall),
                note: "Split the bill in two".to_string(),
            },
        ];

        debug!(shortfall, options = options.len(), "Safety net options prepared");
        SafetyOptions { options }
    }
}

impl Default for SafetyNetAdvisor {
    fn default() -> Self {
        Self::new()
    }
}
