//! Policy guardrails on suggested money movement
//!
//! New users start with a flat ceiling: no single action may move more than
//! a fixed fraction of the liquid balance.
// TODO: scale the ceiling per trust tier (tenure, verification level,
// acceptance history) once those signals exist.

use tracing::debug;

use crate::config::PolicyConfig;
use crate::models::{floor2, total_liquid_balance, AllocationPlan, Balances};

/// Suffix appended to the rationale of every capped action
pub const CAPPED_SUFFIX: &str = " (capped by policy)";

pub struct PolicyGuard {
    config: PolicyConfig,
}

impl PolicyGuard {
    pub fn new() -> Self {
        Self {
            config: PolicyConfig::default(),
        }
    }

    pub fn with_config(config: PolicyConfig) -> Self {
        Self { config }
    }

    /// Largest amount a single action may move given these balances,
    /// rounded down to cents so it never exceeds the exact fraction
    pub fn cap(&self, balances: &Balances) -> f64 {
        floor2(self.config.max_move_fraction * total_liquid_balance(balances).max(0.0))
    }

    /// Clamp every action to the cap. Order is preserved and actions at or
    /// below the cap pass through untouched.
    pub fn apply_caps(&self, plan: AllocationPlan, balances: &Balances) -> AllocationPlan {
        let cap = self.cap(balances);
        let mut capped = 0usize;

        let actions = plan
            .actions
            .into_iter()
            .map(|mut action| {
                if action.amount > cap {
                    action.amount = cap;
                    action.rationale.push_str(CAPPED_SUFFIX);
                    capped += 1;
                }
                action
            })
            .collect();

        debug!(cap, capped, "Policy caps applied");

        AllocationPlan { actions, ..plan }
    }
}

impl Default for PolicyGuard {
    fn default() -> Self {
        Self::new()
    }
}
