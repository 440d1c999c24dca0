//! Smart Allocator
//!
//! Combines balances, the income forecast and upcoming obligations into a
//! proposed set of money movements:
//! - Deficit: reserve for bills due soon, nothing discretionary
//! - Surplus: top up the emergency buffer first, then suggest investing
//!   part of what is left

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::config::AllocationConfig;
use crate::models::{
    round2, AllocationAction, AllocationKind, AllocationPlan, PipelineState, DEFAULT_CURRENCY,
};

/// Bucket reserved for bills due in the planning window
pub const BILLS_TARGET: &str = "bills_14d";
/// Bucket holding the emergency buffer
pub const BUFFER_TARGET: &str = "emergency_buffer";

/// Heuristic allocation planner
pub struct AllocationPlanner {
    config: AllocationConfig,
}

impl AllocationPlanner {
    pub fn new() -> Self {
        Self {
            config: AllocationConfig::default(),
        }
    }

    pub fn with_config(config: AllocationConfig) -> Self {
        Self { config }
    }

    /// Minimum cash the plan tries to protect given near-term bills
    pub fn buffer_target(&self, need_for_bills: f64) -> f64 {
        let cfg = &self.config;
        cfg.min_buffer
            .max(cfg.buffer_ratio * need_for_bills.max(cfg.min_buffer))
    }

    /// Build an allocation plan from the state's balances, forecast and
    /// upcoming expenses. A missing forecast counts as zero income.
    pub fn plan(&self, state: &PipelineState, today: NaiveDate) -> AllocationPlan {
        let cfg = &self.config;

        let currency = if state.currency.is_empty() {
            DEFAULT_CURRENCY.to_string()
        } else {
            state.currency.clone()
        };
        let liquid = state.liquid_balance();
        let p10 = state
            .income_forecast
            .as_ref()
            .map(|fc| fc.p10)
            .unwrap_or(0.0);

        let horizon = today + Duration::days(cfg.bills_window_days);
        let need_for_bills: f64 = state
            .upcoming()
            .iter()
            .filter(|e| e.due_date <= horizon)
            .map(|e| e.expected_amount)
            .sum();

        let buffer_target = self.buffer_target(need_for_bills);
        let projected_cash = liquid + p10 - need_for_bills;

        let mut actions = Vec::new();
        let mut shortfall = 0.0;

        if projected_cash < buffer_target {
            shortfall = buffer_target - projected_cash;

            // Cover bills before anything discretionary
            if need_for_bills > 0.0 {
                actions.push(AllocationAction {
                    kind: AllocationKind::Reserve,
                    amount: round2(need_for_bills.min(liquid.max(0.0))),
                    target: BILLS_TARGET.to_string(),
                    rationale: "Cover upcoming bills first".to_string(),
                    requires_user_approval: false,
                });
            }
        } else {
            let mut surplus = projected_cash - buffer_target;

            let buffer_gap = (buffer_target - (liquid - need_for_bills).max(0.0)).max(0.0);
            let add_to_buffer = buffer_gap.min(surplus);
            if add_to_buffer > 0.0 {
                actions.push(AllocationAction {
                    kind: AllocationKind::Save,
                    amount: round2(add_to_buffer),
                    target: BUFFER_TARGET.to_string(),
                    rationale: "Top up emergency buffer".to_string(),
                    requires_user_approval: true,
                });
                surplus -= add_to_buffer;
            }

            let invest_amount = round2(surplus * cfg.invest_share).max(0.0);
            if invest_amount > 0.0 {
                actions.push(AllocationAction {
                    kind: AllocationKind::Invest,
                    amount: invest_amount,
                    target: cfg.invest_target.clone(),
                    rationale: "Put part of surplus to work (values-aligned index)".to_string(),
                    requires_user_approval: true,
                });
            }
        }

        let plan = AllocationPlan {
            currency,
            shortfall: round2(shortfall),
            buffer_target: round2(buffer_target),
            buffer_after_plan: round2(projected_cash.max(0.0)),
            actions,
        };

        debug!(
            liquid,
            need_for_bills,
            projected_cash,
            shortfall = plan.shortfall,
            actions = plan.actions.len(),
            "Allocation plan computed"
        );

        plan
    }
}

impl Default for AllocationPlanner {
    fn default() -> Self {
        Self::new()
    }
}
