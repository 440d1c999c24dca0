//! Routing after the policy guard

use serde::{Deserialize, Serialize};

use crate::models::AllocationPlan;

/// Where the pipeline goes once the plan has been capped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// A shortfall is projected: offer relief options first
    SafetyNet,
    /// Hand the plan straight to the narrative renderer
    Translate,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::SafetyNet => "safety_net",
            Route::Translate => "translate",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `SafetyNet` iff the plan projects a shortfall
pub fn next_stage(plan: &AllocationPlan) -> Route {
    if plan.shortfall > 0.0 {
        Route::SafetyNet
    } else {
        Route::Translate
    }
}
