//! Decision pipeline
//!
//! Runs the stages in a fixed order over one [`PipelineState`]:
//!
//! ```text
//! Forecast -> Detect -> Allocate -> Guard -+-> SafetyNet -> Done
//!                                          +-> Done
//! ```
//!
//! The only branch is after Guard and is decided by [`next_stage`]. Each
//! stage takes the state by value and returns it with only its own field
//! filled in. Narrative rendering happens after `Done`, outside the
//! pipeline.

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info};

use crate::allocate::AllocationPlanner;
use crate::config::PlannerConfig;
use crate::detect::ObligationDetector;
use crate::forecast::IncomeForecaster;
use crate::models::PipelineState;
use crate::policy::PolicyGuard;
use crate::route::{next_stage, Route};
use crate::safety_net::SafetyNetAdvisor;

/// Pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Forecast,
    Detect,
    Allocate,
    Guard,
    SafetyNet,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Forecast => "forecast",
            Stage::Detect => "detect",
            Stage::Allocate => "allocate",
            Stage::Guard => "guard",
            Stage::SafetyNet => "safety_net",
            Stage::Done => "done",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The decision pipeline with an injected "now"
pub struct Pipeline {
    forecaster: IncomeForecaster,
    detector: ObligationDetector,
    planner: AllocationPlanner,
    guard: PolicyGuard,
    advisor: SafetyNetAdvisor,
    now: NaiveDateTime,
}

impl Pipeline {
    /// Pipeline with default heuristics, anchored at the local wall clock
    pub fn new() -> Self {
        Self::at(Local::now().naive_local())
    }

    /// Pipeline with default heuristics anchored at `now`
    pub fn at(now: NaiveDateTime) -> Self {
        Self::with_config(PlannerConfig::default(), now)
    }

    pub fn with_config(config: PlannerConfig, now: NaiveDateTime) -> Self {
        Self {
            forecaster: IncomeForecaster::with_config(config.forecast),
            detector: ObligationDetector::with_config(config.obligations),
            planner: AllocationPlanner::with_config(config.allocation),
            guard: PolicyGuard::with_config(config.policy),
            advisor: SafetyNetAdvisor::with_config(config.safety_net),
            now,
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Run every stage from `Forecast` to `Done`
    pub fn run(&self, state: PipelineState) -> PipelineState {
        let mut stage = Stage::Forecast;
        let mut state = state;

        while stage != Stage::Done {
            let (next_state, next) = self.step(stage, state);
            debug!(from = %stage, to = %next, "Stage complete");
            state = next_state;
            stage = next;
        }

        info!(
            shortfall = state.shortfall(),
            upcoming = state.upcoming().len(),
            actions = state
                .allocation_plan
                .as_ref()
                .map(|p| p.actions.len())
                .unwrap_or(0),
            safety_net = state.safety_options.is_some(),
            "Pipeline finished"
        );

        state
    }

    /// Execute one stage and return the updated state with the stage that
    /// follows it
    pub fn step(&self, stage: Stage, state: PipelineState) -> (PipelineState, Stage) {
        let today = self.now.date();

        match stage {
            Stage::Forecast => {
                let forecast = self
                    .forecaster
                    .forecast_transactions(&state.transactions, self.now);
                (state.with_income_forecast(forecast), Stage::Detect)
            }
            Stage::Detect => {
                let upcoming = self.detector.detect(&state.transactions, today);
                (state.with_upcoming_expenses(upcoming), Stage::Allocate)
            }
            Stage::Allocate => {
                let plan = self.planner.plan(&state, today);
                (state.with_allocation_plan(plan), Stage::Guard)
            }
            Stage::Guard => {
                let Some(plan) = state.allocation_plan.clone() else {
                    // Nothing to guard; allocation has to run first
                    return (state, Stage::Allocate);
                };
                let capped = self.guard.apply_caps(plan, &state.balances);
                let next = match next_stage(&capped) {
                    Route::SafetyNet => Stage::SafetyNet,
                    Route::Translate => Stage::Done,
                };
                (state.with_allocation_plan(capped), next)
            }
            Stage::SafetyNet => {
                let options = self.advisor.advise(state.shortfall());
                (state.with_safety_options(options), Stage::Done)
            }
            Stage::Done => (state, Stage::Done),
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
