//! Integration tests for fintant-core
//!
//! These tests exercise the full import → pipeline → narrative workflow
//! through the public API.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use fintant_core::{
    next_stage, parse_plan_request, parse_transactions_csv, transfer, AllocationAction,
    AllocationKind, AllocationPlan, Balances, IncomeForecaster, NarrativeRenderer,
    ObligationDetector, Pipeline, PipelineState, PlainTextRenderer, PlannerConfig, PolicyGuard,
    Route, SafetyOption, Transaction, TransferError,
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 18)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn days_ago(days: i64) -> NaiveDateTime {
    now() - Duration::days(days)
}

fn balances(entries: &[(&str, f64)]) -> Balances {
    entries
        .iter()
        .map(|(name, amount)| (name.to_string(), *amount))
        .collect()
}

/// Income history with weekly sums 700, 620, 700, 650 (oldest first)
fn healthy_income() -> Vec<Transaction> {
    vec![
        Transaction::new("t1", days_ago(7), 650.0, "Client A", "salary"),
        Transaction::new("t2", days_ago(14), 700.0, "Client A", "salary"),
        Transaction::new("t3", days_ago(21), 620.0, "Client B", "salary"),
        Transaction::new("t4", days_ago(28), 700.0, "Client A", "salary"),
    ]
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_scenario_a_no_transactions() {
    let state = PipelineState::new("EUR", balances(&[("chk", 0.0)]), vec![]);
    let out = Pipeline::at(now()).run(state);

    let fc = out.income_forecast.as_ref().unwrap();
    assert_eq!(fc.confidence, 0.25);
    assert_eq!((fc.expected, fc.p10, fc.p90), (0.0, 0.0, 0.0));

    let plan = out.allocation_plan.as_ref().unwrap();
    assert_eq!(plan.buffer_target, 200.0);
    assert_eq!(plan.shortfall, 200.0);
    // No bills due, so no reserve action either
    assert!(plan.actions.is_empty());
    assert_eq!(next_stage(plan), Route::SafetyNet);
    assert_eq!(out.safety_options.as_ref().unwrap().options.len(), 3);
}

#[test]
fn test_scenario_b_healthy_surplus() {
    let state = PipelineState::new("EUR", balances(&[("chk", 900.0)]), healthy_income());
    let out = Pipeline::at(now()).run(state);

    let fc = out.income_forecast.as_ref().unwrap();
    assert_eq!(fc.expected, 667.5);
    assert_eq!(fc.p10, 400.5);

    let plan = out.allocation_plan.as_ref().unwrap();
    assert_eq!(plan.shortfall, 0.0);
    assert_eq!(plan.buffer_target, 200.0);
    assert_eq!(plan.buffer_after_plan, 1300.5);
    assert_eq!(next_stage(plan), Route::Translate);
    assert!(out.safety_options.is_none());

    // Investment suggestion survives, capped at 10% of 900
    let invest = plan
        .actions
        .iter()
        .find(|a| a.kind == AllocationKind::Invest)
        .unwrap();
    assert_eq!(invest.amount, 90.0);
    assert!(invest.rationale.ends_with(" (capped by policy)"));
}

#[test]
fn test_scenario_c_policy_cap() {
    let plan = AllocationPlan {
        currency: "EUR".to_string(),
        shortfall: 0.0,
        buffer_target: 200.0,
        buffer_after_plan: 1000.0,
        actions: vec![AllocationAction {
            kind: AllocationKind::Save,
            amount: 500.0,
            target: "emergency_buffer".to_string(),
            rationale: "Top up emergency buffer".to_string(),
            requires_user_approval: true,
        }],
    };

    let capped = PolicyGuard::new().apply_caps(plan, &balances(&[("chk", 1000.0)]));

    assert_eq!(capped.actions[0].amount, 100.0);
    assert_eq!(
        capped.actions[0].rationale,
        "Top up emergency buffer (capped by policy)"
    );
}

#[test]
fn test_scenario_d_recurring_obligation() {
    let today = now().date();
    let detector = ObligationDetector::new();

    let recent = vec![
        Transaction::new("r1", days_ago(45), -800.0, "Landlord", "rent"),
        Transaction::new("r2", days_ago(15), -800.0, "Landlord", "rent"),
    ];
    let found = detector.detect(&recent, today);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].due_date, days_ago(15).date() + Duration::days(30));
    assert_eq!(found[0].certainty, 0.6);

    let stale = vec![
        Transaction::new("r1", days_ago(95), -800.0, "Landlord", "rent"),
        Transaction::new("r2", days_ago(65), -800.0, "Landlord", "rent"),
    ];
    let found = detector.detect(&stale, today);
    assert_eq!(found[0].due_date, today + Duration::days(7));
    assert_eq!(found[0].certainty, 0.4);
}

// =============================================================================
// Properties over a grid of inputs
// =============================================================================

fn grid_states() -> Vec<PipelineState> {
    let mut states = Vec::new();
    for liquid in [-250.0, 0.0, 50.0, 199.99, 900.0, 12_500.0] {
        for rent in [0.0, 45.0, 800.0, 3_000.0] {
            for weekly in [0.0, 120.0, 667.5] {
                let mut txs = Vec::new();
                if weekly > 0.0 {
                    for week in 1..=5 {
                        txs.push(Transaction::new(
                            format!("i{}", week),
                            days_ago(week * 7),
                            weekly,
                            "Employer",
                            "salary",
                        ));
                    }
                }
                if rent > 0.0 {
                    txs.push(Transaction::new("r1", days_ago(62), -rent, "Landlord", "rent"));
                    txs.push(Transaction::new("r2", days_ago(31), -rent, "Landlord", "rent"));
                    txs.push(Transaction::new("r3", days_ago(1), -rent, "Landlord", "rent"));
                }
                states.push(PipelineState::new("EUR", balances(&[("chk", liquid)]), txs));
            }
        }
    }
    states
}

#[test]
fn test_invariants_hold_across_inputs() {
    let pipeline = Pipeline::at(now());
    let today = now().date();

    for state in grid_states() {
        let liquid = state.liquid_balance();
        let out = pipeline.run(state);

        let fc = out.income_forecast.as_ref().unwrap();
        assert!((0.0..=1.0).contains(&fc.confidence));
        if fc.expected > 0.0 {
            assert!(fc.p10 <= fc.expected && fc.expected <= fc.p90);
        }

        let plan = out.allocation_plan.as_ref().unwrap();
        assert!(plan.buffer_target >= 200.0);
        assert!(plan.shortfall >= 0.0);
        assert!(plan.buffer_after_plan >= 0.0);

        let cap = 0.1 * liquid.max(0.0);
        for action in &plan.actions {
            assert!(action.amount >= 0.0);
            assert!(action.amount <= cap + 1e-9, "{} > {}", action.amount, cap);
        }

        for expense in out.upcoming() {
            assert!(expense.due_date >= today);
            assert!(expense.expected_amount > 0.0);
        }

        match next_stage(plan) {
            Route::SafetyNet => {
                assert!(plan.shortfall > 0.0);
                assert_eq!(out.safety_options.as_ref().unwrap().options.len(), 3);
            }
            Route::Translate => {
                assert_eq!(plan.shortfall, 0.0);
                assert!(out.safety_options.is_none());
            }
        }
    }
}

#[test]
fn test_pipeline_is_idempotent() {
    let pipeline = Pipeline::at(now());

    for state in grid_states() {
        let first = pipeline.run(state.clone());
        let second = pipeline.run(state);

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first.digest().unwrap(), second.digest().unwrap());
    }
}

#[test]
fn test_single_debit_merchant_never_detected() {
    let txs = vec![
        Transaction::new("a", days_ago(3), -50.0, "OneOff", "misc"),
        Transaction::new("b", days_ago(40), 50.0, "OneOff", "refund"),
    ];
    assert!(ObligationDetector::new().detect(&txs, now().date()).is_empty());
}

#[test]
fn test_forecaster_confidence_grows_with_history() {
    let forecaster = IncomeForecaster::new();
    let confidences: Vec<f64> = (0..12)
        .map(|n| forecaster.forecast(&vec![500.0; n]).confidence)
        .collect();

    assert_eq!(confidences[0], 0.25);
    assert!(confidences[1..].windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*confidences.last().unwrap(), 1.0);
}

// =============================================================================
// Import → pipeline → narrative
// =============================================================================

#[test]
fn test_csv_import_to_narrative() {
    let csv = "\
id,timestamp,amount,merchant,category
t1,2026-03-11T09:00:00,650.00,Client A,salary
t2,2026-03-04T09:00:00,700.00,Client A,salary
e1,2026-01-17,-800.00,Landlord,rent
e2,2026-02-16,-800.00,Landlord,rent
";
    let txs = parse_transactions_csv(csv.as_bytes()).unwrap();
    let state = PipelineState::new("EUR", balances(&[("chk", 300.0)]), txs);
    let out = Pipeline::at(now()).run(state);

    // Rent predicted for 2026-03-18 (today), which dominates the plan
    let upcoming = out.upcoming();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].due_date, now().date());

    let plan = out.allocation_plan.as_ref().unwrap();
    assert!(plan.shortfall > 0.0);
    assert_eq!(plan.actions[0].kind, AllocationKind::Reserve);
    assert_eq!(plan.actions[0].amount, 30.0);

    let text = PlainTextRenderer::new().render(&out, now().date());
    assert!(text.contains("Bills due in 14 days: €800.00 across 1 items."));
    assert!(text.contains("Options to keep you safe:"));
}

#[test]
fn test_json_request_round_trip_through_pipeline() {
    let json = r#"{
        "currency": "USD",
        "balances": {"chk": 1000.0, "sav": 500.0},
        "transactions": []
    }"#;
    let state: PipelineState = parse_plan_request(json.as_bytes()).unwrap().into();
    let out = Pipeline::at(now()).run(state);

    let plan = out.allocation_plan.as_ref().unwrap();
    assert_eq!(plan.currency, "USD");
    assert!(plan.actions.iter().all(|a| a.amount <= 150.0));

    let text = PlainTextRenderer::new().render(&out, now().date());
    assert!(text.contains("$"));
}

#[test]
fn test_custom_config_changes_outcome() {
    let config = PlannerConfig::from_toml("[allocation]\nmin_buffer = 1000.0\n").unwrap();
    let state = PipelineState::new("EUR", balances(&[("chk", 900.0)]), vec![]);

    let out = Pipeline::with_config(config, now()).run(state);

    let plan = out.allocation_plan.as_ref().unwrap();
    assert_eq!(plan.buffer_target, 1000.0);
    assert_eq!(plan.shortfall, 100.0);
    let options = &out.safety_options.as_ref().unwrap().options;
    assert!(matches!(options[1], SafetyOption::MicroAdvance { amount, .. } if amount == 100.0));
}

// =============================================================================
// Approved action execution
// =============================================================================

#[test]
fn test_approved_action_moves_money_once() {
    let state = PipelineState::new("EUR", balances(&[("chk", 900.0)]), healthy_income());
    let out = Pipeline::at(now()).run(state);
    let action = &out.allocation_plan.as_ref().unwrap().actions[0];

    let mut buckets = balances(&[("chk", 900.0), (action.target.as_str(), 0.0)]);
    let receipt = transfer(&mut buckets, "chk", &action.target, action.amount).unwrap();

    assert_eq!(receipt.from_balance, 810.0);
    assert_eq!(receipt.to_balance, 90.0);
    assert!(matches!(
        transfer(&mut buckets, "chk", &action.target, 10_000.0),
        Err(TransferError::InsufficientFunds { .. })
    ));
}
