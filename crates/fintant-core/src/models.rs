//! Domain models for Fintant
//!
//! Every type here is plain data. Pipeline stages derive new values from
//! these and hand them back through [`PipelineState`]; nothing is mutated
//! after construction.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Currency used when a request does not name one
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Account balances keyed by account id.
///
/// Ordered so serialized states are stable across runs.
pub type Balances = BTreeMap<String, f64>;

/// Sum of all account balances available for near-term use
pub fn total_liquid_balance(balances: &Balances) -> f64 {
    balances.values().sum()
}

/// Round a monetary value to cents
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round a monetary value down to cents, tolerating float noise just
/// below a whole cent
pub(crate) fn floor2(value: f64) -> f64 {
    ((value * 100.0) + 1e-9).floor() / 100.0
}

/// A single bank transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub ts: NaiveDateTime,
    /// Positive for income, negative for expenses
    pub amount: f64,
    pub merchant: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<BTreeMap<String, serde_json::Value>>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        ts: NaiveDateTime,
        amount: f64,
        merchant: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            ts,
            amount,
            merchant: merchant.into(),
            category: category.into(),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: BTreeMap<String, serde_json::Value>) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }
}

/// Short-horizon income estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeForecast {
    pub horizon_days: u32,
    pub expected: f64,
    /// Low estimate
    pub p10: f64,
    /// High estimate
    pub p90: f64,
    /// Heuristic confidence in [0, 1]
    pub confidence: f64,
}

/// A recurring obligation predicted to come due
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingExpense {
    pub merchant: String,
    pub due_date: NaiveDate,
    /// Always positive
    pub expected_amount: f64,
    pub certainty: f64,
    pub category: String,
}

/// Kinds of suggested money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationKind {
    Reserve,
    Save,
    Invest,
    DebtPaydown,
    None,
}

impl AllocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reserve => "reserve",
            Self::Save => "save",
            Self::Invest => "invest",
            Self::DebtPaydown => "debt_paydown",
            Self::None => "none",
        }
    }

    /// Title-cased label for display
    pub fn label(&self) -> &'static str {
        match self {
            Self::Reserve => "Reserve",
            Self::Save => "Save",
            Self::Invest => "Invest",
            Self::DebtPaydown => "Debt paydown",
            Self::None => "None",
        }
    }
}

impl std::str::FromStr for AllocationKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reserve" => Ok(Self::Reserve),
            "save" => Ok(Self::Save),
            "invest" => Ok(Self::Invest),
            "debt_paydown" | "debtpaydown" => Ok(Self::DebtPaydown),
            "none" => Ok(Self::None),
            _ => Err(format!("Unknown allocation kind: {}", s)),
        }
    }
}

impl std::fmt::Display for AllocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A proposed money movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationAction {
    pub kind: AllocationKind,
    pub amount: f64,
    /// Destination bucket or instrument label
    pub target: String,
    pub rationale: String,
    pub requires_user_approval: bool,
}

/// Output of the allocation planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub currency: String,
    /// Deficit below the buffer target; 0 when there is none
    pub shortfall: f64,
    pub buffer_target: f64,
    pub buffer_after_plan: f64,
    pub actions: Vec<AllocationAction>,
}

/// A relief option offered when a shortfall is projected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SafetyOption {
    RescheduleBill { days: u32, note: String },
    MicroAdvance { amount: f64, note: String },
    PartialPayment { amount: f64, note: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SafetyOptions {
    pub options: Vec<SafetyOption>,
}

impl SafetyOptions {
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// State threaded through every pipeline stage.
///
/// Each derived field belongs to exactly one stage. Stages receive the state
/// by value and return it with only their own field filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub currency: String,
    pub balances: Balances,
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub income_forecast: Option<IncomeForecast>,
    #[serde(default)]
    pub upcoming_expenses: Option<Vec<UpcomingExpense>>,
    #[serde(default)]
    pub allocation_plan: Option<AllocationPlan>,
    #[serde(default)]
    pub safety_options: Option<SafetyOptions>,
}

impl PipelineState {
    pub fn new(
        currency: impl Into<String>,
        balances: Balances,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            currency: currency.into(),
            balances,
            transactions,
            income_forecast: None,
            upcoming_expenses: None,
            allocation_plan: None,
            safety_options: None,
        }
    }

    pub fn liquid_balance(&self) -> f64 {
        total_liquid_balance(&self.balances)
    }

    pub fn with_income_forecast(self, forecast: IncomeForecast) -> Self {
        Self {
            income_forecast: Some(forecast),
            ..self
        }
    }

    pub fn with_upcoming_expenses(self, expenses: Vec<UpcomingExpense>) -> Self {
        Self {
            upcoming_expenses: Some(expenses),
            ..self
        }
    }

    pub fn with_allocation_plan(self, plan: AllocationPlan) -> Self {
        Self {
            allocation_plan: Some(plan),
            ..self
        }
    }

    pub fn with_safety_options(self, options: SafetyOptions) -> Self {
        Self {
            safety_options: Some(options),
            ..self
        }
    }

    /// Upcoming expenses, empty when detection has not run
    pub fn upcoming(&self) -> &[UpcomingExpense] {
        self.upcoming_expenses.as_deref().unwrap_or_default()
    }

    /// Current shortfall, 0 when no plan exists yet
    pub fn shortfall(&self) -> f64 {
        self.allocation_plan
            .as_ref()
            .map(|p| p.shortfall)
            .unwrap_or(0.0)
    }

    /// SHA-256 hex digest of the serialized state
    pub fn digest(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}
