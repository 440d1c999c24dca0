//! Income Forecaster
//!
//! Turns weekly income sums into a short-horizon estimate:
//! - `expected` is the mean of the most recent weeks
//! - `p10`/`p90` are fixed multiples of `expected`
//! - confidence grows with the number of weeks observed

use chrono::NaiveDateTime;
use tracing::debug;

use crate::aggregate::weekly_income;
use crate::config::ForecastConfig;
use crate::models::{round2, IncomeForecast, Transaction};

/// Heuristic income forecaster
pub struct IncomeForecaster {
    config: ForecastConfig,
}

impl IncomeForecaster {
    pub fn new() -> Self {
        Self {
            config: ForecastConfig::default(),
        }
    }

    pub fn with_config(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// Forecast from raw transactions, aggregating over the configured
    /// lookback window ending at `now`
    pub fn forecast_transactions(
        &self,
        transactions: &[Transaction],
        now: NaiveDateTime,
    ) -> IncomeForecast {
        let weeks = weekly_income(transactions, self.config.lookback_weeks, now);
        self.forecast(&weeks)
    }

    /// Forecast from weekly income sums, oldest first
    pub fn forecast(&self, weekly_sums: &[f64]) -> IncomeForecast {
        let cfg = &self.config;

        if weekly_sums.is_empty() {
            debug!("No income history, returning low-confidence forecast");
            return IncomeForecast {
                horizon_days: cfg.horizon_days,
                expected: 0.0,
                p10: 0.0,
                p90: 0.0,
                confidence: cfg.empty_confidence,
            };
        }

        let recent = &weekly_sums[weekly_sums.len().saturating_sub(cfg.recent_samples.max(1))..];
        let expected = mean(recent);
        let confidence =
            (cfg.confidence_base + cfg.confidence_step * weekly_sums.len() as f64).min(1.0);

        let forecast = IncomeForecast {
            horizon_days: cfg.horizon_days,
            expected: round2(expected),
            p10: round2(cfg.p10_multiplier * expected),
            p90: round2(cfg.p90_multiplier * expected),
            confidence: round2(confidence),
        };

        debug!(
            samples = weekly_sums.len(),
            expected = forecast.expected,
            p10 = forecast.p10,
            p90 = forecast.p90,
            confidence = forecast.confidence,
            "Income forecast computed"
        );

        forecast
    }
}

impl Default for IncomeForecaster {
    fn default() -> Self {
        Self::new()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
