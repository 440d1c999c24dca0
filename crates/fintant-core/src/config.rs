//! Planner configuration
//!
//! Every heuristic constant the pipeline uses lives here so it can be tuned
//! without a rebuild.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit override path, or the override in the data dir
//!    (~/.local/share/fintant/config/planner.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Every key is optional; a partial override only replaces what it names.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/planner.toml");

/// Income forecasting knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Trailing window for weekly income aggregation
    pub lookback_weeks: u32,
    pub horizon_days: u32,
    /// Number of most recent weekly samples averaged into `expected`
    pub recent_samples: usize,
    pub p10_multiplier: f64,
    pub p90_multiplier: f64,
    pub confidence_base: f64,
    /// Confidence added per weekly sample
    pub confidence_step: f64,
    /// Confidence reported when there is no income history at all
    pub empty_confidence: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            lookback_weeks: 8,
            horizon_days: 14,
            recent_samples: 4,
            p10_multiplier: 0.6,
            p90_multiplier: 1.4,
            confidence_base: 0.5,
            confidence_step: 0.05,
            empty_confidence: 0.25,
        }
    }
}

/// Recurring obligation detection knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObligationConfig {
    /// Lower bound of the "monthly" average gap band (inclusive)
    pub min_gap_days: f64,
    /// Upper bound of the "monthly" average gap band (inclusive)
    pub max_gap_days: f64,
    /// How many of the most recent charges feed the amount estimate
    pub amount_window: usize,
    pub certainty: f64,
    /// A predicted date already in the past moves to today + this many days
    pub missed_grace_days: i64,
    pub missed_certainty: f64,
}

impl Default for ObligationConfig {
    fn default() -> Self {
        Self {
            min_gap_days: 25.0,
            max_gap_days: 35.0,
            amount_window: 3,
            certainty: 0.6,
            missed_grace_days: 7,
            missed_certainty: 0.4,
        }
    }
}

/// Allocation planning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Bills due within this many days are reserved for
    pub bills_window_days: i64,
    /// Floor of the buffer target
    pub min_buffer: f64,
    /// Fraction of near-term bills the buffer should cover
    pub buffer_ratio: f64,
    /// Share of the remaining surplus suggested for investment
    pub invest_share: f64,
    pub invest_target: String,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            bills_window_days: 14,
            min_buffer: 200.0,
            buffer_ratio: 0.25,
            invest_share: 0.5,
            invest_target: "values_index_placeholder".to_string(),
        }
    }
}

/// Policy guardrails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Largest fraction of liquid balance a single action may move
    pub max_move_fraction: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_move_fraction: 0.1,
        }
    }
}

/// Safety-net option sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyNetConfig {
    pub reschedule_days: u32,
    pub micro_advance_limit: f64,
}

impl Default for SafetyNetConfig {
    fn default() -> Self {
        Self {
            reschedule_days: 3,
            micro_advance_limit: 100.0,
        }
    }
}

/// Complete planner configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub forecast: ForecastConfig,
    pub obligations: ObligationConfig,
    pub allocation: AllocationConfig,
    pub policy: PolicyConfig,
    pub safety_net: SafetyNetConfig,
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Embedded,
    File(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Embedded => write!(f, "embedded defaults"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl PlannerConfig {
    /// Load with the default resolution (data dir override, then embedded)
    pub fn load() -> Result<(Self, ConfigSource)> {
        load_config(None)
    }

    /// Load from an explicit override path, falling back to embedded
    /// defaults if the file does not exist
    pub fn load_from(path: &Path) -> Result<(Self, ConfigSource)> {
        load_config(Some(path))
    }

    /// Parse config from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("fintant").join("config").join("planner.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<(PlannerConfig, ConfigSource)> {
    let candidate = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    match candidate {
        Some(path) if path.exists() => {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            let config = parse_config(&content)?;
            tracing::debug!(path = %path.display(), "Loaded planner config override");
            Ok((config, ConfigSource::File(path)))
        }
        _ => Ok((parse_config(DEFAULT_CONFIG)?, ConfigSource::Embedded)),
    }
}

fn parse_config(content: &str) -> Result<PlannerConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let config = PlannerConfig::from_toml(
            r#"
[policy]
max_move_fraction = 0.25

[allocation]
min_buffer = 500.0
"#,
        )
        .unwrap();

        assert_eq!(config.policy.max_move_fraction, 0.25);
        assert_eq!(config.allocation.min_buffer, 500.0);
        assert_eq!(config.allocation.buffer_ratio, 0.25);
        assert_eq!(config.forecast, ForecastConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = PlannerConfig::from_toml("[policy\nmax_move_fraction = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_wrong_type_is_config_error() {
        let err = PlannerConfig::from_toml("[forecast]\nlookback_weeks = \"eight\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[safety_net]\nmicro_advance_limit = 50.0").unwrap();

        let (config, source) = PlannerConfig::load_from(file.path()).unwrap();

        assert_eq!(config.safety_net.micro_advance_limit, 50.0);
        assert_eq!(config.safety_net.reschedule_days, 3);
        assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_load_from_missing_file_uses_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let (config, source) = PlannerConfig::load_from(&dir.path().join("nope.toml")).unwrap();

        assert_eq!(config, PlannerConfig::default());
        assert_eq!(source, ConfigSource::Embedded);
    }

    #[test]
    fn test_to_toml_roundtrips() {
        let config = PlannerConfig::default();
        let rendered = config.to_toml().unwrap();
        assert_eq!(PlannerConfig::from_toml(&rendered).unwrap(), config);
    }
}
