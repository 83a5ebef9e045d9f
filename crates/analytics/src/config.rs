//! Engine configuration (policy constants and display thresholds).

use thiserror::Error;

use crate::demand::DEFAULT_BASELINE_DEMAND;
use crate::expiration::DEFAULT_RISK_THRESHOLD;
use crate::optimization::InventoryPolicy;

pub const ENV_LEAD_TIME_DAYS: &str = "MEDSUPPLY_LEAD_TIME_DAYS";
pub const ENV_SERVICE_LEVEL: &str = "MEDSUPPLY_SERVICE_LEVEL";
pub const ENV_Z_SCORE: &str = "MEDSUPPLY_Z_SCORE";
pub const ENV_RISK_THRESHOLD: &str = "MEDSUPPLY_RISK_THRESHOLD";
pub const ENV_DEFAULT_BASELINE_DEMAND: &str = "MEDSUPPLY_DEFAULT_BASELINE_DEMAND";
pub const ENV_TURNOVER_WINDOW_DAYS: &str = "MEDSUPPLY_TURNOVER_WINDOW_DAYS";

const DEFAULT_TURNOVER_WINDOW_DAYS: u32 = 365;
const MAX_LEAD_TIME_DAYS: u32 = 365;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: cannot parse {value:?}: {reason}")]
    Parse {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{key}: {value} is out of range (expected {expected})")]
    OutOfRange {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    pub policy: InventoryPolicy,
    /// Risk score above which an item is listed as high risk.
    pub risk_threshold: f64,
    /// Demand baseline when an item has no usable history.
    pub default_baseline_demand: f64,
    /// Length of the usage window turnover figures are annualized from.
    pub turnover_window_days: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            policy: InventoryPolicy::default(),
            risk_threshold: DEFAULT_RISK_THRESHOLD,
            default_baseline_demand: DEFAULT_BASELINE_DEMAND,
            turnover_window_days: DEFAULT_TURNOVER_WINDOW_DAYS,
        }
    }
}

impl AnalyticsConfig {
    /// Defaults overridden by `MEDSUPPLY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each known key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup(ENV_LEAD_TIME_DAYS) {
            cfg.policy.lead_time_days = parse(ENV_LEAD_TIME_DAYS, &v)?;
        }
        if let Some(v) = lookup(ENV_SERVICE_LEVEL) {
            cfg.policy.service_level = parse(ENV_SERVICE_LEVEL, &v)?;
        }
        if let Some(v) = lookup(ENV_Z_SCORE) {
            cfg.policy.z_score = parse(ENV_Z_SCORE, &v)?;
        }
        if let Some(v) = lookup(ENV_RISK_THRESHOLD) {
            cfg.risk_threshold = parse(ENV_RISK_THRESHOLD, &v)?;
        }
        if let Some(v) = lookup(ENV_DEFAULT_BASELINE_DEMAND) {
            cfg.default_baseline_demand = parse(ENV_DEFAULT_BASELINE_DEMAND, &v)?;
        }
        if let Some(v) = lookup(ENV_TURNOVER_WINDOW_DAYS) {
            cfg.turnover_window_days = parse(ENV_TURNOVER_WINDOW_DAYS, &v)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.policy;
        if p.lead_time_days > MAX_LEAD_TIME_DAYS {
            return Err(out_of_range(ENV_LEAD_TIME_DAYS, p.lead_time_days, "0..=365"));
        }
        if !(p.service_level.is_finite() && p.service_level > 0.0 && p.service_level < 1.0) {
            return Err(out_of_range(ENV_SERVICE_LEVEL, p.service_level, "0 < x < 1"));
        }
        if !(p.z_score.is_finite() && p.z_score >= 0.0) {
            return Err(out_of_range(ENV_Z_SCORE, p.z_score, "finite, >= 0"));
        }
        if !(0.0..=1.0).contains(&self.risk_threshold) {
            return Err(out_of_range(ENV_RISK_THRESHOLD, self.risk_threshold, "0..=1"));
        }
        if !(self.default_baseline_demand.is_finite() && self.default_baseline_demand >= 0.0) {
            return Err(out_of_range(
                ENV_DEFAULT_BASELINE_DEMAND,
                self.default_baseline_demand,
                "finite, >= 0",
            ));
        }
        if self.turnover_window_days == 0 {
            return Err(out_of_range(ENV_TURNOVER_WINDOW_DAYS, 0, ">= 1"));
        }
        Ok(())
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Parse {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn out_of_range(key: &'static str, value: impl ToString, expected: &'static str) -> ConfigError {
    ConfigError::OutOfRange {
        key,
        value: value.to_string(),
        expected,
    }
}
