//! Dashboard KPIs: trend classification, department turnover efficiency and
//! budget variance.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use medsupply_core::ValueObject;

use crate::stats::round_count;

/// Relative change below which a KPI counts as stable (1%).
pub const DEFAULT_TREND_TOLERANCE: f64 = 0.01;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiTrend {
    Increasing,
    Decreasing,
    Stable,
}

impl KpiTrend {
    /// Direction of change from `previous` to `current`.
    ///
    /// Moves within `tolerance` (relative to `|previous|`) are `Stable`.
    pub fn classify(current: f64, previous: f64, tolerance: f64) -> Self {
        let delta = current - previous;
        let band = previous.abs() * tolerance.max(0.0);
        if delta > band {
            Self::Increasing
        } else if delta < -band {
            Self::Decreasing
        } else {
            Self::Stable
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyChainKpi {
    pub metric_name: String,
    pub current_value: f64,
    pub target_value: f64,
    pub previous_period_value: f64,
    /// Trend as reported by the source system.
    pub trend: KpiTrend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub calculation_date: NaiveDate,
}

impl ValueObject for SupplyChainKpi {}

impl SupplyChainKpi {
    /// Trend recomputed from the values themselves.
    pub fn observed_trend(&self) -> KpiTrend {
        KpiTrend::classify(
            self.current_value,
            self.previous_period_value,
            DEFAULT_TREND_TOLERANCE,
        )
    }

    /// Share of last period's gap to target closed this period.
    ///
    /// `1.0` when already on target with no gap; negative when the metric
    /// moved away from target. Not clamped.
    pub fn progress_to_target(&self) -> f64 {
        let gap = self.target_value - self.previous_period_value;
        if gap == 0.0 {
            return if self.current_value == self.target_value { 1.0 } else { 0.0 };
        }
        (self.current_value - self.previous_period_value) / gap
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentTurnover {
    pub department: String,
    pub current: f64,
    pub target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentEfficiency {
    pub department: String,
    pub current: f64,
    pub target: f64,
    /// Current turnover as a whole percentage of target.
    pub efficiency: i64,
}

impl ValueObject for DepartmentEfficiency {}

impl DepartmentTurnover {
    pub fn efficiency(&self) -> DepartmentEfficiency {
        let efficiency = if self.target == 0.0 {
            0
        } else {
            round_count(self.current / self.target * 100.0)
        };
        DepartmentEfficiency {
            department: self.department.clone(),
            current: self.current,
            target: self.target,
            efficiency,
        }
    }
}

/// Budget line for one spend category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub category: String,
    pub budget: f64,
    pub actual: f64,
    pub trend: KpiTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostVariance {
    pub category: String,
    pub budget: f64,
    pub actual: f64,
    /// `actual - budget`; positive means overspend.
    pub variance: f64,
    pub variance_pct: f64,
    pub trend: KpiTrend,
}

impl ValueObject for CostVariance {}

impl CostLine {
    pub fn variance(&self) -> CostVariance {
        let variance = self.actual - self.budget;
        let variance_pct = if self.budget == 0.0 {
            0.0
        } else {
            variance / self.budget * 100.0
        };
        CostVariance {
            category: self.category.clone(),
            budget: self.budget,
            actual: self.actual,
            variance,
            variance_pct,
            trend: self.trend,
        }
    }
}
