//! `medsupply-analytics`
//!
//! **Responsibility:** derived supply-chain metrics for the hospital dashboard.
//!
//! This crate is the metrics engine behind the dashboard cards and charts:
//! - It takes small in-memory inputs (demand histories, item snapshots).
//! - It never performs IO and never fails; degenerate input yields defaults.
//! - It reads "now" only through the injected [`medsupply_core::Clock`].
//!
//! Every model output carries an [`AnalyticsResult`] (timestamp, confidence,
//! model label, echoed parameters) for display next to the figures.

pub mod config;
pub mod demand;
pub mod engine;
pub mod expiration;
pub mod job;
pub mod kpi;
pub mod optimization;
pub mod result;
pub mod scheduler;
pub mod stats;
pub mod turnover;

pub use config::{AnalyticsConfig, ConfigError};
pub use demand::{DemandForecast, DemandForecastJob, DemandSample};
pub use engine::SupplyChainAnalytics;
pub use expiration::{ExpirationRisk, ExpirationRiskJob, ItemSnapshot, high_risk_items};
pub use job::AnalyticsJob;
pub use kpi::{
    CostLine, CostVariance, DepartmentEfficiency, DepartmentTurnover, KpiTrend, SupplyChainKpi,
};
pub use optimization::{InventoryOptimization, InventoryOptimizationJob, InventoryPolicy};
pub use result::AnalyticsResult;
pub use scheduler::{AnalyticsScheduler, LocalAnalyticsScheduler};
pub use turnover::{PerformanceCategory, TurnoverAnalysis, TurnoverObservation, analyze_turnover};
