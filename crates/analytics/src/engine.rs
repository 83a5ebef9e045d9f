use chrono::{DateTime, Utc};

use medsupply_core::{Clock, ItemId, SharedClock};

use crate::config::AnalyticsConfig;
use crate::demand::{DemandForecast, DemandForecastJob, DemandSample};
use crate::expiration::{ExpirationRisk, ExpirationRiskJob, ItemSnapshot, high_risk_items};
use crate::optimization::{InventoryOptimization, InventoryOptimizationJob};
use crate::scheduler::{AnalyticsScheduler, LocalAnalyticsScheduler};
use crate::turnover::{TurnoverAnalysis, TurnoverObservation, analyze_turnover};

/// Entry point used by dashboards: builds jobs from configuration and runs
/// them on a local scheduler.
///
/// Holds no mutable state; one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct SupplyChainAnalytics {
    scheduler: LocalAnalyticsScheduler,
    config: AnalyticsConfig,
}

impl SupplyChainAnalytics {
    pub fn new(config: AnalyticsConfig, clock: SharedClock) -> Self {
        Self {
            scheduler: LocalAnalyticsScheduler::new(clock),
            config,
        }
    }

    /// Default configuration on the system clock.
    pub fn system() -> Self {
        Self {
            scheduler: LocalAnalyticsScheduler::system(),
            config: AnalyticsConfig::default(),
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Current instant on the engine's clock.
    pub fn now(&self) -> DateTime<Utc> {
        Clock::now(self.scheduler.clock())
    }

    pub fn predict_demand(&self, history: &[DemandSample], item_id: &ItemId) -> DemandForecast {
        let job = DemandForecastJob::new(item_id.clone(), history.to_vec())
            .with_default_baseline(self.config.default_baseline_demand);
        self.scheduler.run(job)
    }

    pub fn optimize_inventory(&self, item_id: &ItemId, demand_history: &[f64]) -> InventoryOptimization {
        let job = InventoryOptimizationJob::new(item_id.clone(), demand_history.to_vec())
            .with_policy(self.config.policy);
        self.scheduler.run(job)
    }

    pub fn calculate_expiration_risk(&self, items: &[ItemSnapshot]) -> Vec<ExpirationRisk> {
        let job = ExpirationRiskJob::new(items.to_vec()).with_risk_threshold(self.config.risk_threshold);
        self.scheduler.run(job)
    }

    /// Records above the configured risk threshold.
    pub fn high_risk_items<'a>(&self, risks: &'a [ExpirationRisk]) -> Vec<&'a ExpirationRisk> {
        high_risk_items(risks, self.config.risk_threshold)
    }

    pub fn analyze_turnover(&self, observations: &[TurnoverObservation]) -> Vec<TurnoverAnalysis> {
        analyze_turnover(observations, self.config.turnover_window_days)
    }
}
