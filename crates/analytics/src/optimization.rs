use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medsupply_core::{ItemId, ValueObject};

use crate::job::AnalyticsJob;
use crate::result::AnalyticsResult;
use crate::stats::{mean, round_count, stddev_population};

pub const MODEL: &str = "EOQ_Model";
pub const CONFIDENCE: f64 = 0.92;

/// Days of average demand the placeholder `current_stock` estimate assumes.
const CURRENT_STOCK_DAYS: f64 = 2.0;

/// Replenishment policy constants.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryPolicy {
    pub lead_time_days: u32,
    /// Target probability of not stocking out during lead time.
    pub service_level: f64,
    /// Standard-normal quantile matching `service_level`.
    pub z_score: f64,
}

impl Default for InventoryPolicy {
    fn default() -> Self {
        Self {
            lead_time_days: 3,
            service_level: 0.95,
            z_score: 1.65,
        }
    }
}

/// Reorder parameters for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryOptimization {
    pub item_id: ItemId,
    /// Placeholder estimate (two periods of mean demand), not a stock read.
    pub current_stock: i64,
    pub optimal_stock: i64,
    pub reorder_point: i64,
    pub safety_stock: i64,
    pub lead_time_days: u32,
    #[serde(flatten)]
    pub result: AnalyticsResult,
}

impl ValueObject for InventoryOptimization {}

/// Safety-stock / reorder-point computation over a demand history.
///
/// Model:
/// - mean and population stddev of per-day demand
/// - cycle stock = mean * lead_time
/// - safety stock = z * stddev * sqrt(lead_time)
/// - optimal stock = cycle stock + safety stock (rounded once, on the sum)
#[derive(Debug, Clone)]
pub struct InventoryOptimizationJob {
    item_id: ItemId,
    demand_history: Vec<f64>,
    policy: InventoryPolicy,
}

impl InventoryOptimizationJob {
    pub fn new(item_id: ItemId, demand_history: Vec<f64>) -> Self {
        Self {
            item_id,
            demand_history,
            policy: InventoryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: InventoryPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl AnalyticsJob for InventoryOptimizationJob {
    type Output = InventoryOptimization;

    fn model(&self) -> &'static str {
        MODEL
    }

    fn input_len(&self) -> usize {
        self.demand_history.len()
    }

    fn run(&self, now: DateTime<Utc>) -> InventoryOptimization {
        let avg = mean(&self.demand_history);
        let std = stddev_population(&self.demand_history, avg);

        let lead_time = f64::from(self.policy.lead_time_days);
        let cycle_stock = avg * lead_time;
        let safety_stock = self.policy.z_score * std * lead_time.sqrt();

        InventoryOptimization {
            item_id: self.item_id.clone(),
            current_stock: round_count(avg * CURRENT_STOCK_DAYS),
            optimal_stock: round_count(cycle_stock + safety_stock),
            reorder_point: round_count(cycle_stock),
            safety_stock: round_count(safety_stock),
            lead_time_days: self.policy.lead_time_days,
            result: AnalyticsResult::new(MODEL, CONFIDENCE, now)
                .with_parameter("service_level", self.policy.service_level)
                .with_parameter("lead_time", self.policy.lead_time_days)
                .with_parameter("demand_std", std),
        }
    }
}
