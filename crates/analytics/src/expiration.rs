use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medsupply_core::{ItemId, ValueObject};

use crate::job::AnalyticsJob;
use crate::result::AnalyticsResult;

pub const MODEL: &str = "ExpirationRiskModel";
pub const CONFIDENCE: f64 = 0.95;
/// Score above which an item is flagged as high risk.
pub const DEFAULT_RISK_THRESHOLD: f64 = 0.7;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
const DAYS_PER_MONTH: f64 = 30.0;

/// Stock of one item on hand, with its usage rate and expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub item_id: ItemId,
    pub quantity: f64,
    pub monthly_usage: f64,
    pub expiry_date: DateTime<Utc>,
}

impl ValueObject for ItemSnapshot {}

/// Expiration-driven waste risk for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationRisk {
    pub item_id: ItemId,
    pub expiry_date: DateTime<Utc>,
    /// Whole days until expiry, floored; negative once expired.
    pub days_to_expiry: i64,
    /// Units consumed per day.
    pub usage_velocity: f64,
    /// Normalized risk in \[0, 1\].
    pub risk_score: f64,
    #[serde(flatten)]
    pub result: AnalyticsResult,
}

impl ValueObject for ExpirationRisk {}

/// Whole days from `now` to `expiry`, rounded toward negative infinity.
pub fn days_to_expiry(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expiry - now).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

pub fn usage_velocity(monthly_usage: f64) -> f64 {
    monthly_usage / DAYS_PER_MONTH
}

/// Share of the stock expected to still be on the shelf at expiry.
///
/// - expired (`days <= 0`): `1`
/// - nothing on hand: `0`
/// - stock on hand but no consumption: `1`
/// - otherwise `1 - days / days_of_supply`, clamped to \[0, 1\]
pub fn risk_score(days_to_expiry: i64, quantity: f64, usage_velocity: f64) -> f64 {
    if days_to_expiry <= 0 {
        return 1.0;
    }
    if quantity.is_nan() || quantity <= 0.0 {
        return 0.0;
    }
    if usage_velocity.is_nan() || usage_velocity <= 0.0 {
        return 1.0;
    }

    let days_of_supply = quantity / usage_velocity;
    let score = 1.0 - (days_to_expiry as f64) / days_of_supply;
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

/// Keep records strictly above `threshold`, in input order.
pub fn high_risk_items(risks: &[ExpirationRisk], threshold: f64) -> Vec<&ExpirationRisk> {
    risks.iter().filter(|r| r.risk_score > threshold).collect()
}

/// Batch expiration-risk scoring: one record per snapshot, in input order.
#[derive(Debug, Clone)]
pub struct ExpirationRiskJob {
    items: Vec<ItemSnapshot>,
    risk_threshold: f64,
}

impl ExpirationRiskJob {
    pub fn new(items: Vec<ItemSnapshot>) -> Self {
        Self {
            items,
            risk_threshold: DEFAULT_RISK_THRESHOLD,
        }
    }

    pub fn with_risk_threshold(mut self, risk_threshold: f64) -> Self {
        self.risk_threshold = risk_threshold;
        self
    }

    fn score(&self, item: &ItemSnapshot, now: DateTime<Utc>) -> ExpirationRisk {
        let days = days_to_expiry(item.expiry_date, now);
        let velocity = usage_velocity(item.monthly_usage);

        ExpirationRisk {
            item_id: item.item_id.clone(),
            expiry_date: item.expiry_date,
            days_to_expiry: days,
            usage_velocity: velocity,
            risk_score: risk_score(days, item.quantity, velocity),
            result: AnalyticsResult::new(MODEL, CONFIDENCE, now)
                .with_parameter("usage_threshold", velocity)
                .with_parameter("risk_threshold", self.risk_threshold),
        }
    }
}

impl AnalyticsJob for ExpirationRiskJob {
    type Output = Vec<ExpirationRisk>;

    fn model(&self) -> &'static str {
        MODEL
    }

    fn input_len(&self) -> usize {
        self.items.len()
    }

    fn run(&self, now: DateTime<Utc>) -> Vec<ExpirationRisk> {
        self.items.iter().map(|item| self.score(item, now)).collect()
    }
}
