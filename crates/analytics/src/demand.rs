use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use medsupply_core::{ItemId, ValueObject};

use crate::job::AnalyticsJob;
use crate::result::AnalyticsResult;
use crate::stats::round_count;

pub const MODEL: &str = "RandomForestRegressor";
pub const CONFIDENCE: f64 = 0.87;

/// Baseline used when there is no usable history.
pub const DEFAULT_BASELINE_DEMAND: f64 = 100.0;
/// Fixed growth multiplier (5% per period).
pub const TREND_FACTOR: f64 = 1.05;
pub const VOLATILITY: f64 = 0.15;

const SEASONAL_AMPLITUDE: f64 = 0.2;
const SEASONAL_TIME_BASE_MILLIS: f64 = 1000.0 * 60.0 * 60.0 * 24.0 * 30.0;

// Echoed for display; the estimator does not train anything.
const N_ESTIMATORS: u32 = 100;
const MAX_DEPTH: u32 = 10;
const RANDOM_STATE: u32 = 42;

/// Observed usage for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandSample {
    pub period: NaiveDate,
    pub demand: f64,
}

impl ValueObject for DemandSample {}

/// Next-period demand estimate for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandForecast {
    pub item_id: ItemId,
    pub predicted_demand: i64,
    pub seasonal_factor: f64,
    pub trend_factor: f64,
    pub volatility: f64,
    #[serde(flatten)]
    pub result: AnalyticsResult,
}

impl ValueObject for DemandForecast {}

/// Seasonal multiplier at `now`: a sinusoid on a 30-day time base, in \[0.8, 1.2\].
pub fn seasonal_factor(now: DateTime<Utc>) -> f64 {
    let phase = now.timestamp_millis() as f64 / SEASONAL_TIME_BASE_MILLIS;
    phase.sin() * SEASONAL_AMPLITUDE + 1.0
}

/// Demand estimation for the next period.
///
/// Model:
/// - Baseline is the most recent observed demand (or a fixed default).
/// - Multiply by the seasonal factor at "now" and a fixed trend factor.
#[derive(Debug, Clone)]
pub struct DemandForecastJob {
    item_id: ItemId,
    history: Vec<DemandSample>,
    default_baseline: f64,
}

impl DemandForecastJob {
    pub fn new(item_id: ItemId, history: Vec<DemandSample>) -> Self {
        Self {
            item_id,
            history,
            default_baseline: DEFAULT_BASELINE_DEMAND,
        }
    }

    pub fn with_default_baseline(mut self, default_baseline: f64) -> Self {
        self.default_baseline = default_baseline;
        self
    }

    /// Last observed demand, or the default when the history is empty or the
    /// last reading is not a finite number.
    fn baseline(&self) -> f64 {
        match self.history.last() {
            Some(sample) if sample.demand.is_finite() => sample.demand,
            _ => self.default_baseline,
        }
    }
}

impl AnalyticsJob for DemandForecastJob {
    type Output = DemandForecast;

    fn model(&self) -> &'static str {
        MODEL
    }

    fn input_len(&self) -> usize {
        self.history.len()
    }

    fn run(&self, now: DateTime<Utc>) -> DemandForecast {
        let seasonal = seasonal_factor(now);
        let predicted = round_count(self.baseline() * seasonal * TREND_FACTOR);

        DemandForecast {
            item_id: self.item_id.clone(),
            predicted_demand: predicted,
            seasonal_factor: seasonal,
            trend_factor: TREND_FACTOR,
            volatility: VOLATILITY,
            result: AnalyticsResult::new(MODEL, CONFIDENCE, now)
                .with_parameter("n_estimators", N_ESTIMATORS)
                .with_parameter("max_depth", MAX_DEPTH)
                .with_parameter("random_state", RANDOM_STATE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use serde_json::json;

    fn item() -> ItemId {
        ItemId::new("ITM001").unwrap()
    }

    fn sample(day: u32, demand: f64) -> DemandSample {
        DemandSample {
            period: NaiveDate::from_ymd_opt(2024, 8, day).unwrap(),
            demand,
        }
    }

    fn epoch() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(0).unwrap()
    }

    #[test]
    fn empty_history_uses_default_baseline() {
        // sin(0) = 0, so the seasonal factor is exactly 1 at the epoch.
        let f = DemandForecastJob::new(item(), vec![]).run(epoch());
        assert_eq!(f.seasonal_factor, 1.0);
        assert_eq!(f.predicted_demand, 105);
    }

    #[test]
    fn baseline_is_last_observation() {
        let history = vec![sample(1, 10.0), sample(2, 500.0), sample(3, 200.0)];
        let f = DemandForecastJob::new(item(), history).run(epoch());
        assert_eq!(f.predicted_demand, 210);
    }

    #[test]
    fn non_finite_last_reading_falls_back_to_default() {
        let history = vec![sample(1, 40.0), sample(2, f64::NAN)];
        let f = DemandForecastJob::new(item(), history)
            .with_default_baseline(20.0)
            .run(epoch());
        assert_eq!(f.predicted_demand, 21);
    }

    #[test]
    fn seasonal_peak_applies_upper_bound() {
        // Quarter period of the 30-day time base: sin = 1.
        let quarter = (SEASONAL_TIME_BASE_MILLIS * core::f64::consts::FRAC_PI_2).round() as i64;
        let now = Utc.timestamp_millis_opt(quarter).unwrap();
        let f = DemandForecastJob::new(item(), vec![sample(1, 100.0)]).run(now);
        assert!((f.seasonal_factor - 1.2).abs() < 1e-9);
        assert_eq!(f.predicted_demand, 126);
    }

    #[test]
    fn metadata_is_fixed() {
        let now = Utc.with_ymd_and_hms(2024, 8, 13, 0, 0, 0).unwrap();
        let f = DemandForecastJob::new(item(), vec![]).run(now);
        assert_eq!(f.trend_factor, 1.05);
        assert_eq!(f.volatility, 0.15);
        assert_eq!(f.result.confidence, 0.87);
        assert_eq!(f.result.model, "RandomForestRegressor");
        assert_eq!(f.result.timestamp, now);
        assert_eq!(f.result.parameter("n_estimators"), Some(&json!(100)));
        assert_eq!(f.result.parameter("max_depth"), Some(&json!(10)));
        assert_eq!(f.result.parameter("random_state"), Some(&json!(42)));
    }

    #[test]
    fn serializes_flat() {
        let f = DemandForecastJob::new(item(), vec![]).run(epoch());
        let v = serde_json::to_value(&f).unwrap();
        assert_eq!(v["item_id"], json!("ITM001"));
        assert_eq!(v["predicted_demand"], json!(105));
        assert_eq!(v["confidence"], json!(0.87));
        assert_eq!(v["model"], json!("RandomForestRegressor"));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: the seasonal factor stays within \[0.8, 1.2\] at any instant.
        #[test]
        fn seasonal_factor_is_bounded(millis in -4_000_000_000_000i64..4_000_000_000_000i64) {
            let now = Utc.timestamp_millis_opt(millis).unwrap();
            let s = seasonal_factor(now);
            prop_assert!((0.8..=1.2).contains(&s));
        }

        /// Property: same input + same instant = same forecast.
        #[test]
        fn forecast_is_deterministic_under_frozen_clock(
            demands in prop::collection::vec(0.0f64..10_000.0, 0..30),
            millis in 0i64..4_000_000_000_000i64,
        ) {
            let now = Utc.timestamp_millis_opt(millis).unwrap();
            let history: Vec<DemandSample> = demands
                .iter()
                .map(|d| sample(1, *d))
                .collect();
            let job = DemandForecastJob::new(item(), history);
            prop_assert_eq!(job.run(now), job.run(now));
        }
    }
}
