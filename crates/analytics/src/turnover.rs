use serde::{Deserialize, Serialize};

use medsupply_core::{ItemId, ValueObject};

use crate::stats::{mean, sum};

const DAYS_PER_YEAR: f64 = 365.0;
const QUARTILES: usize = 4;

/// Stock and usage observations for one item in one department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoverObservation {
    pub item_id: ItemId,
    pub department: String,
    pub stock_levels: Vec<f64>,
    pub usage_quantities: Vec<f64>,
}

impl ValueObject for TurnoverObservation {}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceCategory {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
}

impl PerformanceCategory {
    pub fn from_quartile(quartile: u8) -> Self {
        match quartile {
            1 => Self::Excellent,
            2 => Self::Good,
            3 => Self::Average,
            _ => Self::NeedsImprovement,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl core::fmt::Display for PerformanceCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoverAnalysis {
    pub item_id: ItemId,
    pub department: String,
    pub avg_stock: f64,
    pub total_usage: f64,
    pub data_points: usize,
    /// Annualized turns: usage over the window divided by average stock.
    pub turnover_rate: f64,
    /// 1 (fastest) ..= 4 (slowest).
    pub performance_quartile: u8,
    pub performance_category: PerformanceCategory,
}

impl ValueObject for TurnoverAnalysis {}

/// Annualized turnover for usage observed over `window_days`.
///
/// Zero average stock or a zero-length window yields `0`.
pub fn turnover_rate(total_usage: f64, avg_stock: f64, window_days: u32) -> f64 {
    if avg_stock <= 0.0 || window_days == 0 {
        return 0.0;
    }
    (total_usage / avg_stock) * (DAYS_PER_YEAR / f64::from(window_days))
}

/// Rank observations by turnover (descending) and split them into quartiles.
///
/// Quartile buckets follow NTILE: with `n` rows, the first `n % 4` buckets hold
/// one row more than the rest. Ties keep item-id order so rankings are stable.
pub fn analyze_turnover(observations: &[TurnoverObservation], window_days: u32) -> Vec<TurnoverAnalysis> {
    let mut rows: Vec<(TurnoverObservation, f64, f64, f64)> = observations
        .iter()
        .map(|o| {
            let avg_stock = mean(&o.stock_levels);
            let total_usage = sum(&o.usage_quantities);
            let rate = turnover_rate(total_usage, avg_stock, window_days);
            (o.clone(), avg_stock, total_usage, rate)
        })
        .collect();

    rows.sort_by(|a, b| {
        b.3.total_cmp(&a.3)
            .then_with(|| a.0.item_id.cmp(&b.0.item_id))
            .then_with(|| a.0.department.cmp(&b.0.department))
    });

    let quartiles = ntile(rows.len(), QUARTILES);

    rows.into_iter()
        .zip(quartiles)
        .map(|((o, avg_stock, total_usage, rate), quartile)| TurnoverAnalysis {
            data_points: o.stock_levels.len(),
            item_id: o.item_id,
            department: o.department,
            avg_stock,
            total_usage,
            turnover_rate: rate,
            performance_quartile: quartile,
            performance_category: PerformanceCategory::from_quartile(quartile),
        })
        .collect()
}

/// Bucket numbers (1-based) for `n` ordered rows split into `buckets` groups.
fn ntile(n: usize, buckets: usize) -> Vec<u8> {
    let base = n / buckets;
    let extra = n % buckets;
    let mut out = Vec::with_capacity(n);
    for bucket in 0..buckets {
        let size = base + usize::from(bucket < extra);
        out.extend(std::iter::repeat_n((bucket + 1) as u8, size));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(id: &str, dept: &str, stock: &[f64], usage: &[f64]) -> TurnoverObservation {
        TurnoverObservation {
            item_id: ItemId::new(id).unwrap(),
            department: dept.to_string(),
            stock_levels: stock.to_vec(),
            usage_quantities: usage.to_vec(),
        }
    }

    #[test]
    fn ntile_distributes_remainder_to_leading_buckets() {
        assert_eq!(ntile(0, 4), Vec::<u8>::new());
        assert_eq!(ntile(2, 4), vec![1, 2]);
        assert_eq!(ntile(4, 4), vec![1, 2, 3, 4]);
        assert_eq!(ntile(6, 4), vec![1, 1, 2, 2, 3, 4]);
        assert_eq!(ntile(9, 4), vec![1, 1, 1, 2, 2, 3, 3, 4, 4]);
    }

    #[test]
    fn turnover_is_annualized_over_window() {
        assert_eq!(turnover_rate(1200.0, 100.0, 365), 12.0);
        assert_eq!(turnover_rate(100.0, 100.0, 73), 5.0);
        assert_eq!(turnover_rate(100.0, 0.0, 365), 0.0);
        assert_eq!(turnover_rate(100.0, 10.0, 0), 0.0);
    }

    #[test]
    fn ranks_fastest_movers_first() {
        let observations = vec![
            obs("SLOW", "Radiology", &[100.0, 100.0], &[50.0, 50.0]),
            obs("FAST", "ICU", &[10.0, 30.0], &[400.0, 400.0]),
            obs("MID", "Surgery", &[50.0], &[300.0]),
            obs("IDLE", "Storage", &[], &[10.0]),
        ];
        let out = analyze_turnover(&observations, 365);

        let order: Vec<&str> = out.iter().map(|a| a.item_id.as_str()).collect();
        assert_eq!(order, ["FAST", "MID", "SLOW", "IDLE"]);

        assert_eq!(out[0].avg_stock, 20.0);
        assert_eq!(out[0].total_usage, 800.0);
        assert_eq!(out[0].data_points, 2);
        assert_eq!(out[0].turnover_rate, 40.0);
        assert_eq!(out[0].performance_category, PerformanceCategory::Excellent);

        assert_eq!(out[3].data_points, 0);
        assert_eq!(out[3].turnover_rate, 0.0);
        assert_eq!(out[3].performance_quartile, 4);
        assert_eq!(out[3].performance_category.to_string(), "Needs Improvement");
    }

    #[test]
    fn ties_are_ordered_by_item_id() {
        let observations = vec![
            obs("B", "ICU", &[10.0], &[10.0]),
            obs("A", "ICU", &[10.0], &[10.0]),
        ];
        let out = analyze_turnover(&observations, 365);
        assert_eq!(out[0].item_id.as_str(), "A");
        assert_eq!(out[1].item_id.as_str(), "B");
    }

    #[test]
    fn empty_input_yields_empty_ranking() {
        assert!(analyze_turnover(&[], 365).is_empty());
    }
}
