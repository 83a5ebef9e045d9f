use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use medsupply_analytics::{
    CostVariance, DemandForecast, DepartmentEfficiency, ExpirationRisk, InventoryOptimization,
    KpiTrend, SupplyChainAnalytics, SupplyChainKpi, TurnoverAnalysis,
};
use medsupply_core::ItemId;

use crate::fixtures::{Dataset, FixtureError};

/// KPI card contents: the source record plus figures derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    #[serde(flatten)]
    pub kpi: SupplyChainKpi,
    pub observed_trend: KpiTrend,
    pub progress_to_target: f64,
}

/// Everything the dashboard renders, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub forecasts: Vec<DemandForecast>,
    pub optimizations: Vec<InventoryOptimization>,
    pub expiration_risks: Vec<ExpirationRisk>,
    pub high_risk_items: Vec<ItemId>,
    pub turnover: Vec<TurnoverAnalysis>,
    pub department_efficiency: Vec<DepartmentEfficiency>,
    pub cost_variance: Vec<CostVariance>,
    pub kpis: Vec<KpiSummary>,
}

impl DashboardReport {
    pub fn forecast(&self, id: &ItemId) -> Option<&DemandForecast> {
        self.forecasts.iter().find(|f| &f.item_id == id)
    }

    pub fn optimization(&self, id: &ItemId) -> Option<&InventoryOptimization> {
        self.optimizations.iter().find(|o| &o.item_id == id)
    }
}

/// Run every model over the dataset.
///
/// Forecasts and optimizations are produced per item-master entry, in master
/// order; items without usage history get the engine's defaults.
pub fn build_report(engine: &SupplyChainAnalytics, dataset: &Dataset) -> Result<DashboardReport, FixtureError> {
    let mut forecasts = Vec::with_capacity(dataset.items.len());
    let mut optimizations = Vec::with_capacity(dataset.items.len());

    for item in &dataset.items {
        let history = dataset.demand_history(&item.id);
        let demands: Vec<f64> = history.iter().map(|s| s.demand).collect();
        debug!(item = %item.id, samples = history.len(), "computing item metrics");

        forecasts.push(engine.predict_demand(&history, &item.id));
        optimizations.push(engine.optimize_inventory(&item.id, &demands));
    }

    let snapshots = dataset.snapshots()?;
    let expiration_risks = engine.calculate_expiration_risk(&snapshots);
    let high_risk_items = engine
        .high_risk_items(&expiration_risks)
        .into_iter()
        .map(|r| r.item_id.clone())
        .collect();

    let kpis = dataset
        .kpis
        .iter()
        .map(|k| KpiSummary {
            observed_trend: k.observed_trend(),
            progress_to_target: k.progress_to_target(),
            kpi: k.clone(),
        })
        .collect();

    Ok(DashboardReport {
        generated_at: engine.now(),
        forecasts,
        optimizations,
        expiration_risks,
        high_risk_items,
        turnover: engine.analyze_turnover(&dataset.turnover),
        department_efficiency: dataset.department_turnover.iter().map(|d| d.efficiency()).collect(),
        cost_variance: dataset.cost_lines.iter().map(|c| c.variance()).collect(),
        kpis,
    })
}
