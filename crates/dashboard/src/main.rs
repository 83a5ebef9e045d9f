use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};

use medsupply_analytics::{AnalyticsConfig, SupplyChainAnalytics};
use medsupply_core::{FixedClock, SharedClock, SystemClock};
use medsupply_dashboard::{Dataset, build_report};

const ENV_FIXTURES: &str = "MEDSUPPLY_FIXTURES";
const ENV_NOW: &str = "MEDSUPPLY_NOW";

fn main() -> anyhow::Result<()> {
    medsupply_observability::init();

    let config = AnalyticsConfig::from_env().context("invalid analytics configuration")?;

    let clock: SharedClock = match std::env::var(ENV_NOW) {
        Ok(raw) => {
            let instant = DateTime::parse_from_rfc3339(raw.trim())
                .with_context(|| format!("{ENV_NOW} must be an RFC 3339 instant, got {raw:?}"))?
                .with_timezone(&Utc);
            tracing::info!(%instant, "clock frozen");
            Arc::new(FixedClock::new(instant))
        }
        Err(_) => Arc::new(SystemClock),
    };

    let dataset = match std::env::var(ENV_FIXTURES) {
        Ok(path) => {
            tracing::info!(%path, "loading fixtures");
            Dataset::load(&path).with_context(|| format!("loading {path}"))?
        }
        Err(_) => {
            tracing::warn!("{ENV_FIXTURES} not set; using bundled demo dataset");
            Dataset::bundled().context("bundled dataset")?
        }
    };

    let engine = SupplyChainAnalytics::new(config, clock);
    let report = build_report(&engine, &dataset)?;

    tracing::info!(
        items = report.forecasts.len(),
        lots = report.expiration_risks.len(),
        high_risk = report.high_risk_items.len(),
        "report generated"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
