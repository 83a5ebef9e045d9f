//! `medsupply-dashboard`
//!
//! Feeds the hospital supply dataset through the analytics engine and shapes
//! the results into the report the dashboard renders.

pub mod fixtures;
pub mod report;

pub use fixtures::{Dataset, FixtureError, HospitalItem, InventoryLot, ItemCategory};
pub use report::{DashboardReport, KpiSummary, build_report};
