//! Hospital supply dataset loaded from JSON fixtures.
//!
//! The dashboard's reference tables (item master, usage log, lots on hand,
//! budgets, KPIs) are supplied as data, not compiled in. A bundled copy of the
//! demo dataset ships with the crate.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use medsupply_analytics::{
    CostLine, DemandSample, DepartmentTurnover, ItemSnapshot, SupplyChainKpi, TurnoverObservation,
};
use medsupply_core::{DomainError, ItemId};

const BUNDLED_DATASET: &str = include_str!("../fixtures/hospital_supply.json");

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed fixture: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{context} references unknown item {item_id}")]
    UnknownItem { context: &'static str, item_id: ItemId },

    #[error("duplicate item {0} in item master")]
    DuplicateItem(ItemId),

    #[error("lot {batch} of {item_id}: invalid expiry date {value:?}")]
    InvalidExpiry {
        item_id: ItemId,
        batch: String,
        value: String,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    MedicalDevice,
    Pharmaceutical,
    Surgical,
    Ppe,
    Consumable,
}

/// Item master record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalItem {
    pub id: ItemId,
    pub name: String,
    pub category: ItemCategory,
    pub department: String,
    pub unit_cost: f64,
    pub critical_level: u32,
    pub max_stock: u32,
    pub lead_time_days: u32,
    pub supplier_id: String,
    /// National Drug Code, pharmaceuticals only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndc_code: Option<String>,
}

/// One day of usage for one item, with the census drivers recorded alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandPattern {
    pub item_id: ItemId,
    pub date: NaiveDate,
    pub daily_usage: f64,
    pub day_of_week: u8,
    pub month: u8,
    pub is_holiday: bool,
    pub patient_census: u32,
    pub surgical_cases: u32,
    pub emergency_admissions: u32,
}

/// A batch on the shelf.
///
/// `expiry_date` accepts either a calendar date (midnight UTC) or a full
/// RFC 3339 instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryLot {
    pub item_id: ItemId,
    pub batch_number: String,
    pub quantity: f64,
    pub monthly_usage: f64,
    pub expiry_date: String,
}

impl InventoryLot {
    pub fn snapshot(&self) -> Result<ItemSnapshot, FixtureError> {
        let expiry_date = parse_expiry(&self.expiry_date).ok_or_else(|| FixtureError::InvalidExpiry {
            item_id: self.item_id.clone(),
            batch: self.batch_number.clone(),
            value: self.expiry_date.clone(),
        })?;
        Ok(ItemSnapshot {
            item_id: self.item_id.clone(),
            quantity: self.quantity,
            monthly_usage: self.monthly_usage,
            expiry_date,
        })
    }
}

fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub items: Vec<HospitalItem>,
    pub demand_patterns: Vec<DemandPattern>,
    pub inventory_lots: Vec<InventoryLot>,
    pub turnover: Vec<TurnoverObservation>,
    pub department_turnover: Vec<DepartmentTurnover>,
    pub cost_lines: Vec<CostLine>,
    pub kpis: Vec<SupplyChainKpi>,
}

impl Dataset {
    /// The demo dataset shipped with the crate.
    pub fn bundled() -> Result<Self, FixtureError> {
        Self::from_json(BUNDLED_DATASET)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, FixtureError> {
        let dataset: Dataset = serde_json::from_str(raw)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Every usage, lot and turnover row must point at an item in the master.
    pub fn validate(&self) -> Result<(), FixtureError> {
        let mut known = BTreeSet::new();
        for item in &self.items {
            if !known.insert(&item.id) {
                return Err(FixtureError::DuplicateItem(item.id.clone()));
            }
        }

        let check = |context: &'static str, id: &ItemId| {
            if known.contains(id) {
                Ok(())
            } else {
                Err(FixtureError::UnknownItem {
                    context,
                    item_id: id.clone(),
                })
            }
        };

        for p in &self.demand_patterns {
            check("demand pattern", &p.item_id)?;
        }
        for lot in &self.inventory_lots {
            check("inventory lot", &lot.item_id)?;
            lot.snapshot()?;
        }
        for t in &self.turnover {
            check("turnover observation", &t.item_id)?;
        }
        Ok(())
    }

    pub fn item(&self, id: &ItemId) -> Result<&HospitalItem, FixtureError> {
        self.items
            .iter()
            .find(|i| &i.id == id)
            .ok_or_else(|| DomainError::not_found(format!("item {id}")).into())
    }

    /// Usage history of one item, oldest first.
    pub fn demand_history(&self, id: &ItemId) -> Vec<DemandSample> {
        let mut samples: Vec<DemandSample> = self
            .demand_patterns
            .iter()
            .filter(|p| &p.item_id == id)
            .map(|p| DemandSample {
                period: p.date,
                demand: p.daily_usage,
            })
            .collect();
        samples.sort_by_key(|s| s.period);
        samples
    }

    /// Lots on hand as engine snapshots, in fixture order.
    pub fn snapshots(&self) -> Result<Vec<ItemSnapshot>, FixtureError> {
        self.inventory_lots.iter().map(InventoryLot::snapshot).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn id(code: &str) -> ItemId {
        ItemId::new(code).unwrap()
    }

    #[test]
    fn bundled_dataset_loads() {
        let ds = Dataset::bundled().unwrap();
        assert_eq!(ds.items.len(), 5);
        assert_eq!(ds.item(&id("ITM002")).unwrap().ndc_code.as_deref(), Some("12345-678-90"));
        assert_eq!(ds.item(&id("ITM005")).unwrap().category, ItemCategory::MedicalDevice);
    }

    #[test]
    fn demand_history_is_sorted_by_date() {
        let ds = Dataset::bundled().unwrap();
        let demands: Vec<f64> = ds.demand_history(&id("ITM001")).iter().map(|s| s.demand).collect();
        assert_eq!(demands, [10.0, 12.0, 11.0, 13.0, 9.0]);
        assert!(ds.demand_history(&id("ITM004")).is_empty());
    }

    #[test]
    fn expiry_accepts_dates_and_instants() {
        assert_eq!(
            parse_expiry("2025-12-31"),
            Some(Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_expiry("2024-09-02T10:30:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 9, 2, 8, 30, 0).unwrap())
        );
        assert_eq!(parse_expiry("31/12/2025"), None);
    }

    #[test]
    fn unknown_item_reference_is_rejected() {
        let raw = r#"{
            "items": [],
            "inventory_lots": [
                { "item_id": "ITM404", "batch_number": "B1", "quantity": 1, "monthly_usage": 1, "expiry_date": "2025-01-01" }
            ]
        }"#;
        let err = Dataset::from_json(raw).unwrap_err();
        assert!(matches!(err, FixtureError::UnknownItem { context: "inventory lot", .. }));
    }

    #[test]
    fn bad_expiry_is_rejected_with_batch() {
        let raw = r#"{
            "items": [{ "id": "ITM001", "name": "Masks", "category": "ppe", "department": "ICU",
                        "unit_cost": 1.0, "critical_level": 1, "max_stock": 2, "lead_time_days": 1,
                        "supplier_id": "SUP001" }],
            "inventory_lots": [
                { "item_id": "ITM001", "batch_number": "B7", "quantity": 1, "monthly_usage": 1, "expiry_date": "soon" }
            ]
        }"#;
        match Dataset::from_json(raw).unwrap_err() {
            FixtureError::InvalidExpiry { batch, value, .. } => {
                assert_eq!(batch, "B7");
                assert_eq!(value, "soon");
            }
            other => panic!("expected invalid expiry, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_items_are_rejected() {
        let item = r#"{ "id": "ITM001", "name": "Masks", "category": "ppe", "department": "ICU",
                        "unit_cost": 1.0, "critical_level": 1, "max_stock": 2, "lead_time_days": 1,
                        "supplier_id": "SUP001" }"#;
        let raw = format!(r#"{{ "items": [{item}, {item}] }}"#);
        assert!(matches!(Dataset::from_json(&raw), Err(FixtureError::DuplicateItem(_))));
    }

    #[test]
    fn invalid_item_id_is_a_json_error() {
        let raw = r#"{ "demand_patterns": [{ "item_id": "", "date": "2024-08-13", "daily_usage": 1,
            "day_of_week": 2, "month": 8, "is_holiday": false, "patient_census": 1,
            "surgical_cases": 0, "emergency_admissions": 0 }] }"#;
        assert!(matches!(Dataset::from_json(raw), Err(FixtureError::Json(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Dataset::load("/nonexistent/medsupply.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/medsupply.json"));
    }
}
