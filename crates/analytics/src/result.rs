use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Descriptive metadata attached to every model output.
///
/// Presentation layers read these fields for display only; nothing downstream
/// branches on them. Serialized flattened into the owning record, so a
/// forecast reads as `{ "item_id": ..., "confidence": 0.87, "model": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    /// Instant the result was computed at (the scheduler's clock reading).
    pub timestamp: DateTime<Utc>,

    /// Confidence in \[0, 1\]. Fixed per model.
    pub confidence: f64,

    /// Model label shown next to the figures.
    pub model: String,

    /// Named parameters echoed back for display.
    #[serde(default)]
    pub parameters: Map<String, JsonValue>,
}

impl AnalyticsResult {
    pub fn new(model: impl Into<String>, confidence: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            confidence,
            model: model.into(),
            parameters: Map::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn parameter(&self, key: &str) -> Option<&JsonValue> {
        self.parameters.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn parameters_are_echoed_by_name() {
        let t = Utc.with_ymd_and_hms(2024, 8, 13, 0, 0, 0).unwrap();
        let r = AnalyticsResult::new("EOQ_Model", 0.92, t)
            .with_parameter("service_level", 0.95)
            .with_parameter("lead_time", 3);

        assert_eq!(r.parameter("service_level"), Some(&json!(0.95)));
        assert_eq!(r.parameter("lead_time"), Some(&json!(3)));
        assert_eq!(r.parameter("missing"), None);
    }

    #[test]
    fn timestamp_serializes_as_rfc3339() {
        let t = Utc.with_ymd_and_hms(2024, 8, 13, 8, 30, 0).unwrap();
        let r = AnalyticsResult::new("ExpirationRiskModel", 0.95, t);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["timestamp"], json!("2024-08-13T08:30:00Z"));
        assert_eq!(v["model"], json!("ExpirationRiskModel"));
        assert_eq!(v["parameters"], json!({}));
    }
}
