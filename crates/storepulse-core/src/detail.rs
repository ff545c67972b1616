use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::aggregate::UptimeCounts;
use crate::facts::count_from_json;
use crate::store::StoreNumber;

/// Extended performance payload for one store.
///
/// Both detail strategies produce this shape, so consumers never need to
/// know where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRecord {
    pub store_number: StoreNumber,
    pub online: u64,
    pub offline: u64,
    pub online_percentage: f64,
    pub response_time_ms: Option<f64>,
    pub incident_count: Option<u64>,
}

impl DetailRecord {
    #[must_use]
    pub fn from_counts(store_number: StoreNumber, counts: UptimeCounts) -> Self {
        Self {
            store_number,
            online: counts.online,
            offline: counts.offline,
            online_percentage: counts.percentage(),
            response_time_ms: None,
            incident_count: None,
        }
    }

    #[must_use]
    pub fn with_stats(mut self, stats: &PerformanceStats) -> Self {
        self.response_time_ms = stats.response_time.or(self.response_time_ms);
        self.incident_count = stats.incident_count.or(self.incident_count);
        self
    }
}

/// Optional `performanceStats` block on static facets.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
    #[serde(default)]
    pub response_time: Option<f64>,
    #[serde(default)]
    pub incident_count: Option<u64>,
}

impl PerformanceStats {
    /// Reads `performanceStats` from a facet row, tolerating junk values.
    #[must_use]
    pub fn from_facet(facet: &Value) -> Option<Self> {
        let block = facet.get("performanceStats")?.as_object()?;
        let response_time = block
            .get("responseTime")
            .and_then(Value::as_f64)
            .filter(|t| t.is_finite() && *t >= 0.0);
        let incident_count = block.get("incidentCount").map(count_from_json);
        Some(Self {
            response_time,
            incident_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn from_counts_uses_uptime_formula() {
        let record = DetailRecord::from_counts(
            StoreNumber::new("1"),
            UptimeCounts {
                online: 3,
                offline: 1,
            },
        );
        assert!((record.online_percentage - 75.0).abs() < f64::EPSILON);
        assert!(record.response_time_ms.is_none());
    }

    #[test]
    fn performance_stats_from_facet() {
        let facet = json!({"name": "1", "performanceStats": {"responseTime": 120.5, "incidentCount": 2}});
        let stats = PerformanceStats::from_facet(&facet).unwrap();
        assert_eq!(stats.response_time, Some(120.5));
        assert_eq!(stats.incident_count, Some(2));
    }

    #[test]
    fn performance_stats_ignores_bad_values() {
        let facet = json!({"performanceStats": {"responseTime": "fast", "incidentCount": -1}});
        let stats = PerformanceStats::from_facet(&facet).unwrap();
        assert!(stats.response_time.is_none());
        assert_eq!(stats.incident_count, Some(0));
        assert!(PerformanceStats::from_facet(&json!({"name": "1"})).is_none());
    }
}
