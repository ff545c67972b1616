//! Per-store uptime aggregation.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::classify::ThresholdPreset;
use crate::facts::{facts_from_facets, DeviceStatus, DeviceStatusFact};
use crate::store::{StoreNumber, StoreRecord};

/// Online/offline device counts for one store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UptimeCounts {
    pub online: u64,
    pub offline: u64,
}

impl UptimeCounts {
    #[must_use]
    pub fn total(self) -> u64 {
        self.online.saturating_add(self.offline)
    }

    /// `online / total * 100`, rounded half away from zero to 2 places.
    /// Zero devices yields `0.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        let online = self.online as f64;
        round_2dp(online / (online + self.offline as f64) * 100.0)
    }

    /// Records `count` for `status`, replacing any earlier value.
    pub fn set(&mut self, status: DeviceStatus, count: u64) {
        match status {
            DeviceStatus::Online => self.online = count,
            DeviceStatus::Offline => self.offline = count,
        }
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Transient `store -> counts` map built from a batch of facts.
///
/// A repeated `(store, status)` pair overwrites the earlier count instead of
/// adding to it. Deployed dashboards behave this way and the numbers they
/// show depend on it, so it is kept as-is.
#[derive(Debug, Default)]
pub struct UptimeAccumulator {
    counts: HashMap<StoreNumber, UptimeCounts>,
}

impl UptimeAccumulator {
    #[must_use]
    pub fn fold(facts: &[DeviceStatusFact]) -> Self {
        let mut acc = Self::default();
        for fact in facts {
            acc.counts
                .entry(fact.store_number.clone())
                .or_default()
                .set(fact.status, fact.count);
        }
        acc
    }

    /// Counts for `store`, or zeros when no fact mentioned it.
    #[must_use]
    pub fn counts(&self, store: &StoreNumber) -> UptimeCounts {
        self.counts.get(store).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Attach `uptime_percentage` and `health_tier` to every store.
///
/// The output has exactly one entry per input store, in input order. Stores
/// with no facts get `0.0` and whatever tier `preset` assigns to zero.
#[must_use]
pub fn aggregate(
    stores: &[StoreRecord],
    facts: &[DeviceStatusFact],
    preset: ThresholdPreset,
) -> Vec<StoreRecord> {
    let acc = UptimeAccumulator::fold(facts);
    tracing::debug!(
        stores = stores.len(),
        facts = facts.len(),
        stores_with_facts = acc.len(),
        "aggregating store uptime"
    );

    stores
        .iter()
        .map(|store| {
            let percentage = acc.counts(&store.store_number).percentage();
            StoreRecord {
                uptime_percentage: Some(percentage),
                health_tier: Some(preset.classify(percentage)),
                ..store.clone()
            }
        })
        .collect()
}

/// [`aggregate`] over raw facet rows, normalizing them first.
#[must_use]
pub fn aggregate_facets(
    stores: &[StoreRecord],
    facets: &[Value],
    preset: ThresholdPreset,
) -> Vec<StoreRecord> {
    aggregate(stores, &facts_from_facets(facets), preset)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::classify::HealthTier;

    fn stores(ids: &[&str]) -> Vec<StoreRecord> {
        ids.iter().map(|id| StoreRecord::new(*id)).collect()
    }

    #[test]
    fn scenario_eighty_percent_is_degraded_under_default_preset() {
        let facts = vec![
            DeviceStatusFact::new("100", DeviceStatus::Online, 8),
            DeviceStatusFact::new("100", DeviceStatus::Offline, 2),
        ];
        let out = aggregate(&stores(&["100", "200"]), &facts, ThresholdPreset::default());

        assert_eq!(out[0].uptime_percentage, Some(80.0));
        assert_eq!(out[0].health_tier, Some(HealthTier::Degraded));
        assert_eq!(out[1].uptime_percentage, Some(0.0));
        assert_eq!(out[1].health_tier, Some(HealthTier::Critical));
    }

    #[test]
    fn scenario_eighty_percent_is_healthy_under_exclusive_preset() {
        let facts = vec![
            DeviceStatusFact::new("100", DeviceStatus::Online, 8),
            DeviceStatusFact::new("100", DeviceStatus::Offline, 2),
        ];
        let out = aggregate(&stores(&["100"]), &facts, ThresholdPreset::Exclusive40To80);
        assert_eq!(out[0].health_tier, Some(HealthTier::Healthy));
    }

    #[test]
    fn output_covers_every_store_in_order() {
        let input = stores(&["3", "1", "2", "9"]);
        let facts = vec![
            DeviceStatusFact::new("2", DeviceStatus::Online, 1),
            DeviceStatusFact::new("77", DeviceStatus::Online, 5),
        ];
        let out = aggregate(&input, &facts, ThresholdPreset::default());
        let ids: Vec<&str> = out.iter().map(|s| s.store_number.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2", "9"]);
    }

    #[test]
    fn duplicate_status_rows_overwrite() {
        let facts = vec![
            DeviceStatusFact::new("1", DeviceStatus::Online, 10),
            DeviceStatusFact::new("1", DeviceStatus::Online, 3),
            DeviceStatusFact::new("1", DeviceStatus::Offline, 1),
        ];
        let acc = UptimeAccumulator::fold(&facts);
        assert_eq!(
            acc.counts(&StoreNumber::new("1")),
            UptimeCounts {
                online: 3,
                offline: 1
            }
        );
    }

    #[test]
    fn percentage_rounds_to_two_places() {
        let third = UptimeCounts {
            online: 1,
            offline: 2,
        };
        assert!((third.percentage() - 33.33).abs() < f64::EPSILON);
        let two_thirds = UptimeCounts {
            online: 2,
            offline: 1,
        };
        assert!((two_thirds.percentage() - 66.67).abs() < f64::EPSILON);
    }

    #[test]
    fn percentages_stay_in_range() {
        let cases = [(0, 0), (0, 5), (5, 0), (1, 999), (u64::MAX, 1), (7, 7)];
        for (online, offline) in cases {
            let pct = UptimeCounts { online, offline }.percentage();
            assert!((0.0..=100.0).contains(&pct), "{online}/{offline} -> {pct}");
        }
    }

    #[test]
    fn percentage_holds_at_extreme_counts() {
        let even = UptimeCounts {
            online: u64::MAX,
            offline: u64::MAX,
        };
        assert!((even.percentage() - 50.0).abs() < f64::EPSILON);
        assert_eq!(even.total(), u64::MAX);
    }

    #[test]
    fn mixed_id_typing_matches() {
        let facets = vec![
            json!({"name": [100, "Online"], "results": [{"uniqueCount": 9}]}),
            json!({"name": ["100", "Offline"], "results": [{"uniqueCount": 1}]}),
        ];
        let out = aggregate_facets(&stores(&["100"]), &facets, ThresholdPreset::default());
        assert_eq!(out[0].uptime_percentage, Some(90.0));
        assert_eq!(out[0].health_tier, Some(HealthTier::Healthy));
    }

    #[test]
    fn malformed_facets_leave_store_at_zero() {
        let facets = vec![json!({"name": ["100", "Rebooting"], "results": [{"uniqueCount": 9}]})];
        let out = aggregate_facets(&stores(&["100"]), &facets, ThresholdPreset::default());
        assert_eq!(out[0].uptime_percentage, Some(0.0));
        assert_eq!(out[0].health_tier, Some(HealthTier::Critical));
    }

    #[test]
    fn aggregate_preserves_descriptive_fields() {
        let mut store = StoreRecord::new("5");
        store.name = "Flagship".to_string();
        store.health_score = Some(91.0);
        let out = aggregate(&[store.clone()], &[], ThresholdPreset::default());
        assert_eq!(out[0].name, "Flagship");
        assert_eq!(out[0].health_score, Some(91.0));
        assert!(store.uptime_percentage.is_none(), "input must not be mutated");
    }
}
