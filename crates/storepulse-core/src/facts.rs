//! Normalization of raw facet rows into `(store, status, count)` facts.
//!
//! Two facet layouts are in circulation:
//!
//! - array form: `{"name": ["2221", ..., "Online"], "results": [{"uniqueCount": 12}]}`,
//!   where the status is the last element of `name`;
//! - keyed form: `{"name": "2221", "online": "Online", "results": {"uniqueCount": 12}}`,
//!   where the status label sits under an `online` or `offline` key.
//!
//! Anything else is skipped with a debug trace rather than rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::StoreNumber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    /// Parses a facet status label, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("online") {
            Some(DeviceStatus::Online)
        } else if label.eq_ignore_ascii_case("offline") {
            Some(DeviceStatus::Offline)
        } else {
            None
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceStatus::Online => write!(f, "Online"),
            DeviceStatus::Offline => write!(f, "Offline"),
        }
    }
}

/// One canonical aggregation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceStatusFact {
    pub store_number: StoreNumber,
    pub status: DeviceStatus,
    pub count: u64,
}

impl DeviceStatusFact {
    #[must_use]
    pub fn new(store_number: impl Into<StoreNumber>, status: DeviceStatus, count: u64) -> Self {
        Self {
            store_number: store_number.into(),
            status,
            count,
        }
    }
}

/// The store a facet row belongs to, in either layout.
///
/// Returned even when the rest of the row is unusable, so that callers can
/// still account for the store with zeroed counts.
#[must_use]
pub fn facet_store_number(facet: &Value) -> Option<StoreNumber> {
    match facet.get("name")? {
        Value::Array(parts) => parts.first().and_then(StoreNumber::from_json),
        scalar => StoreNumber::from_json(scalar),
    }
}

/// Normalizes one facet row. Returns `None` for unrecognized shapes.
#[must_use]
pub fn fact_from_facet(facet: &Value) -> Option<DeviceStatusFact> {
    let store_number = facet_store_number(facet).filter(|s| !s.is_empty())?;

    let label = match facet.get("name")? {
        Value::Array(parts) if parts.len() >= 2 => parts.last().and_then(Value::as_str),
        Value::Array(_) => None,
        _ => facet
            .get("online")
            .or_else(|| facet.get("offline"))
            .and_then(Value::as_str),
    }?;
    let status = DeviceStatus::from_label(label)?;

    let count = facet.get("results").map_or(0, results_count);

    Some(DeviceStatusFact {
        store_number,
        status,
        count,
    })
}

/// Normalizes every recognizable facet, in input order.
#[must_use]
pub fn facts_from_facets(facets: &[Value]) -> Vec<DeviceStatusFact> {
    facets
        .iter()
        .filter_map(|facet| {
            let fact = fact_from_facet(facet);
            if fact.is_none() {
                tracing::debug!(%facet, "skipping facet with unrecognized shape");
            }
            fact
        })
        .collect()
}

/// `uniqueCount` from a `results` value that is either an object or an array
/// whose first element is that object.
fn results_count(results: &Value) -> u64 {
    let entry = match results {
        Value::Array(items) => items.first(),
        other => Some(other),
    };
    entry
        .and_then(|e| e.get("uniqueCount"))
        .map_or(0, count_from_json)
}

/// Reads a non-negative integral count. Negative, fractional and
/// non-numeric values count as zero.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
pub fn count_from_json(value: &Value) -> u64 {
    if let Some(n) = value.as_u64() {
        return n;
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 => f as u64,
        _ => 0,
    }
}
