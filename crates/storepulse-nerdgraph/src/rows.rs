//! Shaping NRQL result rows into a [`DetailRecord`].
//!
//! A faceted device-status query returns rows like
//! `{"facet": ["2221", "Online"], "store": "2221", "POS": 12}`. The status
//! is the last facet element; the count is the `POS` alias, or a
//! `uniqueCount` key when the query was run without the alias.

use serde_json::Value;
use storepulse_core::{count_from_json, DetailRecord, DeviceStatus, StoreNumber, UptimeCounts};

use crate::nrql::COUNT_ALIAS;

/// Builds the detail record for `store` from raw result rows.
///
/// Returns `None` when no row carries a recognizable status for the store.
#[must_use]
pub fn detail_from_rows(store: &StoreNumber, rows: &[Value]) -> Option<DetailRecord> {
    let mut counts = UptimeCounts::default();
    let mut matched = false;

    for row in rows {
        match row_status(store, row) {
            Some((status, count)) => {
                counts.set(status, count);
                matched = true;
            }
            None => tracing::debug!(%store, %row, "skipping unrecognized nrql row"),
        }
    }

    matched.then(|| DetailRecord::from_counts(store.clone(), counts))
}

fn row_status(store: &StoreNumber, row: &Value) -> Option<(DeviceStatus, u64)> {
    let label = match row.get("facet")? {
        Value::Array(parts) => {
            if parts.len() >= 2 {
                let row_store = parts.first().and_then(StoreNumber::from_json);
                if row_store.as_ref().is_some_and(|s| s != store) {
                    return None;
                }
            }
            parts.last()?.as_str()?
        }
        Value::String(label) => label.as_str(),
        _ => return None,
    };
    let status = DeviceStatus::from_label(label)?;
    Some((status, row_count(row)))
}

fn row_count(row: &Value) -> u64 {
    if let Some(count) = row.get(COUNT_ALIAS) {
        return count_from_json(count);
    }
    row.as_object()
        .and_then(|fields| {
            fields
                .iter()
                .find(|(key, _)| key.starts_with("uniqueCount"))
                .map(|(_, value)| count_from_json(value))
        })
        .unwrap_or(0)
}
