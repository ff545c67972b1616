//! Plain-text rendering for terminal output.

use storepulse_core::{StoreRecord, StoreTypesFile};
use storepulse_view::{DetailStatus, SelectedStore};

pub(crate) fn store_line(store: &StoreRecord, types: &StoreTypesFile) -> String {
    let tier = store
        .health_tier
        .map_or_else(|| "-".to_string(), |t| t.to_string());
    let uptime = store.uptime_percentage.unwrap_or(0.0);
    let type_desc = if store.type_desc.is_empty() {
        types.describe(&store.type_code).unwrap_or("")
    } else {
        store.type_desc.as_str()
    };
    let mut line = format!(
        "{:>6}  {:<8} {:>6.2}%  {:<3} {}",
        store.store_number, tier, uptime, store.type_code, store.name
    );
    if !type_desc.is_empty() {
        line.push_str(&format!(" [{type_desc}]"));
    }
    let address = store.address_line();
    if !address.is_empty() {
        line.push_str(&format!(" ({address})"));
    }
    line
}

pub(crate) fn selection(selected: &SelectedStore) -> String {
    let store = &selected.store;
    let mut lines = vec![format!("Store #{}  {}", store.store_number, store.name)];
    if !store.type_desc.is_empty() {
        lines.push(format!("Type: {}", store.type_desc));
    }
    if let Some(score) = store.health_score {
        lines.push(format!("Health score: {score}"));
    }
    if let Some(footfall) = store.customer_footfall {
        lines.push(format!("Customer footfall: {footfall}"));
    }
    if let (Some(uptime), Some(tier)) = (store.uptime_percentage, store.health_tier) {
        lines.push(format!("POS availability: {uptime:.2}% ({tier})"));
    }

    match &selected.details {
        DetailStatus::Loading => lines.push("Details: loading".to_string()),
        DetailStatus::Missing => {
            lines.push("Details: no performance data available for this store".to_string());
        }
        DetailStatus::Failed(reason) => lines.push(format!("Details: lookup failed ({reason})")),
        DetailStatus::Loaded(detail) => {
            lines.push(format!(
                "Devices online: {} / offline: {} ({:.2}% online)",
                detail.online, detail.offline, detail.online_percentage
            ));
            let response = detail
                .response_time_ms
                .map_or_else(|| "N/A".to_string(), |ms| format!("{ms} ms"));
            let incidents = detail
                .incident_count
                .map_or_else(|| "N/A".to_string(), |n| n.to_string());
            lines.push(format!("Response time: {response}  Incidents: {incidents}"));
        }
    }
    lines.join("\n")
}
