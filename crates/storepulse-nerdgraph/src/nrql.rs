//! NRQL templates.

use storepulse_core::StoreNumber;

/// Event type carrying point-of-sale device samples.
pub const DEVICE_STATUS_EVENT: &str = "StoreVHQDeviceSample";

/// Alias given to the device count so result rows can be read back by name.
pub const COUNT_ALIAS: &str = "POS";

/// Unique POS devices for one store, faceted into Online/Offline buckets.
///
/// `window` is the body of the `SINCE` clause, e.g. `1 day ago`. It is
/// validated at configuration time and inserted verbatim.
#[must_use]
pub fn device_status_query(store: &StoreNumber, window: &str) -> String {
    format!(
        "FROM {DEVICE_STATUS_EVENT} SELECT uniqueCount(serialNumber) AS '{COUNT_ALIAS}' \
         WHERE store = {store} \
         FACET store, CASES(WHERE deviceStatus = 'Active' AS 'Online', WHERE deviceStatus = 'Inactive' AS 'Offline') \
         SINCE {window} LIMIT MAX",
        store = quote_literal(store.as_str()),
    )
}

/// Single-quoted NRQL string literal.
fn quote_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('\'');
    for c in raw.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}
