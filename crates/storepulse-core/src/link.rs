//! Dashboard deep links for a store.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::store::StoreRecord;

/// Characters left alone by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Builds the dashboard URL for `store`.
///
/// Uses the store's own `dashboard_url` when it is set and non-blank,
/// otherwise `default_url`, and appends `variable=<store number>` as a query
/// parameter. Pure string formatting; nothing is fetched.
#[must_use]
pub fn dashboard_link(store: &StoreRecord, default_url: &str, variable: &str) -> String {
    let base = store
        .dashboard_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(default_url);

    if variable.trim().is_empty() {
        return base.to_string();
    }

    let separator = if base.ends_with('?') || base.ends_with('&') {
        ""
    } else if base.contains('?') {
        "&"
    } else {
        "?"
    };

    format!(
        "{base}{separator}{}={}",
        utf8_percent_encode(variable, COMPONENT),
        utf8_percent_encode(store.store_number.as_str(), COMPONENT)
    )
}
