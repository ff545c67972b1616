//! Store records and the fixture files they are loaded from.
//!
//! Store identifiers arrive as JSON strings in some sources and JSON numbers
//! in others. [`StoreNumber`] is the one canonical form; every comparison in
//! the workspace goes through it.

use std::collections::HashSet;
use std::path::Path;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classify::HealthTier;
use crate::CoreError;

/// Canonical, string-normalized store identifier.
///
/// Strings are trimmed; integral numbers render without a fractional part so
/// that `2221`, `2221.0` and `" 2221 "` all compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StoreNumber(String);

impl StoreNumber {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_owned())
    }

    /// Normalizes a JSON scalar into a store number.
    ///
    /// Returns `None` for anything other than a string or a number.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::new(s)),
            Value::Number(n) => Some(Self(number_key(n))),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for StoreNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StoreNumber {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl<'de> Deserialize<'de> for StoreNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).ok_or_else(|| {
            de::Error::custom(format!(
                "store number must be a string or a number, got {value}"
            ))
        })
    }
}

#[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
fn number_key(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        // 2^53: beyond this f64 no longer holds every integer exactly.
        Some(f) if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
            (f as i64).to_string()
        }
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub stdzd_line1_text: Option<String>,
    pub stdzd_city_name: Option<String>,
    pub orig_state_code: Option<String>,
}

/// One retail location.
///
/// `uptime_percentage` and `health_tier` stay `None` until the store has
/// passed through [`crate::aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecord {
    pub store_number: StoreNumber,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub type_code: String,
    #[serde(default)]
    pub type_desc: String,
    #[serde(default)]
    pub postal_address: PostalAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_footfall: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_tier: Option<HealthTier>,
}

impl StoreRecord {
    /// A bare record carrying only its identifier.
    #[must_use]
    pub fn new(store_number: impl Into<StoreNumber>) -> Self {
        Self {
            store_number: store_number.into(),
            name: String::new(),
            type_code: String::new(),
            type_desc: String::new(),
            postal_address: PostalAddress::default(),
            health_score: None,
            customer_footfall: None,
            dashboard_url: None,
            uptime_percentage: None,
            health_tier: None,
        }
    }

    /// One-line address used by list views: `line1, city, state`.
    #[must_use]
    pub fn address_line(&self) -> String {
        let addr = &self.postal_address;
        [
            addr.stdzd_line1_text.as_deref(),
            addr.stdzd_city_name.as_deref(),
            addr.orig_state_code.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Load the store list from a JSON array.
///
/// # Errors
///
/// Returns [`CoreError::Io`] if the file cannot be read,
/// [`CoreError::Deserialize`] if it is not an array of store records, and
/// [`CoreError::DuplicateStoreNumber`] if two records share a normalized id.
pub fn load_stores(path: &Path) -> Result<Vec<StoreRecord>, CoreError> {
    let content = read_file(path)?;
    let stores = parse_stores(&content, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), count = stores.len(), "loaded store list");
    Ok(stores)
}

fn parse_stores(content: &str, context: &str) -> Result<Vec<StoreRecord>, CoreError> {
    let stores: Vec<StoreRecord> =
        serde_json::from_str(content).map_err(|e| CoreError::Deserialize {
            context: context.to_string(),
            source: e,
        })?;

    let mut seen = HashSet::new();
    for store in &stores {
        if !seen.insert(store.store_number.clone()) {
            return Err(CoreError::DuplicateStoreNumber(
                store.store_number.to_string(),
            ));
        }
    }

    Ok(stores)
}

#[derive(Debug, Deserialize)]
struct FacetsFile {
    #[serde(default)]
    facets: Vec<Value>,
}

/// Load the raw facet rows from a `{ "facets": [...] }` fixture.
///
/// Facets are returned untyped; their shape varies by the query that
/// produced them and is interpreted by [`crate::facts`].
///
/// # Errors
///
/// Returns [`CoreError::Io`] if the file cannot be read and
/// [`CoreError::Deserialize`] if it is not a facets envelope.
pub fn load_facets(path: &Path) -> Result<Vec<Value>, CoreError> {
    let content = read_file(path)?;
    let file: FacetsFile =
        serde_json::from_str(&content).map_err(|e| CoreError::Deserialize {
            context: path.display().to_string(),
            source: e,
        })?;
    tracing::debug!(path = %path.display(), count = file.facets.len(), "loaded facets");
    Ok(file.facets)
}

fn read_file(path: &Path) -> Result<String, CoreError> {
    std::fs::read_to_string(path).map_err(|e| CoreError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_number_trims_strings() {
        assert_eq!(StoreNumber::new("  2221 ").as_str(), "2221");
    }

    #[test]
    fn store_number_from_integer_and_float_agree_with_string() {
        let from_int = StoreNumber::from_json(&serde_json::json!(2221)).unwrap();
        let from_float = StoreNumber::from_json(&serde_json::json!(2221.0)).unwrap();
        assert_eq!(from_int, StoreNumber::new("2221"));
        assert_eq!(from_float, StoreNumber::new("2221"));
    }

    #[test]
    fn store_number_keeps_leading_zeros_in_strings() {
        assert_ne!(StoreNumber::new("02221"), StoreNumber::new("2221"));
    }

    #[test]
    fn store_number_rejects_non_scalars() {
        assert!(StoreNumber::from_json(&serde_json::json!(null)).is_none());
        assert!(StoreNumber::from_json(&serde_json::json!(["1"])).is_none());
        assert!(StoreNumber::from_json(&serde_json::json!(true)).is_none());
    }

    #[test]
    fn parse_stores_accepts_mixed_id_types() {
        let json = r#"[
            {"storeNumber": 100, "name": "Downtown", "typeCode": "FL"},
            {"storeNumber": "200", "name": "Outlet", "typeCode": "RK", "healthScore": 72}
        ]"#;
        let stores = parse_stores(json, "test").unwrap();
        assert_eq!(stores.len(), 2);
        assert_eq!(stores[0].store_number.as_str(), "100");
        assert_eq!(stores[1].store_number.as_str(), "200");
        assert_eq!(stores[1].health_score, Some(72.0));
        assert!(stores[0].uptime_percentage.is_none());
        assert!(stores[0].health_tier.is_none());
    }

    #[test]
    fn parse_stores_rejects_duplicates_after_normalization() {
        let json = r#"[{"storeNumber": 100}, {"storeNumber": "100"}]"#;
        let err = parse_stores(json, "test").unwrap_err();
        assert!(matches!(err, CoreError::DuplicateStoreNumber(ref id) if id == "100"));
    }

    #[test]
    fn parse_stores_reports_context_on_bad_json() {
        let err = parse_stores("{not json", "stores.json").unwrap_err();
        assert!(err.to_string().contains("stores.json"));
    }

    #[test]
    fn address_line_skips_missing_parts() {
        let mut store = StoreRecord::new("1");
        store.postal_address.stdzd_line1_text = Some("1 Main St".to_string());
        store.postal_address.orig_state_code = Some("WA".to_string());
        assert_eq!(store.address_line(), "1 Main St, WA");
    }

    #[test]
    fn load_stores_from_bundled_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("data")
            .join("stores.json");
        let stores = load_stores(&path).expect("bundled stores.json should load");
        assert!(!stores.is_empty());
    }

    #[test]
    fn load_facets_from_bundled_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("data")
            .join("store_details.json");
        let facets = load_facets(&path).expect("bundled store_details.json should load");
        assert!(!facets.is_empty());
    }

    #[test]
    fn load_stores_missing_file_is_io_error() {
        let err = load_stores(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }
}
