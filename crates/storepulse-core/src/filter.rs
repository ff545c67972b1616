//! Search/type/minimum-health filtering over enriched store lists.

use crate::store::{StoreNumber, StoreRecord};

/// AND-combined store predicates. An unset criterion matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreFilter {
    /// Exact match on the normalized store number.
    pub search_store_id: Option<StoreNumber>,
    /// Exact match on `type_code`.
    pub type_code: Option<String>,
    /// Lower bound on `health_score`. `None` means unset.
    pub min_health: Option<MinHealth>,
}

/// A non-blank minimum-health input after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinHealth {
    /// Inclusive lower bound. Stores without a score fail it.
    AtLeast(i64),
    /// Input with no leading integer. No store satisfies it.
    Unparseable,
}

impl MinHealth {
    /// Reads the integer prefix of `raw`: `"85"` and `"85.9"` both give 85.
    /// Values beyond the `i64` range saturate. Blank input gives `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        let parsed = parse_leading_int(raw);
        if parsed.is_none() {
            tracing::debug!(raw, "minimum health filter has no leading integer");
        }
        Some(parsed.map_or(Self::Unparseable, Self::AtLeast))
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn admits(self, health_score: Option<f64>) -> bool {
        match self {
            Self::AtLeast(min) => health_score.is_some_and(|score| score >= min as f64),
            Self::Unparseable => false,
        }
    }
}

impl StoreFilter {
    /// Builds a filter from raw text inputs, treating blank fields as unset.
    ///
    /// `min_health` is parsed with [`MinHealth::parse`].
    #[must_use]
    pub fn from_inputs(search_store_id: &str, type_code: &str, min_health: &str) -> Self {
        let search_store_id = Some(StoreNumber::new(search_store_id)).filter(|s| !s.is_empty());
        let type_code = Some(type_code.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_owned);
        let min_health = MinHealth::parse(min_health);
        Self {
            search_store_id,
            type_code,
            min_health,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search_store_id.is_none() && self.type_code.is_none() && self.min_health.is_none()
    }

    #[must_use]
    pub fn matches(&self, store: &StoreRecord) -> bool {
        let matches_id = self
            .search_store_id
            .as_ref()
            .is_none_or(|id| *id == store.store_number);
        let matches_type = self
            .type_code
            .as_deref()
            .is_none_or(|code| code == store.type_code);
        let matches_health = self
            .min_health
            .is_none_or(|min| min.admits(store.health_score));
        matches_id && matches_type && matches_health
    }
}

/// Stores matching `filter`, in input order. The input is left untouched.
#[must_use]
pub fn filter_stores(stores: &[StoreRecord], filter: &StoreFilter) -> Vec<StoreRecord> {
    stores
        .iter()
        .filter(|store| filter.matches(store))
        .cloned()
        .collect()
}

/// Integer prefix of `raw`: optional sign then digits, after leading whitespace.
/// Overflowing prefixes saturate to `i64::MIN` / `i64::MAX`.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() {
        return None;
    }
    let value = digits.bytes().fold(0i64, |acc, digit| {
        let digit = i64::from(digit - b'0');
        if negative {
            acc.saturating_mul(10).saturating_sub(digit)
        } else {
            acc.saturating_mul(10).saturating_add(digit)
        }
    });
    Some(value)
}
