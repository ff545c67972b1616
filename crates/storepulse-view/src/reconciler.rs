//! Selection and filter state for one dashboard session.
//!
//! The [`Reconciler`] owns the enriched store list and the selection state.
//! Detail lookups are issued as [`DetailTicket`]s; a ticket's outcome is only
//! applied while it still belongs to the current selection, so a slow
//! response for an earlier store can never overwrite a newer selection.

use chrono::{DateTime, Utc};
use serde::Serialize;
use storepulse_core::{filter_stores, DetailRecord, StoreFilter, StoreNumber, StoreRecord};

use crate::error::ResolveError;
use crate::resolver::DetailResolver;

/// Where the details for the selected store stand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "lowercase")]
pub enum DetailStatus {
    Loading,
    Loaded(DetailRecord),
    /// The source answered but holds nothing for this store.
    Missing,
    /// The lookup failed or timed out.
    Failed(String),
}

impl DetailStatus {
    #[must_use]
    pub fn record(&self) -> Option<&DetailRecord> {
        match self {
            DetailStatus::Loaded(record) => Some(record),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, DetailStatus::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedStore {
    pub store: StoreRecord,
    pub details: DetailStatus,
    /// When `details` left the loading state.
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    token: u64,
}

/// Handle for one outstanding detail lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    token: u64,
    store: StoreNumber,
}

impl DetailTicket {
    #[must_use]
    pub fn store(&self) -> &StoreNumber {
        &self.store
    }

    #[must_use]
    pub fn token(&self) -> u64 {
        self.token
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionState {
    pub search_store_id: String,
    pub selected_type_code: String,
    pub min_health: String,
    pub selected: Option<SelectedStore>,
    pub hovered: Option<StoreRecord>,
}

/// Finds the store whose normalized number equals `store_number`.
#[must_use]
pub fn select_store<'a>(stores: &'a [StoreRecord], store_number: &str) -> Option<&'a StoreRecord> {
    let wanted = StoreNumber::new(store_number);
    if wanted.is_empty() {
        return None;
    }
    stores.iter().find(|s| s.store_number == wanted)
}

#[derive(Debug, Default)]
pub struct Reconciler {
    stores: Vec<StoreRecord>,
    state: SelectionState,
    last_token: u64,
}

impl Reconciler {
    #[must_use]
    pub fn new(stores: Vec<StoreRecord>) -> Self {
        Self {
            stores,
            state: SelectionState::default(),
            last_token: 0,
        }
    }

    #[must_use]
    pub fn stores(&self) -> &[StoreRecord] {
        &self.stores
    }

    #[must_use]
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    #[must_use]
    pub fn selected(&self) -> Option<&SelectedStore> {
        self.state.selected.as_ref()
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&StoreRecord> {
        self.state.hovered.as_ref()
    }

    /// Swaps in a freshly aggregated store list.
    ///
    /// The selection survives if its store is still present, with the new
    /// base record; otherwise it is cleared. The hover is refreshed the same
    /// way.
    pub fn replace_stores(&mut self, stores: Vec<StoreRecord>) {
        self.stores = stores;

        let refreshed = self
            .state
            .selected
            .as_ref()
            .map(|s| select_store(&self.stores, s.store.store_number.as_str()).cloned());
        match refreshed {
            Some(Some(store)) => {
                if let Some(selected) = self.state.selected.as_mut() {
                    selected.store = store;
                }
            }
            Some(None) => self.clear_selection(),
            None => {}
        }

        self.state.hovered = self
            .state
            .hovered
            .take()
            .and_then(|h| select_store(&self.stores, h.store_number.as_str()).cloned());
    }

    pub fn set_search(&mut self, raw: &str) {
        raw.trim().clone_into(&mut self.state.search_store_id);
    }

    pub fn set_type_code(&mut self, code: &str) {
        code.trim().clone_into(&mut self.state.selected_type_code);
    }

    pub fn set_min_health(&mut self, raw: &str) {
        raw.trim().clone_into(&mut self.state.min_health);
    }

    #[must_use]
    pub fn filter(&self) -> StoreFilter {
        StoreFilter::from_inputs(
            &self.state.search_store_id,
            &self.state.selected_type_code,
            &self.state.min_health,
        )
    }

    /// The stores passing the current search, type and health filters.
    #[must_use]
    pub fn visible(&self) -> Vec<StoreRecord> {
        filter_stores(&self.stores, &self.filter())
    }

    /// Selects `store_number`, putting its details into the loading state.
    ///
    /// Returns the ticket the detail outcome must be applied with, or `None`
    /// when no such store exists, in which case the selection is cleared.
    /// Either way every earlier ticket becomes stale.
    pub fn select(&mut self, store_number: &str) -> Option<DetailTicket> {
        self.last_token += 1;
        let token = self.last_token;

        let Some(store) = select_store(&self.stores, store_number).cloned() else {
            tracing::debug!(store_number, "selection cleared, store not found");
            self.state.selected = None;
            return None;
        };

        let ticket = DetailTicket {
            token,
            store: store.store_number.clone(),
        };
        self.state.selected = Some(SelectedStore {
            store,
            details: DetailStatus::Loading,
            resolved_at: None,
            token,
        });
        Some(ticket)
    }

    /// Applies a detail outcome if `ticket` still matches the selection.
    ///
    /// Returns `false` when the outcome was discarded as stale.
    pub fn complete(
        &mut self,
        ticket: &DetailTicket,
        outcome: Result<Option<DetailRecord>, ResolveError>,
    ) -> bool {
        let Some(selected) = self
            .state
            .selected
            .as_mut()
            .filter(|s| s.token == ticket.token)
        else {
            tracing::debug!(
                store = %ticket.store,
                token = ticket.token,
                "discarding stale detail response"
            );
            return false;
        };

        selected.details = match outcome {
            Ok(Some(record)) => DetailStatus::Loaded(record),
            Ok(None) => DetailStatus::Missing,
            Err(err) => {
                tracing::warn!(
                    store = %ticket.store,
                    timeout = err.is_timeout(),
                    error = %err,
                    "detail lookup failed"
                );
                DetailStatus::Failed(err.to_string())
            }
        };
        selected.resolved_at = Some(Utc::now());
        true
    }

    /// Selects `store_number` and resolves its details in one step.
    pub async fn select_and_resolve(
        &mut self,
        store_number: &str,
        resolver: &DetailResolver,
    ) -> Option<&SelectedStore> {
        let ticket = self.select(store_number)?;
        let outcome = resolver.resolve(ticket.store()).await;
        self.complete(&ticket, outcome);
        self.selected()
    }

    /// Drops the selection and invalidates any outstanding ticket.
    pub fn clear_selection(&mut self) {
        self.last_token += 1;
        self.state.selected = None;
    }

    /// Marks `store_number` as hovered. An unknown store clears the hover.
    pub fn hover(&mut self, store_number: &str) -> Option<&StoreRecord> {
        self.state.hovered = select_store(&self.stores, store_number).cloned();
        self.state.hovered.as_ref()
    }

    pub fn clear_hover(&mut self) {
        self.state.hovered = None;
    }
}

#[cfg(test)]
mod tests {
    use storepulse_core::{aggregate, DeviceStatus, DeviceStatusFact, ThresholdPreset};
    use storepulse_nerdgraph::NerdGraphError;

    use super::*;
    use crate::resolver::StaticDetails;

    fn reconciler() -> Reconciler {
        let mut stores: Vec<StoreRecord> = ["100", "200", "300"]
            .into_iter()
            .map(StoreRecord::new)
            .collect();
        stores[0].type_code = "FL".to_string();
        stores[1].type_code = "RK".to_string();
        stores[2].type_code = "FL".to_string();
        stores[0].health_score = Some(90.0);
        stores[2].health_score = Some(55.0);
        let facts = vec![
            DeviceStatusFact::new("100", DeviceStatus::Online, 8),
            DeviceStatusFact::new("100", DeviceStatus::Offline, 2),
        ];
        Reconciler::new(aggregate(&stores, &facts, ThresholdPreset::default()))
    }

    fn record(id: &str, online: u64) -> DetailRecord {
        DetailRecord::from_counts(
            StoreNumber::new(id),
            storepulse_core::UptimeCounts { online, offline: 0 },
        )
    }

    #[test]
    fn select_known_store_starts_loading() {
        let mut r = reconciler();
        let ticket = r.select("200").unwrap();
        assert_eq!(ticket.store().as_str(), "200");
        let selected = r.selected().unwrap();
        assert_eq!(selected.store.store_number.as_str(), "200");
        assert!(selected.details.is_loading());
        assert!(selected.resolved_at.is_none());
    }

    #[test]
    fn select_unknown_store_clears_selection() {
        let mut r = reconciler();
        r.select("100");
        assert!(r.select("999").is_none());
        assert!(r.selected().is_none());
    }

    #[test]
    fn select_normalizes_input() {
        let mut r = reconciler();
        assert!(r.select(" 300 ").is_some());
        assert!(r.select("").is_none());
    }

    #[test]
    fn complete_applies_matching_ticket() {
        let mut r = reconciler();
        let ticket = r.select("100").unwrap();
        assert!(r.complete(&ticket, Ok(Some(record("100", 8)))));
        let selected = r.selected().unwrap();
        assert_eq!(selected.details.record().map(|d| d.online), Some(8));
        assert!(selected.resolved_at.is_some());
    }

    #[test]
    fn late_response_for_previous_selection_is_discarded() {
        let mut r = reconciler();
        let ticket_a = r.select("100").unwrap();
        let ticket_b = r.select("200").unwrap();

        assert!(!r.complete(&ticket_a, Ok(Some(record("100", 8)))));
        let selected = r.selected().unwrap();
        assert_eq!(selected.store.store_number.as_str(), "200");
        assert!(selected.details.is_loading());

        assert!(r.complete(&ticket_b, Ok(None)));
        assert_eq!(r.selected().unwrap().details, DetailStatus::Missing);
    }

    #[test]
    fn reselecting_same_store_invalidates_older_ticket() {
        let mut r = reconciler();
        let first = r.select("100").unwrap();
        let second = r.select("100").unwrap();
        assert!(!r.complete(&first, Ok(Some(record("100", 1)))));
        assert!(r.complete(&second, Ok(Some(record("100", 2)))));
        assert_eq!(
            r.selected().unwrap().details.record().map(|d| d.online),
            Some(2)
        );
    }

    #[test]
    fn response_after_clear_is_discarded() {
        let mut r = reconciler();
        let ticket = r.select("100").unwrap();
        r.clear_selection();
        assert!(!r.complete(&ticket, Ok(Some(record("100", 8)))));
        assert!(r.selected().is_none());
    }

    #[test]
    fn response_after_failed_lookup_of_missing_store_is_discarded() {
        let mut r = reconciler();
        let ticket = r.select("100").unwrap();
        r.select("999");
        assert!(!r.complete(&ticket, Ok(Some(record("100", 8)))));
        assert!(r.selected().is_none());
    }

    #[test]
    fn failure_is_recorded_not_raised() {
        let mut r = reconciler();
        let ticket = r.select("100").unwrap();
        let err = ResolveError::Remote(NerdGraphError::Timeout { waited_ms: 50 });
        assert!(r.complete(&ticket, Err(err)));
        match &r.selected().unwrap().details {
            DetailStatus::Failed(reason) => assert!(reason.contains("timed out")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn visible_applies_all_filters() {
        let mut r = reconciler();
        assert_eq!(r.visible().len(), 3);

        r.set_type_code("FL");
        assert_eq!(r.visible().len(), 2);

        r.set_min_health("60");
        let visible = r.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].store_number.as_str(), "100");

        r.set_min_health("");
        r.set_search(" 300 ");
        assert_eq!(r.state().search_store_id, "300");
        let visible = r.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].store_number.as_str(), "300");
    }

    #[test]
    fn filtering_does_not_touch_selection() {
        let mut r = reconciler();
        r.select("200");
        r.set_type_code("FL");
        assert!(r.visible().iter().all(|s| s.store_number.as_str() != "200"));
        assert_eq!(
            r.selected().map(|s| s.store.store_number.as_str()),
            Some("200")
        );
    }

    #[test]
    fn hover_tracks_known_stores() {
        let mut r = reconciler();
        assert!(r.hover("300").is_some());
        assert_eq!(r.hovered().map(|s| s.store_number.as_str()), Some("300"));
        assert!(r.hover("nope").is_none());
        assert!(r.hovered().is_none());
        r.hover("100");
        r.clear_hover();
        assert!(r.hovered().is_none());
    }

    #[test]
    fn replace_stores_refreshes_or_clears_selection() {
        let mut r = reconciler();
        let ticket = r.select("100").unwrap();
        r.complete(&ticket, Ok(Some(record("100", 8))));

        let mut refreshed = r.stores().to_vec();
        refreshed[0].name = "Renamed".to_string();
        r.replace_stores(refreshed);
        let selected = r.selected().unwrap();
        assert_eq!(selected.store.name, "Renamed");
        assert!(selected.details.record().is_some());

        r.replace_stores(vec![StoreRecord::new("200")]);
        assert!(r.selected().is_none());
    }

    #[tokio::test]
    async fn select_and_resolve_with_static_source() {
        let facets = vec![
            serde_json::json!({"name": "100", "online": "Online", "results": {"uniqueCount": 8}}),
            serde_json::json!({"name": "100", "offline": "Offline", "results": {"uniqueCount": 2}}),
        ];
        let resolver = DetailResolver::Static(StaticDetails::from_facets(&facets));
        let mut r = reconciler();

        let selected = r.select_and_resolve("100", &resolver).await.unwrap();
        let details = selected.details.record().unwrap();
        assert!((details.online_percentage - 80.0).abs() < f64::EPSILON);

        let selected = r.select_and_resolve("200", &resolver).await.unwrap();
        assert_eq!(selected.details, DetailStatus::Missing);

        assert!(r.select_and_resolve("999", &resolver).await.is_none());
    }
}
