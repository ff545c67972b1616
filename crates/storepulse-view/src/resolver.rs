//! Per-store detail lookup, backed either by bundled facets or by a live
//! NerdGraph query. Both produce the same [`DetailRecord`] shape.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use storepulse_core::{
    facet_store_number, fact_from_facet, AppConfig, DetailRecord, DetailSourceKind,
    PerformanceStats, StoreNumber, UptimeCounts,
};
use storepulse_nerdgraph::NerdGraphClient;

use crate::error::ResolveError;

/// Detail lookups from a pre-loaded facet collection. Never suspends.
#[derive(Debug, Default)]
pub struct StaticDetails {
    index: HashMap<StoreNumber, DetailRecord>,
}

impl StaticDetails {
    /// Indexes `facets` by store.
    ///
    /// A store is present if any facet names it, even when none of its rows
    /// carry a usable status; such stores resolve to zero counts. Repeated
    /// status rows for a store overwrite earlier ones.
    #[must_use]
    pub fn from_facets(facets: &[Value]) -> Self {
        let mut counts: HashMap<StoreNumber, (UptimeCounts, PerformanceStats)> = HashMap::new();

        for facet in facets {
            let Some(store) = facet_store_number(facet).filter(|s| !s.is_empty()) else {
                tracing::debug!(%facet, "static facet has no store number");
                continue;
            };
            let entry = counts.entry(store).or_default();
            if let Some(fact) = fact_from_facet(facet) {
                entry.0.set(fact.status, fact.count);
            }
            if let Some(stats) = PerformanceStats::from_facet(facet) {
                entry.1 = PerformanceStats {
                    response_time: stats.response_time.or(entry.1.response_time),
                    incident_count: stats.incident_count.or(entry.1.incident_count),
                };
            }
        }

        let index = counts
            .into_iter()
            .map(|(store, (uptime, stats))| {
                let record = DetailRecord::from_counts(store.clone(), uptime).with_stats(&stats);
                (store, record)
            })
            .collect();
        Self { index }
    }

    #[must_use]
    pub fn lookup(&self, store: &StoreNumber) -> Option<DetailRecord> {
        self.index.get(store).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Detail lookups through a NerdGraph device-status query.
pub struct RemoteDetails {
    client: NerdGraphClient,
    window: String,
}

impl RemoteDetails {
    #[must_use]
    pub fn new(client: NerdGraphClient, window: impl Into<String>) -> Self {
        Self {
            client,
            window: window.into(),
        }
    }

    /// # Errors
    ///
    /// Returns [`ResolveError::Remote`] if the query fails or times out.
    pub async fn fetch(&self, store: &StoreNumber) -> Result<Option<DetailRecord>, ResolveError> {
        Ok(self.client.store_device_status(store, &self.window).await?)
    }
}

/// The configured detail source.
pub enum DetailResolver {
    Static(StaticDetails),
    Remote(RemoteDetails),
}

impl DetailResolver {
    /// Builds the resolver named by `config.detail_source`.
    ///
    /// `facets` feeds the static variant and is ignored for remote.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotConfigured`] if remote credentials are
    /// missing, or [`ResolveError::Remote`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig, facets: &[Value]) -> Result<Self, ResolveError> {
        match config.detail_source {
            DetailSourceKind::Static => Ok(Self::Static(StaticDetails::from_facets(facets))),
            DetailSourceKind::Remote => {
                let api_key = config.nerdgraph_api_key.as_deref().ok_or_else(|| {
                    ResolveError::NotConfigured("NEW_RELIC_API_KEY is not set".to_string())
                })?;
                let account_id = config.account_id.ok_or_else(|| {
                    ResolveError::NotConfigured("STOREPULSE_ACCOUNT_ID is not set".to_string())
                })?;
                let client = NerdGraphClient::with_endpoint(
                    api_key,
                    account_id,
                    Duration::from_secs(config.query_timeout_secs),
                    &config.nerdgraph_url,
                )?
                .with_retry_policy(config.max_retries, config.retry_backoff_base_ms);
                Ok(Self::Remote(RemoteDetails::new(
                    client,
                    config.query_window.clone(),
                )))
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> DetailSourceKind {
        match self {
            Self::Static(_) => DetailSourceKind::Static,
            Self::Remote(_) => DetailSourceKind::Remote,
        }
    }

    /// Looks up details for `store`. `Ok(None)` means the source has no data
    /// for it.
    ///
    /// # Errors
    ///
    /// Only the remote variant fails; see [`RemoteDetails::fetch`].
    pub async fn resolve(&self, store: &StoreNumber) -> Result<Option<DetailRecord>, ResolveError> {
        match self {
            Self::Static(details) => Ok(details.lookup(store)),
            Self::Remote(details) => details.fetch(store).await,
        }
    }
}
