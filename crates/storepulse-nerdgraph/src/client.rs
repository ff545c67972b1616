//! HTTP client for the NerdGraph GraphQL API.
//!
//! Only the `actor.account.nrql` field is used. Every call is wrapped in a
//! retry loop for transient failures and an overall deadline, so a caller
//! never waits longer than the configured timeout.

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;
use storepulse_core::{DetailRecord, StoreNumber};

use crate::error::NerdGraphError;
use crate::nrql::device_status_query;
use crate::retry::retry_with_backoff;
use crate::rows::detail_from_rows;
use crate::types::{GraphQlRequest, GraphQlResponse, NrqlVariables, NRQL_DOCUMENT};

const DEFAULT_ENDPOINT: &str = "https://api.newrelic.com/graphql";

/// Client for NerdGraph NRQL queries against a single account.
///
/// Use [`NerdGraphClient::new`] for production or
/// [`NerdGraphClient::with_endpoint`] to point at a mock server in tests.
pub struct NerdGraphClient {
    client: Client,
    api_key: String,
    account_id: u64,
    endpoint: Url,
    timeout: Duration,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl NerdGraphClient {
    /// Creates a client pointed at the production NerdGraph endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`NerdGraphError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, account_id: u64, timeout: Duration) -> Result<Self, NerdGraphError> {
        Self::with_endpoint(api_key, account_id, timeout, DEFAULT_ENDPOINT)
    }

    /// Creates a client with a custom endpoint URL.
    ///
    /// Retries default to none; see [`NerdGraphClient::with_retry_policy`].
    ///
    /// # Errors
    ///
    /// Returns [`NerdGraphError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`NerdGraphError::InvalidEndpoint`] if
    /// `endpoint` is not an absolute URL.
    pub fn with_endpoint(
        api_key: &str,
        account_id: u64,
        timeout: Duration,
        endpoint: &str,
    ) -> Result<Self, NerdGraphError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent("storepulse/0.1 (store-uptime)")
            .build()?;

        let endpoint = Url::parse(endpoint).map_err(|e| NerdGraphError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            account_id,
            endpoint,
            timeout,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Sets how many additional attempts transient failures get, and the
    /// base back-off delay between them. Both count against the timeout.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    #[must_use]
    pub fn account_id(&self) -> u64 {
        self.account_id
    }

    /// Runs `nrql` and returns the raw result rows.
    ///
    /// # Errors
    ///
    /// - [`NerdGraphError::Timeout`] if the call, retries included, exceeds
    ///   the client timeout.
    /// - [`NerdGraphError::Api`] if NerdGraph reports GraphQL errors.
    /// - [`NerdGraphError::Http`] on network failure or non-2xx status.
    /// - [`NerdGraphError::Deserialize`] / [`NerdGraphError::MissingResults`]
    ///   if the body is not the expected shape.
    pub async fn run_nrql(&self, nrql: &str) -> Result<Vec<Value>, NerdGraphError> {
        let attempt = retry_with_backoff(self.max_retries, self.backoff_base_ms, move || {
            self.post_nrql(nrql)
        });

        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(result) => result,
            Err(_) => {
                #[allow(clippy::cast_possible_truncation)]
                let waited_ms = self.timeout.as_millis() as u64;
                Err(NerdGraphError::Timeout { waited_ms })
            }
        }
    }

    /// Online/offline device counts for one store over `window`.
    ///
    /// Returns `Ok(None)` when the query succeeds but yields no usable rows.
    ///
    /// # Errors
    ///
    /// Same as [`NerdGraphClient::run_nrql`].
    pub async fn store_device_status(
        &self,
        store: &StoreNumber,
        window: &str,
    ) -> Result<Option<DetailRecord>, NerdGraphError> {
        let nrql = device_status_query(store, window);
        tracing::debug!(%store, account_id = self.account_id, "querying device status");
        let rows = self.run_nrql(&nrql).await?;
        Ok(detail_from_rows(store, &rows))
    }

    async fn post_nrql(&self, nrql: &str) -> Result<Vec<Value>, NerdGraphError> {
        let request = GraphQlRequest {
            query: NRQL_DOCUMENT,
            variables: NrqlVariables {
                account_id: self.account_id,
                nrql,
            },
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("API-Key", &self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        let parsed: GraphQlResponse =
            serde_json::from_str(&body).map_err(|e| NerdGraphError::Deserialize {
                context: format!("nrql(account={})", self.account_id),
                source: e,
            })?;

        if !parsed.errors.is_empty() {
            let message = parsed
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(NerdGraphError::Api(message));
        }

        parsed.into_results().ok_or(NerdGraphError::MissingResults)
    }
}
