use std::path::PathBuf;

use crate::classify::ThresholdPreset;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which backing strategy answers per-store detail lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSourceKind {
    /// Pre-loaded facet fixtures, resolved without suspension.
    Static,
    /// Live NerdGraph query per selection.
    Remote,
}

impl std::fmt::Display for DetailSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetailSourceKind::Static => write!(f, "static"),
            DetailSourceKind::Remote => write!(f, "remote"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub stores_path: PathBuf,
    pub facets_path: PathBuf,
    pub store_types_path: PathBuf,
    pub threshold_preset: ThresholdPreset,
    pub detail_source: DetailSourceKind,
    pub nerdgraph_api_key: Option<String>,
    pub nerdgraph_url: String,
    pub account_id: Option<u64>,
    pub query_window: String,
    pub query_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub dashboard_url: String,
    pub dashboard_variable: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("stores_path", &self.stores_path)
            .field("facets_path", &self.facets_path)
            .field("store_types_path", &self.store_types_path)
            .field("threshold_preset", &self.threshold_preset)
            .field("detail_source", &self.detail_source)
            .field(
                "nerdgraph_api_key",
                &self.nerdgraph_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("nerdgraph_url", &self.nerdgraph_url)
            .field("account_id", &self.account_id)
            .field("query_window", &self.query_window)
            .field("query_timeout_secs", &self.query_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("dashboard_url", &self.dashboard_url)
            .field("dashboard_variable", &self.dashboard_variable)
            .finish()
    }
}
