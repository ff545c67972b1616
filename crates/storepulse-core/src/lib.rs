pub mod aggregate;
pub mod app_config;
pub mod classify;
pub mod config;
pub mod detail;
pub mod error;
pub mod facts;
pub mod filter;
pub mod link;
pub mod store;
pub mod store_types;

pub use aggregate::{aggregate, aggregate_facets, UptimeAccumulator, UptimeCounts};
pub use app_config::{AppConfig, DetailSourceKind, Environment};
pub use classify::{classify, HealthTier, ThresholdPreset};
pub use config::{load_app_config, load_app_config_from_env};
pub use detail::{DetailRecord, PerformanceStats};
pub use error::{ConfigError, CoreError};
pub use facts::{
    count_from_json, fact_from_facet, facet_store_number, facts_from_facets, DeviceStatus,
    DeviceStatusFact,
};
pub use filter::{filter_stores, MinHealth, StoreFilter};
pub use link::dashboard_link;
pub use store::{load_facets, load_stores, PostalAddress, StoreNumber, StoreRecord};
pub use store_types::{load_store_types, StoreType, StoreTypesFile};
