//! NerdGraph client for live per-store device status.

pub mod client;
pub mod error;
pub mod nrql;
pub mod rows;
pub(crate) mod retry;
pub mod types;

pub use client::NerdGraphClient;
pub use error::NerdGraphError;
pub use nrql::device_status_query;
pub use rows::detail_from_rows;
