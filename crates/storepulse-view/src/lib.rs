//! Selection, filtering and detail resolution over an enriched store list.

pub mod error;
pub mod reconciler;
pub mod resolver;

pub use error::ResolveError;
pub use reconciler::{
    select_store, DetailStatus, DetailTicket, Reconciler, SelectedStore, SelectionState,
};
pub use resolver::{DetailResolver, RemoteDetails, StaticDetails};
