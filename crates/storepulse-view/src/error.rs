use storepulse_nerdgraph::NerdGraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("remote detail query failed: {0}")]
    Remote(#[from] NerdGraphError),

    #[error("remote detail source is not configured: {0}")]
    NotConfigured(String),
}

impl ResolveError {
    /// Whether the failure was the query deadline rather than a bad answer.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            ResolveError::Remote(NerdGraphError::Timeout { .. }) => true,
            ResolveError::Remote(NerdGraphError::Http(e)) => e.is_timeout(),
            _ => false,
        }
    }
}
