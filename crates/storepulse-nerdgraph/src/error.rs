use thiserror::Error;

/// Errors returned by the NerdGraph client.
#[derive(Debug, Error)]
pub enum NerdGraphError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// NerdGraph answered with a GraphQL `errors` array.
    #[error("NerdGraph API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response decoded but carried no `actor.account.nrql` block.
    #[error("NerdGraph response is missing nrql results")]
    MissingResults,

    /// The query, retries included, did not finish within the allotted time.
    #[error("NerdGraph query timed out after {waited_ms}ms")]
    Timeout { waited_ms: u64 },

    #[error("invalid NerdGraph endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}
