use thiserror::Error;

/// Errors raised while loading store fixtures.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate store number '{0}' in store list")]
    DuplicateStoreNumber(String),
}

/// Errors raised while loading environment or file-based configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read store types file {path}: {source}")]
    StoreTypesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse store types file: {0}")]
    StoreTypesFileParse(#[source] serde_yaml::Error),

    #[error("store types validation failed: {0}")]
    Validation(String),
}
