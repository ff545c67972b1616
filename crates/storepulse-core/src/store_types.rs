//! Catalog of store type codes, loaded from YAML.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreType {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreTypesFile {
    pub store_types: Vec<StoreType>,
}

impl StoreTypesFile {
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.store_types.iter().any(|t| t.code == code)
    }

    #[must_use]
    pub fn describe(&self, code: &str) -> Option<&str> {
        self.store_types
            .iter()
            .find(|t| t.code == code)
            .map(|t| t.description.as_str())
    }
}

/// Load and validate the store type catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_store_types(path: &Path) -> Result<StoreTypesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StoreTypesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: StoreTypesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::StoreTypesFileParse)?;

    validate_store_types(&file)?;

    Ok(file)
}

fn validate_store_types(file: &StoreTypesFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for store_type in &file.store_types {
        let code = store_type.code.as_str();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::Validation(format!(
                "store type code '{code}' must be non-empty upper-case ASCII"
            )));
        }

        if store_type.description.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "store type '{code}' has an empty description"
            )));
        }

        if !seen.insert(code) {
            return Err(ConfigError::Validation(format!(
                "duplicate store type code: '{code}'"
            )));
        }
    }

    Ok(())
}
