//! Loading configuration-named fixtures into a ready reconciler.

use anyhow::Context;
use serde_json::Value;
use storepulse_core::{
    aggregate_facets, load_facets, load_store_types, load_stores, AppConfig, StoreTypesFile,
};
use storepulse_view::Reconciler;

pub(crate) struct Session {
    pub reconciler: Reconciler,
    pub facets: Vec<Value>,
    pub store_types: StoreTypesFile,
}

pub(crate) fn load_session(config: &AppConfig) -> anyhow::Result<Session> {
    let stores = load_stores(&config.stores_path)
        .with_context(|| format!("loading stores from {}", config.stores_path.display()))?;
    let facets = load_facets(&config.facets_path)
        .with_context(|| format!("loading facets from {}", config.facets_path.display()))?;
    let store_types = load_store_types(&config.store_types_path).with_context(|| {
        format!(
            "loading store types from {}",
            config.store_types_path.display()
        )
    })?;

    let enriched = aggregate_facets(&stores, &facets, config.threshold_preset);
    tracing::info!(
        stores = enriched.len(),
        facets = facets.len(),
        preset = %config.threshold_preset,
        "aggregated store uptime"
    );

    for store in &enriched {
        if !store.type_code.is_empty() && !store_types.contains(&store.type_code) {
            tracing::warn!(
                store = %store.store_number,
                type_code = store.type_code,
                "store has a type code missing from the catalog"
            );
        }
    }

    Ok(Session {
        reconciler: Reconciler::new(enriched),
        facets,
        store_types,
    })
}

/// Rejects a non-blank `--type` that the catalog does not list.
pub(crate) fn validate_type_code(types: &StoreTypesFile, code: &str) -> anyhow::Result<()> {
    let code = code.trim();
    if code.is_empty() || types.contains(code) {
        return Ok(());
    }
    let known = types
        .store_types
        .iter()
        .map(|t| t.code.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    anyhow::bail!("unknown store type '{code}'; expected one of: {known}")
}
