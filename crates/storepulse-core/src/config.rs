use std::sync::LazyLock;

use regex::Regex;

use crate::app_config::{AppConfig, DetailSourceKind, Environment};
use crate::classify::ThresholdPreset;
use crate::ConfigError;

pub(crate) const DEFAULT_DASHBOARD_URL: &str =
    "https://one.newrelic.com/dashboards/detail/MzgxNDgyOXxWSVp8REFTSEJPQVJE";

/// NRQL `SINCE` clauses accepted for the remote detail query.
static QUERY_WINDOW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[1-9][0-9]* (minute|hour|day|week)s? ago$").expect("valid regex")
});

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("STOREPULSE_ENV", "development"))?;
    let log_level = or_default("STOREPULSE_LOG_LEVEL", "info");

    let stores_path = PathBuf::from(or_default("STOREPULSE_STORES_PATH", "./data/stores.json"));
    let facets_path = PathBuf::from(or_default(
        "STOREPULSE_FACETS_PATH",
        "./data/store_details.json",
    ));
    let store_types_path = PathBuf::from(or_default(
        "STOREPULSE_STORE_TYPES_PATH",
        "./config/store_types.yaml",
    ));

    let threshold_preset = or_default("STOREPULSE_THRESHOLD_PRESET", "inclusive-50-80")
        .parse::<ThresholdPreset>()
        .map_err(|reason| invalid("STOREPULSE_THRESHOLD_PRESET", reason))?;

    let detail_source = parse_detail_source(&or_default("STOREPULSE_DETAIL_SOURCE", "static"))?;

    let nerdgraph_api_key = lookup("NEW_RELIC_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    let nerdgraph_url = or_default(
        "STOREPULSE_NERDGRAPH_URL",
        "https://api.newrelic.com/graphql",
    );

    let account_id = match lookup("STOREPULSE_ACCOUNT_ID") {
        Ok(raw) => {
            let id = raw
                .parse::<u64>()
                .map_err(|e| invalid("STOREPULSE_ACCOUNT_ID", e.to_string()))?;
            if id == 0 {
                return Err(invalid(
                    "STOREPULSE_ACCOUNT_ID",
                    "must be a positive integer".to_string(),
                ));
            }
            Some(id)
        }
        Err(_) => None,
    };

    if detail_source == DetailSourceKind::Remote {
        if nerdgraph_api_key.is_none() {
            return Err(ConfigError::MissingEnvVar("NEW_RELIC_API_KEY".to_string()));
        }
        if account_id.is_none() {
            return Err(ConfigError::MissingEnvVar(
                "STOREPULSE_ACCOUNT_ID".to_string(),
            ));
        }
    }

    let query_window = or_default("STOREPULSE_QUERY_WINDOW", "1 day ago");
    if !QUERY_WINDOW_RE.is_match(&query_window) {
        return Err(invalid(
            "STOREPULSE_QUERY_WINDOW",
            format!("'{query_window}' is not of the form '<n> <minute|hour|day|week>[s] ago'"),
        ));
    }

    let query_timeout_secs = parse_u64("STOREPULSE_QUERY_TIMEOUT_SECS", "15")?;
    if query_timeout_secs == 0 {
        return Err(invalid(
            "STOREPULSE_QUERY_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let max_retries = parse_u32("STOREPULSE_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("STOREPULSE_RETRY_BACKOFF_BASE_MS", "500")?;

    let dashboard_url = or_default("STOREPULSE_DASHBOARD_URL", DEFAULT_DASHBOARD_URL);
    let dashboard_variable = or_default("STOREPULSE_DASHBOARD_VARIABLE", "select_site_name");

    Ok(AppConfig {
        env,
        log_level,
        stores_path,
        facets_path,
        store_types_path,
        threshold_preset,
        detail_source,
        nerdgraph_api_key,
        nerdgraph_url,
        account_id,
        query_window,
        query_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        dashboard_url,
        dashboard_variable,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREPULSE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_detail_source(s: &str) -> Result<DetailSourceKind, ConfigError> {
    match s {
        "static" => Ok(DetailSourceKind::Static),
        "remote" => Ok(DetailSourceKind::Remote),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREPULSE_DETAIL_SOURCE".to_string(),
            reason: format!("expected 'static' or 'remote', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
