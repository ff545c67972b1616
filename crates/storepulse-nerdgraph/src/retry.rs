//! Retry with exponential back-off and jitter for NerdGraph calls.

use std::future::Future;
use std::time::Duration;

use crate::error::NerdGraphError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** request timeouts, connection failures, HTTP 5xx and 429.
///
/// **Not retriable:** GraphQL errors, malformed bodies, missing results and
/// the overall deadline.
pub(crate) fn is_retriable(err: &NerdGraphError) -> bool {
    match err {
        NerdGraphError::Http(e) => {
            e.is_timeout()
                || e.is_connect()
                || e.status()
                    .is_some_and(|s| s.is_server_error() || s.as_u16() == 429)
        }
        NerdGraphError::Api(_)
        | NerdGraphError::Deserialize { .. }
        | NerdGraphError::MissingResults
        | NerdGraphError::Timeout { .. }
        | NerdGraphError::InvalidEndpoint { .. } => false,
    }
}

const MAX_DELAY_MS: u64 = 30_000;

/// Delay before retry number `attempt` (1-based): `base × 2^(attempt-1)`,
/// capped at 30 s, then scaled by a jitter factor in `[0.75, 1.25)`.
fn backoff_delay(attempt: u32, backoff_base_ms: u64, jitter: f64) -> Duration {
    let exponent = attempt.saturating_sub(1).min(10);
    let capped = backoff_base_ms
        .saturating_mul(1u64 << exponent)
        .min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let millis = (capped as f64 * (0.75 + jitter * 0.5)) as u64;
    Duration::from_millis(millis)
}

/// Runs `operation`, retrying transient failures up to `max_retries` times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, NerdGraphError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, NerdGraphError>>,
{
    let mut attempt = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_retries && is_retriable(&err) => err,
            Err(err) => return Err(err),
        };
        attempt += 1;
        let delay = backoff_delay(attempt, backoff_base_ms, rand::random::<f64>());
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "NerdGraph request failed, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}
