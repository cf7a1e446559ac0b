//! Retry with exponential back-off and jitter for the published-ratings client.
//!
//! Only transient failures are retried: connection problems, timeouts and
//! 5xx answers. A missing member or a malformed body is final.

use std::future::Future;
use std::time::Duration;

use crate::error::ApiError;

/// Upper bound on a single back-off sleep, before jitter.
const MAX_DELAY_MS: u64 = 30_000;

/// `true` for errors worth another attempt.
pub(crate) fn is_retriable(err: &ApiError) -> bool {
    match err {
        ApiError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ApiError::UnexpectedStatus { status, .. } => *status >= 500,
        ApiError::NotFound { .. }
        | ApiError::Deserialize { .. }
        | ApiError::InvalidBaseUrl { .. } => false,
    }
}

/// Un-jittered delay before retry number `retry` (1-based):
/// `base_ms * 2^(retry - 1)`, capped at [`MAX_DELAY_MS`].
pub(crate) fn backoff_delay_ms(retry: u32, base_ms: u64) -> u64 {
    let exponent = retry.saturating_sub(1).min(10);
    base_ms.saturating_mul(1u64 << exponent).min(MAX_DELAY_MS)
}

/// Scales `delay_ms` by a random factor in `[0.75, 1.25)`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn jitter(delay_ms: u64) -> u64 {
    (delay_ms as f64 * rand::random_range(0.75..1.25)) as u64
}

/// Runs `operation`, retrying transient failures up to `max_retries` times.
///
/// With `backoff_base_ms = 500` the sleeps are roughly 500 ms, 1 s, 2 s, ...
/// each with ±25 % jitter.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut retries = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retries >= max_retries || !is_retriable(&err) {
            return Err(err);
        }
        retries += 1;

        let delay_ms = jitter(backoff_delay_ms(retries, backoff_base_ms));
        tracing::warn!(
            retry = retries,
            max_retries,
            delay_ms,
            error = %err,
            "ratings API request failed, retrying"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
