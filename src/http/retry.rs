//! Retry policy with exponential backoff and jitter
//!
//! Rate-limit errors carrying a server hint bypass the computed backoff
//! entirely. Jitter is additive only, so a delay never drops below the
//! exponential base; the `max_delay` cap is applied after jitter.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

use crate::config::RetryConfig;
use crate::error::GorgiasError;

/// Fraction of the exponential term used as the jitter upper bound
const JITTER_FACTOR: f64 = 0.3;

/// Decide whether an error is worth another attempt
pub fn should_retry(error: &GorgiasError, config: &RetryConfig, attempt: u32) -> bool {
    if attempt >= config.max_attempts {
        return false;
    }

    // Rate limits are always retryable, whatever the configured status set.
    if matches!(error, GorgiasError::RateLimited { .. }) {
        return true;
    }

    if let Some(status) = error.status() {
        return config.retryable_statuses.contains(&status);
    }

    matches!(error, GorgiasError::Network { .. })
}

/// Compute the delay before the next attempt. `attempt` starts at 1.
pub fn calculate_backoff(attempt: u32, config: &RetryConfig, error: &GorgiasError) -> Duration {
    // A server-supplied Retry-After hint takes absolute precedence.
    if let GorgiasError::RateLimited {
        retry_after: Some(hint),
        ..
    } = error
    {
        return (*hint).min(config.max_delay);
    }

    let exponential = config
        .base_delay
        .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)));
    let jitter = exponential.mul_f64(rand::rng().random_range(0.0..JITTER_FACTOR));
    exponential.saturating_add(jitter).min(config.max_delay)
}

/// Run `operation` up to `config.max_attempts` times.
///
/// Non-retryable errors propagate immediately; when attempts are exhausted
/// the last error is returned unchanged so callers can still match on its
/// kind.
pub async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    trace_id: Option<&str>,
    mut operation: F,
) -> Result<T, GorgiasError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GorgiasError>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if !should_retry(&error, config, attempt) {
                    return Err(error);
                }

                let delay = calculate_backoff(attempt, config, &error);
                tracing::debug!(
                    attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error_code = error.code(),
                    trace_id = trace_id.unwrap_or_default(),
                    "retrying request"
                );
                sleep(delay).await;
            }
        }
    }
}
