//! Caller-side retry with exponential backoff
//!
//! The runner never retries on its own. This module repeats the whole
//! [`RequestRunner::complete_with`] contract instead, so every attempt is an
//! independent call with its own timeout:
//! - only retryable kinds are repeated (timeouts, transport failures, 408/429/5xx)
//! - delays grow by `backoff_multiplier`, capped at `max_delay`, with up to 25% jitter
//! - the last error is returned unchanged

use crate::config::{Configuration, ProviderSlot};
use crate::core_types::{Message, RequestOptions, Response};
use crate::error::CallResult;
use crate::logging::{log_debug, log_warn};
use crate::providers::ChatTransport;
use crate::runner::RequestRunner;

use std::time::Duration;
use tokio::time::sleep;

/// Retry policy configuration for repeated calls
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of calls, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3, // first call + 2 retries
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one call.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (1-based), without jitter.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1) as i32;
        let base = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        Duration::from_secs_f64(base.min(self.max_delay.as_secs_f64()).max(0.0))
    }

    fn jittered_delay(&self, retry: u32) -> Duration {
        let delay = self.delay_for(retry);
        delay + delay.mul_f64(fastrand::f64() * 0.25)
    }
}

/// Call `runner.complete_with` until it succeeds, fails with a
/// non-retryable error, or `policy.max_attempts` calls have been made.
pub async fn complete_with_retry<T: ChatTransport>(
    runner: &RequestRunner<T>,
    config: &Configuration,
    slot: ProviderSlot,
    messages: &[Message],
    options: &RequestOptions,
    policy: &RetryPolicy,
) -> CallResult<Response> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match runner.complete_with(config, slot, messages, options).await {
            Ok(response) => {
                if attempt > 1 {
                    log_debug!(attempt = attempt, "LLM request succeeded after retry");
                }
                return Ok(response);
            }
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                let delay = policy.jittered_delay(attempt);
                log_warn!(
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Retryable LLM error, calling again"
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
