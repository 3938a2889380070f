//! Retry logic for probe calls.
//!
//! Provides a per-attempt timeout and exponential backoff with jitter for
//! transient remote failures.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use sx_error::{ErrorCategory, ProbeError};
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

/// Backoff policy for throttled, timed-out and transiently failing calls.
///
/// Delays double from `initial_backoff_ms` and stop growing at
/// `max_backoff_ms`. Jitter adds up to a quarter of the delay so that many
/// workers throttled at once do not retry in lockstep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt; 0 disables retrying
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_backoff_ms: u64,
    /// Ceiling for any single delay
    pub max_backoff_ms: u64,
    /// Randomize delays upwards by up to 25%
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff_ms: 200,
            max_backoff_ms: 5_000,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_backoff_ms(mut self, initial_backoff_ms: u64) -> Self {
        self.initial_backoff_ms = initial_backoff_ms;
        self
    }

    pub fn with_max_backoff_ms(mut self, max_backoff_ms: u64) -> Self {
        self.max_backoff_ms = max_backoff_ms;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Total attempts including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry number `retry`, counting from 0.
    pub fn backoff_duration(&self, retry: u32) -> Duration {
        let delay_ms = 1u64
            .checked_shl(retry)
            .and_then(|factor| self.initial_backoff_ms.checked_mul(factor))
            .unwrap_or(u64::MAX)
            .min(self.max_backoff_ms);

        let spread = delay_ms / 4;
        if !self.jitter || spread == 0 {
            return Duration::from_millis(delay_ms);
        }
        Duration::from_millis(delay_ms.saturating_add(rand::rng().random_range(0..=spread)))
    }
}

/// Result of a retried operation together with the number of attempts made.
#[derive(Debug)]
pub struct Attempted<T> {
    /// Final result
    pub result: Result<T, ProbeError>,
    /// Attempts made, at least 1
    pub attempts: u32,
}

/// Execute a probe operation with a per-attempt timeout and retry logic.
///
/// Transient errors (throttling, timeouts, transport failures) are retried
/// with backoff. Permanent and fatal errors are returned immediately. When
/// retries run out the last transient error is wrapped in
/// [`ProbeError::Exhausted`].
///
/// # Arguments
///
/// * `config` - Retry configuration
/// * `call_timeout` - Upper bound for a single attempt
/// * `operation_name` - Name of the operation for logging
/// * `bucket` - Bucket being probed, for logging
/// * `operation` - The async operation to execute
pub async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    call_timeout: Duration,
    operation_name: &str,
    bucket: &str,
    mut operation: F,
) -> Attempted<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProbeError>>,
{
    let max_attempts = config.max_attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;

        let result = match timeout(call_timeout, operation()).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(call_timeout.as_millis() as u64)),
        };

        let error = match result {
            Ok(value) => {
                return Attempted {
                    result: Ok(value),
                    attempts: attempt,
                };
            }
            Err(e) => e,
        };

        if error.category() != ErrorCategory::Transient {
            debug!(
                operation = operation_name,
                bucket,
                attempt,
                error = %error,
                "Non-retryable error"
            );
            return Attempted {
                result: Err(error),
                attempts: attempt,
            };
        }

        if attempt >= max_attempts {
            warn!(
                operation = operation_name,
                bucket,
                attempts = attempt,
                error = %error,
                "Retries exhausted"
            );
            return Attempted {
                result: Err(ProbeError::Exhausted {
                    attempts: attempt,
                    last: Box::new(error),
                }),
                attempts: attempt,
            };
        }

        let backoff = config.backoff_duration(attempt - 1);
        warn!(
            operation = operation_name,
            bucket,
            attempt,
            error = %error,
            backoff_ms = backoff.as_millis() as u64,
            "Retryable error, backing off"
        );
        sleep(backoff).await;
    }
}
