//! Probe client: retried, time-bounded access to a [`BucketApi`].

use std::sync::Arc;
use std::time::Duration;
use sx_traits::BucketApi;
use sx_types::ExistenceResult;

use crate::retry::{Attempted, RetryConfig, with_retry};

/// Wraps a [`BucketApi`] with per-call timeouts and bounded retry.
///
/// Cheap to clone; all workers of a scan share one client.
#[derive(Clone)]
pub struct ProbeClient {
    api: Arc<dyn BucketApi>,
    retry: RetryConfig,
    call_timeout: Duration,
}

impl std::fmt::Debug for ProbeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeClient")
            .field("retry", &self.retry)
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}

impl ProbeClient {
    /// Create a probe client with default retry policy and a 30s call timeout.
    pub fn new(api: Arc<dyn BucketApi>) -> Self {
        Self {
            api,
            retry: RetryConfig::default(),
            call_timeout: Duration::from_secs(30),
        }
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// The retry policy in use.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// The per-attempt timeout in use.
    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Ask whether `bucket` exists and whether the caller may list it.
    pub async fn check_existence(&self, bucket: &str) -> Attempted<ExistenceResult> {
        with_retry(&self.retry, self.call_timeout, "head_bucket", bucket, || {
            self.api.head_bucket(bucket)
        })
        .await
    }

    /// Fetch up to `max_keys` object keys from `bucket`.
    pub async fn list_objects(&self, bucket: &str, max_keys: usize) -> Attempted<Vec<String>> {
        let mut attempted = with_retry(
            &self.retry,
            self.call_timeout,
            "list_objects",
            bucket,
            || self.api.list_objects(bucket, max_keys),
        )
        .await;

        if let Ok(keys) = &mut attempted.result {
            keys.truncate(max_keys);
        }
        attempted
    }
}
