//! Configuration types for a scan run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use sx_probe::RetryConfig;

/// Default number of concurrent workers.
pub const DEFAULT_THREAD_COUNT: usize = 20;

/// Default number of object keys sampled from a listable bucket.
pub const DEFAULT_MAX_KEYS: usize = 10;

/// Largest page ListObjectsV2 will return.
pub const MAX_KEYS_LIMIT: usize = 1000;

/// Resolved parameters of one scan run.
///
/// Built once before the pool starts and shared read-only by every worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// AWS region the probes are scoped to
    pub region: String,

    /// Number of concurrent workers
    pub thread_count: usize,

    /// Whether to sample object keys from listable buckets
    pub list_objects: bool,

    /// Size of the listing sample
    pub max_keys: usize,

    /// Retry policy for transient remote failures
    pub retry: RetryConfig,

    /// Upper bound for a single remote call
    #[serde(with = "duration_secs")]
    pub call_timeout: Duration,

    /// Where the final report is written, if anywhere
    pub output_path: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            thread_count: DEFAULT_THREAD_COUNT,
            list_objects: false,
            max_keys: DEFAULT_MAX_KEYS,
            retry: RetryConfig::default(),
            call_timeout: Duration::from_secs(30),
            output_path: None,
        }
    }
}

impl ScanConfig {
    /// Create a new scan configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the number of concurrent workers.
    pub fn with_thread_count(mut self, count: usize) -> Self {
        self.thread_count = count;
        self
    }

    /// Enable or disable object listing for accessible buckets.
    pub fn with_list_objects(mut self, list_objects: bool) -> Self {
        self.list_objects = list_objects;
        self
    }

    /// Set the listing sample size.
    pub fn with_max_keys(mut self, max_keys: usize) -> Self {
        self.max_keys = max_keys;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the per-call timeout.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Set the report output path.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_region(&self.region) {
            return Err(format!("'{}' is not a valid AWS region", self.region));
        }
        if self.thread_count == 0 {
            return Err("thread_count must be at least 1".to_string());
        }
        if !(1..=MAX_KEYS_LIMIT).contains(&self.max_keys) {
            return Err(format!("max_keys must be in 1..={MAX_KEYS_LIMIT}"));
        }
        if self.call_timeout.is_zero() {
            return Err("call_timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Check the shape of an AWS region identifier, e.g. `us-west-2` or
/// `us-gov-east-1`.
pub fn is_valid_region(region: &str) -> bool {
    let parts: Vec<&str> = region.split('-').collect();
    if parts.len() < 3 {
        return false;
    }
    let well_formed = parts.iter().all(|part| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    });
    let numbered = parts
        .last()
        .is_some_and(|last| last.chars().all(|c| c.is_ascii_digit()));

    well_formed && numbered
}

/// Serde helper for Duration serialization as whole seconds.
mod duration_secs {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
