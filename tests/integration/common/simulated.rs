//! Simulated bucket service for deterministic end-to-end scans.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use sx_error::{ProbeError, Result};
use sx_scanner::StatusOutput;
use sx_traits::BucketApi;
use sx_types::{ExistenceResult, ProbeOutcome};

/// Scripted state of one bucket name.
#[derive(Debug, Clone)]
pub enum Bucket {
    /// Exists and is listable, holding the given keys
    Open(Vec<String>),
    /// Exists, access denied
    Locked,
    /// Always answers SlowDown
    Throttling,
    /// Throttles for the first `n` calls, then is open and empty
    ThrottlingFor(usize),
    /// Hangs longer than any sane timeout
    Hanging,
    /// Rejects the caller's credentials
    RejectingCredentials,
}

/// In-memory S3 stand-in. Unknown names do not exist.
#[derive(Default)]
pub struct SimulatedS3 {
    buckets: HashMap<String, Bucket>,
    latency: Duration,
    head_calls: Mutex<HashMap<String, usize>>,
    list_calls: AtomicUsize,
}

impl SimulatedS3 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(mut self, name: &str, bucket: Bucket) -> Self {
        self.buckets.insert(name.to_string(), bucket);
        self
    }

    /// Delay every call, so workers genuinely interleave.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn head_calls(&self, bucket: &str) -> usize {
        self.head_calls.lock().get(bucket).copied().unwrap_or(0)
    }

    pub fn total_head_calls(&self) -> usize {
        self.head_calls.lock().values().sum()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BucketApi for SimulatedS3 {
    async fn head_bucket(&self, bucket: &str) -> std::result::Result<ExistenceResult, ProbeError> {
        let call = {
            let mut calls = self.head_calls.lock();
            let count = calls.entry(bucket.to_string()).or_default();
            *count += 1;
            *count
        };
        tokio::time::sleep(self.latency).await;

        match self.buckets.get(bucket) {
            None => Ok(ExistenceResult::NotFound),
            Some(Bucket::Open(_)) => Ok(ExistenceResult::Accessible),
            Some(Bucket::Locked) => Ok(ExistenceResult::Forbidden),
            Some(Bucket::Throttling) => Err(ProbeError::Throttled("SlowDown".to_string())),
            Some(Bucket::ThrottlingFor(n)) if call <= *n => {
                Err(ProbeError::Throttled("SlowDown".to_string()))
            }
            Some(Bucket::ThrottlingFor(_)) => Ok(ExistenceResult::Accessible),
            Some(Bucket::Hanging) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(ExistenceResult::Accessible)
            }
            Some(Bucket::RejectingCredentials) => {
                Err(ProbeError::Auth("InvalidAccessKeyId".to_string()))
            }
        }
    }

    async fn list_objects(
        &self,
        bucket: &str,
        max_keys: usize,
    ) -> std::result::Result<Vec<String>, ProbeError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;

        match self.buckets.get(bucket) {
            Some(Bucket::Open(keys)) => Ok(keys.iter().take(max_keys).cloned().collect()),
            _ => Err(ProbeError::service("AccessDenied", "Access Denied")),
        }
    }
}

/// Status output that records every emitted outcome.
#[derive(Default)]
pub struct CollectingOutput {
    outcomes: Mutex<Vec<ProbeOutcome>>,
}

impl CollectingOutput {
    pub fn outcomes(&self) -> Vec<ProbeOutcome> {
        self.outcomes.lock().clone()
    }
}

#[async_trait]
impl StatusOutput for CollectingOutput {
    async fn emit(&self, outcome: &ProbeOutcome) -> Result<()> {
        self.outcomes.lock().push(outcome.clone());
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Keys `prefix/0` .. `prefix/{count-1}`.
pub fn keys(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}/{i}")).collect()
}
