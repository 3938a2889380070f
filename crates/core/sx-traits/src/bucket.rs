//! Bucket API trait.

use async_trait::async_trait;
use std::sync::Arc;
use sx_error::ProbeError;
use sx_types::ExistenceResult;

/// Authenticated operations against the storage service.
///
/// Each method performs exactly one remote call and classifies its
/// response. Retries, timeouts and backoff are layered on top by the probe
/// client, so implementations must not retry on their own.
///
/// # Implementations
///
/// - S3: HeadBucket / ListObjectsV2 through the AWS SDK
/// - Simulated remotes in tests
#[async_trait]
pub trait BucketApi: Send + Sync {
    /// Asks whether `bucket` exists and whether the caller may access it.
    ///
    /// Permission-denied and not-found are answers, returned as
    /// [`ExistenceResult`] variants. Only calls that produced no answer
    /// return an error.
    async fn head_bucket(&self, bucket: &str) -> Result<ExistenceResult, ProbeError>;

    /// Lists at most `max_keys` object keys from `bucket`, in service order.
    ///
    /// This is a single page, not a full paginated listing.
    async fn list_objects(&self, bucket: &str, max_keys: usize) -> Result<Vec<String>, ProbeError>;
}

#[async_trait]
impl<T: BucketApi + ?Sized> BucketApi for Arc<T> {
    async fn head_bucket(&self, bucket: &str) -> Result<ExistenceResult, ProbeError> {
        (**self).head_bucket(bucket).await
    }

    async fn list_objects(&self, bucket: &str, max_keys: usize) -> Result<Vec<String>, ProbeError> {
        (**self).list_objects(bucket, max_keys).await
    }
}
