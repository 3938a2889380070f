//! sx-probe - authenticated bucket probing for s3xist.
//!
//! This crate turns single remote calls into reliable answers:
//!
//! - S3 session setup from a named profile, resolved once at startup
//! - HeadBucket classification that keeps "forbidden" and "not found" apart
//! - Capped ListObjectsV2 sampling
//! - Per-call timeouts and exponential backoff with jitter for throttling
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sx_probe::{ProbeClient, RetryConfig, S3BucketApi, S3Config, create_s3_client};
//!
//! let s3_config = S3Config::new("us-west-2").with_profile("recon");
//! let client = create_s3_client(&s3_config).await?;
//!
//! let probe = ProbeClient::new(Arc::new(S3BucketApi::new(client)))
//!     .with_retry(RetryConfig::new().with_max_retries(2));
//!
//! let attempted = probe.check_existence("acme-backups").await;
//! println!("{:?} after {} attempts", attempted.result, attempted.attempts);
//! ```

pub mod client;
pub mod retry;
pub mod s3;

pub use client::ProbeClient;
pub use retry::{Attempted, RetryConfig, with_retry};
pub use s3::{S3BucketApi, S3Config, create_s3_client, load_session};
