//! S3 session setup and the SDK-backed bucket API.
//!
//! - Client configuration with profile, region and LocalStack support
//! - HeadBucket / ListObjectsV2 response classification

mod api;
mod client;

pub use api::S3BucketApi;
pub use client::{S3Config, create_s3_client, load_session};
