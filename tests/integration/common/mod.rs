//! Common utilities for integration tests.
//!
//! Shared test infrastructure: a LocalStack client context, a simulated
//! bucket service with scripted per-bucket behavior, and a local HTTP
//! endpoint for driving the real SDK client.

pub mod localstack;
pub mod simulated;

pub use localstack::LocalStackTestContext;
pub use simulated::{Bucket, CollectingOutput, SimulatedS3, keys};
pub use stub_s3::{StubResponse, StubS3};
