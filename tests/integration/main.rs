//! Integration tests for s3xist.
//!
//! `scan_test` drives complete scans against a simulated remote and
//! `s3_api_test` runs the SDK client against a local HTTP endpoint; both
//! always run. `localstack_test` talks to a real S3 API and is marked
//! `#[ignore]`.
//!
//! ## Running LocalStack Tests
//!
//! 1. Start LocalStack:
//!    ```bash
//!    docker run -d -p 4566:4566 localstack/localstack
//!    ```
//!
//! 2. Run the ignored tests:
//!    ```bash
//!    LOCALSTACK_ENDPOINT=http://localhost:4566 cargo test -p integration-tests -- --ignored
//!    ```

mod common;
mod localstack_test;
mod scan_test;
