//! Scans against LocalStack's S3 API.
//!
//! LocalStack does not enforce bucket policies, so these cover the
//! accessible and not-found paths plus listing against the real SDK.

use crate::common::LocalStackTestContext;
use crate::common::localstack::LOCALSTACK_KEY;
use std::sync::Arc;
use std::time::Duration;
use sx_probe::{ProbeClient, RetryConfig, S3BucketApi, S3Config, create_s3_client};
use sx_scanner::{ScanConfig, Scanner};
use sx_types::{ExistenceResult, ProbeStatus};

async fn probe_client(ctx: &LocalStackTestContext) -> ProbeClient {
    let s3_config = S3Config::new(&ctx.region)
        .with_endpoint(&ctx.endpoint)
        .with_credentials(LOCALSTACK_KEY, LOCALSTACK_KEY)
        .with_timeout(10);
    let client = create_s3_client(&s3_config).await.unwrap();

    ProbeClient::new(Arc::new(S3BucketApi::new(client)))
        .with_retry(RetryConfig::new().with_max_retries(1))
        .with_call_timeout(Duration::from_secs(10))
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_head_bucket_distinguishes_existing_and_missing() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "sx-it-head-bucket";
    ctx.create_bucket(bucket).await.unwrap();
    let client = probe_client(&ctx).await;

    let existing = client.check_existence(bucket).await;
    assert_eq!(existing.result, Ok(ExistenceResult::Accessible));

    let missing = client.check_existence("sx-it-definitely-missing-0001").await;
    assert_eq!(missing.result, Ok(ExistenceResult::NotFound));
    assert_eq!(missing.attempts, 1);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_scan_lists_capped_sample() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "sx-it-listing-bucket";
    ctx.create_bucket(bucket).await.unwrap();
    ctx.upload_objects(bucket, "data/", 12).await.unwrap();

    let config = ScanConfig::new()
        .with_region(&ctx.region)
        .with_thread_count(2)
        .with_list_objects(true)
        .with_max_keys(5);
    let scanner = Scanner::new(config, probe_client(&ctx).await);

    let report = scanner
        .scan([bucket, "sx-it-definitely-missing-0002"])
        .await
        .unwrap();

    assert_eq!(report.outcomes[0].status, ProbeStatus::ExistsAccessible);
    assert_eq!(report.outcomes[0].listed_objects.len(), 5);
    assert!(report.outcomes[0]
        .listed_objects
        .iter()
        .all(|key| key.starts_with("data/")));
    assert_eq!(report.outcomes[1].status, ProbeStatus::NotFound);
    assert!(report.outcomes[1].listed_objects.is_empty());
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_invalid_bucket_name_is_reported_not_fatal() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let scanner = Scanner::new(ScanConfig::new(), probe_client(&ctx).await);
    let report = scanner.scan(["Not_A_Valid_Bucket!!", "sx-it-missing-0003"]).await.unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert!(report.is_complete());
    assert_eq!(report.outcomes[1].status, ProbeStatus::NotFound);
}
