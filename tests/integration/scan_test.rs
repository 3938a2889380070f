//! End-to-end scans against a simulated bucket service.
//!
//! These exercise the full path: wordlist file, worker pool, probe client
//! retries, live output, aggregation and report rendering.

use crate::common::{Bucket, CollectingOutput, SimulatedS3, keys};
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use sx_probe::{ProbeClient, RetryConfig};
use sx_scanner::{
    INTERRUPTED, ReportFormat, ScanConfig, Scanner, load_wordlist, render, write_report,
};
use sx_types::{ProbeStatus, ScanReport};
use tokio_util::sync::CancellationToken;

fn scan_config() -> ScanConfig {
    ScanConfig::new()
        .with_retry(
            RetryConfig::new()
                .with_max_retries(2)
                .with_initial_backoff_ms(5)
                .with_jitter(false),
        )
        .with_call_timeout(Duration::from_secs(5))
}

fn statuses(report: &ScanReport) -> Vec<(&str, ProbeStatus)> {
    report
        .outcomes
        .iter()
        .map(|o| (o.candidate.as_str(), o.status))
        .collect()
}

#[tokio::test]
async fn test_scan_from_wordlist_file_writes_ordered_report() {
    let mut wordlist = tempfile::NamedTempFile::new().unwrap();
    writeln!(wordlist, "a-bucket\nmissing-name\n\n  forbidden-bucket  ").unwrap();
    let names = load_wordlist(wordlist.path()).unwrap();

    let api = Arc::new(
        SimulatedS3::new()
            .with_bucket("a-bucket", Bucket::Open(keys("logs", 3)))
            .with_bucket("forbidden-bucket", Bucket::Locked)
            .with_latency(Duration::from_millis(10)),
    );
    let config = scan_config().with_thread_count(2).with_list_objects(true);
    let output = Arc::new(CollectingOutput::default());

    let report = Scanner::new(config, ProbeClient::new(api.clone()))
        .with_output(output.clone())
        .scan(names)
        .await
        .unwrap();

    assert_eq!(
        statuses(&report),
        vec![
            ("a-bucket", ProbeStatus::ExistsAccessible),
            ("missing-name", ProbeStatus::NotFound),
            ("forbidden-bucket", ProbeStatus::ExistsForbidden),
        ]
    );
    assert_eq!(report.outcomes[0].listed_objects, keys("logs", 3));
    assert_eq!(api.list_calls(), 1);
    assert_eq!(output.outcomes().len(), 3);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("found.txt");
    write_report(&report, ReportFormat::Text, &path).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "EXISTS_ACCESSIBLE\ta-bucket\n  - logs/0\n  - logs/1\n  - logs/2\n\
         NOT_FOUND\tmissing-name\n\
         EXISTS_FORBIDDEN\tforbidden-bucket\n"
    );
}

#[tokio::test]
async fn test_persistent_throttling_becomes_error_for_that_name_only() {
    let api = Arc::new(
        SimulatedS3::new()
            .with_bucket("x", Bucket::Throttling)
            .with_bucket("open", Bucket::Open(Vec::new()))
            .with_bucket("locked", Bucket::Locked),
    );
    let config = scan_config().with_thread_count(4);

    let report = Scanner::new(config, ProbeClient::new(api.clone()))
        .scan(["open", "x", "locked", "nothing"])
        .await
        .unwrap();

    assert_eq!(
        statuses(&report),
        vec![
            ("open", ProbeStatus::ExistsAccessible),
            ("x", ProbeStatus::Error),
            ("locked", ProbeStatus::ExistsForbidden),
            ("nothing", ProbeStatus::NotFound),
        ]
    );
    let x = &report.outcomes[1];
    assert!(x.detail.as_deref().unwrap().contains("throttled"));
    assert_eq!(x.attempts, 3);
    assert_eq!(api.head_calls("x"), 3);
    assert!(report.is_complete());
}

#[tokio::test]
async fn test_transient_throttling_recovers() {
    let api = Arc::new(SimulatedS3::new().with_bucket("busy", Bucket::ThrottlingFor(2)));

    let report = Scanner::new(scan_config(), ProbeClient::new(api.clone()))
        .scan(["busy"])
        .await
        .unwrap();

    assert_eq!(report.outcomes[0].status, ProbeStatus::ExistsAccessible);
    assert_eq!(report.outcomes[0].attempts, 3);
    assert!(report.outcomes[0].detail.is_none());
}

#[tokio::test]
async fn test_hanging_call_times_out() {
    let api = Arc::new(SimulatedS3::new().with_bucket("slow", Bucket::Hanging));
    let config = ScanConfig::new()
        .with_retry(
            RetryConfig::new()
                .with_max_retries(1)
                .with_initial_backoff_ms(1)
                .with_jitter(false),
        )
        .with_call_timeout(Duration::from_millis(50));

    let report = Scanner::new(config, ProbeClient::new(api))
        .scan(["slow", "other"])
        .await
        .unwrap();

    let slow = &report.outcomes[0];
    assert_eq!(slow.status, ProbeStatus::Error);
    assert_eq!(slow.attempts, 2);
    assert!(slow.detail.as_deref().unwrap().contains("timed out after 50ms"));
    assert_eq!(report.outcomes[1].status, ProbeStatus::NotFound);
}

#[tokio::test]
async fn test_listing_sample_is_capped() {
    let api = Arc::new(SimulatedS3::new().with_bucket("big", Bucket::Open(keys("k", 50))));
    let config = scan_config().with_list_objects(true).with_max_keys(5);

    let report = Scanner::new(config, ProbeClient::new(api)).scan(["big"]).await.unwrap();
    assert_eq!(report.outcomes[0].listed_objects, keys("k", 5));
}

#[tokio::test]
async fn test_forbidden_and_missing_never_listed() {
    let api = Arc::new(
        SimulatedS3::new()
            .with_bucket("locked", Bucket::Locked)
            .with_latency(Duration::from_millis(2)),
    );
    let config = scan_config().with_thread_count(3).with_list_objects(true);

    let report = Scanner::new(config, ProbeClient::new(api.clone()))
        .scan(["locked", "gone-1", "gone-2"])
        .await
        .unwrap();

    assert!(report.outcomes.iter().all(|o| o.listed_objects.is_empty()));
    assert_eq!(api.list_calls(), 0);
}

#[tokio::test]
async fn test_large_wordlist_keeps_order_and_probes_each_name_once() {
    let mut api = SimulatedS3::new().with_latency(Duration::from_millis(1));
    for i in (0..500).step_by(7) {
        api = api.with_bucket(&format!("name-{i}"), Bucket::Locked);
    }
    let api = Arc::new(api);
    let names: Vec<String> = (0..500).map(|i| format!("name-{i}")).collect();
    let output = Arc::new(CollectingOutput::default());

    let report = Scanner::new(scan_config().with_thread_count(16), ProbeClient::new(api.clone()))
        .with_output(output.clone())
        .scan(names.clone())
        .await
        .unwrap();

    let reported: Vec<&str> = report.outcomes.iter().map(|o| o.candidate.as_str()).collect();
    assert_eq!(reported, names);
    assert_eq!(api.total_head_calls(), 500);
    assert_eq!(report.counters.forbidden, 72);
    assert_eq!(report.counters.not_found, 428);

    let emitted: HashSet<String> = output.outcomes().into_iter().map(|o| o.candidate).collect();
    assert_eq!(emitted.len(), 500);
}

#[tokio::test]
async fn test_rejected_credentials_abort_with_partial_report() {
    let api = Arc::new(
        SimulatedS3::new()
            .with_bucket("denied", Bucket::RejectingCredentials)
            .with_latency(Duration::from_millis(1)),
    );
    let config = scan_config().with_thread_count(1);

    let report = Scanner::new(config, ProbeClient::new(api.clone()))
        .scan(["one", "denied", "three", "four"])
        .await
        .unwrap();

    assert_eq!(
        statuses(&report),
        vec![("one", ProbeStatus::NotFound), ("denied", ProbeStatus::Error)]
    );
    assert_eq!(report.unprocessed, vec!["three", "four"]);
    assert!(report.aborted.is_some());
    assert_eq!(api.head_calls("denied"), 1);

    let json = render(&report, ReportFormat::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["unprocessed"], serde_json::json!(["three", "four"]));
    assert!(parsed["aborted"].as_str().unwrap().contains("InvalidAccessKeyId"));
}

#[tokio::test]
async fn test_external_cancellation_yields_consistent_partial_report() {
    let api = Arc::new(SimulatedS3::new().with_latency(Duration::from_millis(20)));
    let names: Vec<String> = (0..100).map(|i| format!("bucket-{i}")).collect();
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(60)).await;
        trigger.cancel();
    });

    let report = Scanner::new(scan_config().with_thread_count(2), ProbeClient::new(api.clone()))
        .with_cancellation(cancel)
        .scan(names)
        .await
        .unwrap();

    assert_eq!(report.aborted.as_deref(), Some(INTERRUPTED));
    assert!(!report.outcomes.is_empty());
    assert!(!report.unprocessed.is_empty());
    assert_eq!(report.outcomes.len() + report.unprocessed.len(), 100);
    assert_eq!(api.total_head_calls(), report.outcomes.len());

    // Processed names form a prefix of the wordlist; the rest are listed
    let first_unprocessed = report.outcomes.len();
    assert_eq!(report.unprocessed[0], format!("bucket-{first_unprocessed}"));
}

#[tokio::test]
async fn test_repeated_scans_produce_identical_reports() {
    let api = Arc::new(
        SimulatedS3::new()
            .with_bucket("a", Bucket::Open(keys("a", 20)))
            .with_bucket("b", Bucket::Locked)
            .with_bucket("c", Bucket::Throttling)
            .with_latency(Duration::from_millis(1)),
    );
    let names: Vec<String> = (0..30).map(|i| ["a", "b", "c", "d", "e"][i % 5].to_string()).collect();
    let config = scan_config()
        .with_thread_count(6)
        .with_list_objects(true)
        .with_max_keys(4);
    let scanner = Scanner::new(config, ProbeClient::new(api));

    let first = scanner.scan(names.clone()).await.unwrap();
    let second = scanner.scan(names).await.unwrap();

    assert_eq!(first.outcomes, second.outcomes);
    assert_eq!(
        render(&first, ReportFormat::Jsonl).unwrap(),
        render(&second, ReportFormat::Jsonl).unwrap()
    );
}
