//! Main execution logic for the s3xist CLI.

use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;
use sx_error::ScanError;
use sx_probe::{ProbeClient, RetryConfig, S3BucketApi, S3Config, create_s3_client};
use sx_scanner::{
    ConsoleOutput, ResultAggregator, ScanConfig, Scanner, TaskQueue, load_wordlist, write_report,
};
use sx_types::{Candidate, ScanReport};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::args::Cli;
use crate::progress::ProgressReporter;

/// Exit code for invalid configuration or unusable credentials.
pub const EXIT_CONFIG: u8 = 2;

/// Exit code for a run that was aborted after starting.
pub const EXIT_ABORTED: u8 = 3;

/// Build the scan configuration from CLI arguments.
pub fn build_config(args: &Cli) -> std::result::Result<ScanConfig, ScanError> {
    let retry = RetryConfig::new()
        .with_max_retries(args.max_retries)
        .with_initial_backoff_ms(args.retry_backoff_ms);

    let mut config = ScanConfig::new()
        .with_region(&args.region)
        .with_thread_count(args.threads)
        .with_list_objects(args.list_objects)
        .with_max_keys(args.max_keys)
        .with_retry(retry)
        .with_call_timeout(Duration::from_secs(args.timeout_secs));

    if let Some(path) = &args.output {
        config = config.with_output_path(path);
    }

    config.validate().map_err(ScanError::Config)?;
    Ok(config)
}

/// Map a failed run to a process exit code.
///
/// Fatal errors (configuration, rejected credentials, local I/O) happen
/// before any candidate is probed.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ScanError>() {
        Some(e) if e.is_fatal() => EXIT_CONFIG,
        _ => 1,
    }
}

/// Execute a scan with the provided arguments.
pub async fn execute(args: Cli) -> Result<ScanReport> {
    let config = build_config(&args)?;
    let names = load_wordlist(&args.wordlist)?;

    info!(
        wordlist = %args.wordlist.display(),
        candidates = names.len(),
        profile = %args.profile,
        "Loaded wordlist"
    );

    let mut s3_config = S3Config::new(&args.region)
        .with_profile(&args.profile)
        .with_timeout(args.timeout_secs);
    if let Some(endpoint) = &args.endpoint {
        s3_config = s3_config.with_endpoint(endpoint);
    }
    let client = create_s3_client(&s3_config).await?;

    let probe = ProbeClient::new(Arc::new(S3BucketApi::new(client)));

    let color = !args.no_color && std::io::stdout().is_terminal();
    let console = ConsoleOutput::stdout()
        .with_color(color)
        .with_quiet(args.quiet);

    let candidates = Candidate::from_names(names);
    let total = candidates.len();
    let aggregator = Arc::new(ResultAggregator::new(&candidates));
    let queue = Arc::new(TaskQueue::new(candidates));

    let mut progress = ProgressReporter::new(args.progress, args.progress_interval);
    progress.start(aggregator.clone(), total);

    let scanner = Scanner::new(config, probe).with_output(Arc::new(console));
    let signal_task = tokio::spawn(cancel_on_ctrl_c(scanner.cancellation_token().clone()));
    let result = scanner.run(queue, aggregator.clone()).await;

    signal_task.abort();
    progress.stop(&aggregator.counters(), total).await;
    let report = result?;

    if let Some(path) = &scanner.config().output_path {
        write_report(&report, args.output_format.into(), path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
    }

    Ok(report)
}

/// Cancel the scan on the first Ctrl-C.
async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => warn!("Interrupt received, finishing in-flight probes"),
                Err(e) => {
                    warn!(error = %e, "Failed to listen for interrupt");
                    return;
                }
            }
            cancel.cancel();
        }
        _ = cancel.cancelled() => {}
    }
}
