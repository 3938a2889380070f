//! Progress reporting for s3xist.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};
use sx_cli_common::{format_duration, format_number};
use sx_scanner::ResultAggregator;
use sx_types::ScanCounters;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Periodic scan progress on stderr.
pub struct ProgressReporter {
    /// Whether progress reporting is enabled
    enabled: bool,
    /// Reporting interval
    interval: Duration,
    /// Stops the background task
    stop: CancellationToken,
    /// Handle to the background reporter task
    handle: Option<JoinHandle<()>>,
    /// Start time
    start_time: Instant,
}

impl ProgressReporter {
    /// Create a new progress reporter.
    pub fn new(enabled: bool, interval_secs: u64) -> Self {
        Self {
            enabled,
            interval: Duration::from_secs(interval_secs),
            stop: CancellationToken::new(),
            handle: None,
            start_time: Instant::now(),
        }
    }

    /// Start the background progress reporter.
    pub fn start(&mut self, aggregator: Arc<ResultAggregator>, total: usize) {
        if !self.enabled {
            return;
        }

        let stop = self.stop.clone();
        let interval = self.interval;
        let start_time = self.start_time;

        let handle = tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.tick().await; // Skip first immediate tick

            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    _ = interval_timer.tick() => {
                        let line = progress_line(&aggregator.counters(), total, start_time.elapsed());
                        let _ = writeln!(io::stderr(), "[Progress] {line}");
                    }
                }
            }
        });

        self.handle = Some(handle);
    }

    /// Stop the progress reporter and print the final line.
    pub async fn stop(mut self, counters: &ScanCounters, total: usize) {
        if !self.enabled {
            return;
        }

        self.stop.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }

        let line = progress_line(counters, total, self.start_time.elapsed());
        let _ = writeln!(io::stderr(), "[Progress] Complete: {line}");
    }
}

fn progress_line(counters: &ScanCounters, total: usize, elapsed: Duration) -> String {
    format!(
        "{}/{} checked, {} found, {} forbidden, {} errors ({} elapsed)",
        format_number(counters.checked),
        format_number(total as u64),
        format_number(counters.accessible),
        format_number(counters.forbidden),
        format_number(counters.errored),
        format_duration(elapsed)
    )
}
