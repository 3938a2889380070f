//! Worker pool orchestration.

use crate::aggregator::ResultAggregator;
use crate::config::ScanConfig;
use crate::output::{NullOutput, StatusOutput};
use crate::queue::TaskQueue;
use futures::FutureExt;
use parking_lot::Mutex;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use sx_error::{ErrorCategory, ProbeError, Result, ScanError};
use sx_probe::ProbeClient;
use sx_types::{Candidate, ExistenceResult, ProbeOutcome, ScanReport};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Abort reason recorded when the run is cancelled from outside.
pub const INTERRUPTED: &str = "scan interrupted";

/// Bounded pool of workers probing candidates concurrently.
///
/// The scanner owns no per-run state; every call to [`Scanner::run`] gets its
/// own queue and aggregator.
pub struct Scanner {
    /// Read-only run parameters shared by all workers
    config: Arc<ScanConfig>,

    /// Retried access to the storage service
    client: ProbeClient,

    /// Live per-candidate status sink
    output: Arc<dyn StatusOutput>,

    /// Cancelled on Ctrl-C or a fatal authentication failure
    cancel: CancellationToken,
}

/// Shared between workers of one run.
struct RunContext {
    config: Arc<ScanConfig>,
    client: ProbeClient,
    output: Arc<dyn StatusOutput>,
    queue: Arc<TaskQueue>,
    aggregator: Arc<ResultAggregator>,
    cancel: CancellationToken,
    abort_reason: Mutex<Option<String>>,
}

impl RunContext {
    fn abort(&self, reason: String) {
        let mut slot = self.abort_reason.lock();
        if slot.is_none() {
            error!(reason = %reason, remaining = self.queue.remaining(), "Aborting scan");
            *slot = Some(reason);
        }
        self.cancel.cancel();
    }
}

/// What probing one candidate produced.
struct Probed {
    outcome: ProbeOutcome,
    fatal: Option<ProbeError>,
}

impl Scanner {
    /// Create a scanner with no live output.
    ///
    /// The retry policy and call timeout of `config` are applied to `client`.
    pub fn new(config: ScanConfig, client: ProbeClient) -> Self {
        let client = client
            .with_retry(config.retry.clone())
            .with_call_timeout(config.call_timeout);
        Self {
            config: Arc::new(config),
            client,
            output: Arc::new(NullOutput),
            cancel: CancellationToken::new(),
        }
    }

    /// Set the live status sink.
    pub fn with_output(mut self, output: Arc<dyn StatusOutput>) -> Self {
        self.output = output;
        self
    }

    /// Use an externally controlled cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The token that stops this scanner.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// The run configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan a list of names in wordlist order.
    pub async fn scan<I, S>(&self, names: I) -> Result<ScanReport>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let candidates = Candidate::from_names(names);
        let aggregator = Arc::new(ResultAggregator::new(&candidates));
        let queue = Arc::new(TaskQueue::new(candidates));
        self.run(queue, aggregator).await
    }

    /// Drain `queue` with the worker pool, recording into `aggregator`.
    ///
    /// Returns the finalized report. A fatal error or cancellation still
    /// yields a report; its `aborted` field carries the reason and the
    /// candidates never dispatched are listed in `unprocessed`.
    pub async fn run(
        &self,
        queue: Arc<TaskQueue>,
        aggregator: Arc<ResultAggregator>,
    ) -> Result<ScanReport> {
        self.config.validate().map_err(ScanError::Config)?;

        let worker_count = self.config.thread_count.min(queue.len());
        info!(
            candidates = queue.len(),
            workers = worker_count,
            region = %self.config.region,
            list_objects = self.config.list_objects,
            max_retries = self.client.retry_config().max_retries,
            call_timeout_ms = self.client.call_timeout().as_millis() as u64,
            "Starting scan"
        );

        let ctx = Arc::new(RunContext {
            config: self.config.clone(),
            client: self.client.clone(),
            output: self.output.clone(),
            queue: queue.clone(),
            aggregator: aggregator.clone(),
            cancel: self.cancel.clone(),
            abort_reason: Mutex::new(None),
        });

        aggregator.start()?;

        let handles: Vec<JoinHandle<()>> = (0..worker_count)
            .map(|worker_id| {
                let ctx = ctx.clone();
                tokio::spawn(async move { worker_loop(worker_id, ctx).await })
            })
            .collect();

        for (worker_id, result) in futures::future::join_all(handles)
            .await
            .into_iter()
            .enumerate()
        {
            if let Err(e) = result {
                error!(worker = worker_id, error = %e, "Worker task failed");
            }
        }

        if let Err(e) = self.output.flush().await {
            warn!(error = %e, "Failed to flush status output");
        }

        let undispatched = queue.close();
        let aborted = ctx
            .abort_reason
            .lock()
            .take()
            .or_else(|| self.cancel.is_cancelled().then(|| INTERRUPTED.to_string()));

        aggregator.begin_drain()?;
        let report = aggregator.finalize(&undispatched, aborted)?;

        info!(
            checked = report.counters.checked,
            accessible = report.counters.accessible,
            forbidden = report.counters.forbidden,
            not_found = report.counters.not_found,
            errors = report.counters.errored,
            unprocessed = report.unprocessed.len(),
            "Scan completed"
        );

        Ok(report)
    }
}

/// Take candidates until the queue is exhausted or the run is cancelled.
async fn worker_loop(worker_id: usize, ctx: Arc<RunContext>) {
    debug!(worker = worker_id, "Worker started");
    let mut processed = 0u64;

    loop {
        if ctx.cancel.is_cancelled() {
            debug!(worker = worker_id, "Cancellation observed, stopping");
            break;
        }

        let Some(candidate) = ctx.queue.take() else {
            break;
        };

        let probed = AssertUnwindSafe(probe_candidate(&ctx.client, &ctx.config, &candidate))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                error!(
                    worker = worker_id,
                    candidate = %candidate,
                    panic = %message,
                    "Probe panicked"
                );
                Probed {
                    outcome: ProbeOutcome::error(
                        &candidate,
                        format!("internal error: {message}"),
                        0,
                    ),
                    fatal: None,
                }
            });

        if let Some(fatal) = &probed.fatal {
            ctx.abort(format!("authentication failed while probing '{candidate}': {fatal}"));
        }

        if let Err(e) = ctx.output.emit(&probed.outcome).await {
            warn!(candidate = %candidate, error = %e, "Failed to emit status");
        }
        if let Err(e) = ctx.aggregator.submit(probed.outcome) {
            error!(candidate = %candidate, error = %e, "Outcome not recorded");
        }
        processed += 1;
    }

    debug!(worker = worker_id, processed, "Worker finished");
}

/// Probe one candidate and, when allowed, sample its objects.
async fn probe_candidate(client: &ProbeClient, config: &ScanConfig, candidate: &Candidate) -> Probed {
    let existence = client.check_existence(&candidate.name).await;
    let attempts = existence.attempts;

    let result = match existence.result {
        Ok(result) => result,
        Err(e) => {
            if e.category() != ErrorCategory::Fatal {
                warn!(candidate = %candidate, attempts, error = %e, "Probe failed");
            }
            return Probed {
                outcome: ProbeOutcome::error(candidate, e.to_string(), attempts),
                fatal: fatal(e),
            };
        }
    };

    let outcome = ProbeOutcome::from_existence(candidate, result, attempts);
    if result != ExistenceResult::Accessible || !config.list_objects {
        return Probed {
            outcome,
            fatal: None,
        };
    }

    let listing = client.list_objects(&candidate.name, config.max_keys).await;
    match listing.result {
        Ok(keys) => {
            debug!(candidate = %candidate, keys = keys.len(), "Listed objects");
            Probed {
                outcome: outcome.with_listing(keys),
                fatal: None,
            }
        }
        Err(e) => {
            warn!(candidate = %candidate, error = %e, "Listing failed");
            Probed {
                outcome: outcome.with_detail(format!("listing failed: {e}")),
                fatal: fatal(e),
            }
        }
    }
}

fn fatal(error: ProbeError) -> Option<ProbeError> {
    (error.category() == ErrorCategory::Fatal).then_some(error)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
