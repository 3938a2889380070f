//! Result aggregation for scan runs.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt;
use sx_error::AggregatorError;
use sx_types::{Candidate, ProbeOutcome, ScanCounters, ScanReport};
use tracing::{debug, error};

/// Lifecycle of an aggregator.
///
/// Transitions only move forward one step at a time:
/// `Idle → Running → Draining → Finalized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorState {
    /// Created, no candidate dispatched yet
    Idle,
    /// Workers are active and outcomes are streaming in
    Running,
    /// All workers terminated, no more outcomes accepted
    Draining,
    /// Report built and frozen
    Finalized,
}

impl fmt::Display for AggregatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Draining => write!(f, "Draining"),
            Self::Finalized => write!(f, "Finalized"),
        }
    }
}

struct Inner {
    state: AggregatorState,
    names: Vec<String>,
    slots: Vec<Option<ProbeOutcome>>,
    counters: ScanCounters,
    started_at: Option<DateTime<Utc>>,
}

impl Inner {
    fn transition(
        &mut self,
        from: AggregatorState,
        to: AggregatorState,
    ) -> Result<(), AggregatorError> {
        if self.state != from {
            return Err(AggregatorError::InvalidTransition {
                from: self.state.to_string(),
                to: to.to_string(),
            });
        }
        debug!(from = %from, to = %to, "Aggregator transition");
        self.state = to;
        Ok(())
    }
}

/// Thread-safe sink for probe outcomes.
///
/// Outcomes may arrive from any worker in any order. Counters are updated on
/// arrival for live progress; the final report re-orders outcomes by
/// wordlist position.
pub struct ResultAggregator {
    inner: Mutex<Inner>,
}

impl ResultAggregator {
    /// Create an aggregator with one slot per candidate.
    pub fn new(candidates: &[Candidate]) -> Self {
        let mut names = vec![String::new(); candidates.len()];
        for candidate in candidates {
            if let Some(slot) = names.get_mut(candidate.index) {
                slot.clone_from(&candidate.name);
            }
        }

        Self {
            inner: Mutex::new(Inner {
                state: AggregatorState::Idle,
                slots: vec![None; names.len()],
                names,
                counters: ScanCounters::default(),
                started_at: None,
            }),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AggregatorState {
        self.inner.lock().state
    }

    /// Snapshot of the running counters.
    pub fn counters(&self) -> ScanCounters {
        self.inner.lock().counters
    }

    /// Move from Idle to Running as dispatch begins.
    pub fn start(&self) -> Result<(), AggregatorError> {
        let mut inner = self.inner.lock();
        inner.transition(AggregatorState::Idle, AggregatorState::Running)?;
        inner.started_at = Some(Utc::now());
        Ok(())
    }

    /// Record one outcome and return the updated counters.
    pub fn submit(&self, outcome: ProbeOutcome) -> Result<ScanCounters, AggregatorError> {
        let mut inner = self.inner.lock();

        if inner.state != AggregatorState::Running {
            let err = AggregatorError::NotAccepting {
                candidate: outcome.candidate,
                state: inner.state.to_string(),
            };
            error!(error = %err, "Rejected outcome");
            return Err(err);
        }

        let len = inner.slots.len();
        let index = outcome.index;
        let slot = inner
            .slots
            .get_mut(index)
            .ok_or(AggregatorError::OutOfRange { index, len })?;
        if slot.is_some() {
            return Err(AggregatorError::Duplicate {
                index,
                candidate: outcome.candidate,
            });
        }

        let status = outcome.status;
        *slot = Some(outcome);
        inner.counters.record(status);
        Ok(inner.counters)
    }

    /// Move from Running to Draining once every worker has terminated.
    pub fn begin_drain(&self) -> Result<(), AggregatorError> {
        self.inner
            .lock()
            .transition(AggregatorState::Running, AggregatorState::Draining)
    }

    /// Move from Draining to Finalized and build the report.
    ///
    /// `undispatched` are candidates that never left the task queue; they are
    /// listed separately instead of receiving an outcome. Any other candidate
    /// without an outcome is recorded as an Error so nothing is lost.
    pub fn finalize(
        &self,
        undispatched: &[Candidate],
        aborted: Option<String>,
    ) -> Result<ScanReport, AggregatorError> {
        let mut inner = self.inner.lock();
        inner.transition(AggregatorState::Draining, AggregatorState::Finalized)?;

        let skipped: HashSet<usize> = undispatched.iter().map(|c| c.index).collect();
        let slots = std::mem::take(&mut inner.slots);
        let names = std::mem::take(&mut inner.names);
        let mut outcomes = Vec::with_capacity(slots.len());
        let mut unprocessed = Vec::new();

        for (index, (slot, name)) in slots.into_iter().zip(names).enumerate() {
            match slot {
                Some(outcome) => outcomes.push(outcome),
                None if skipped.contains(&index) => unprocessed.push(name),
                None => {
                    error!(index, candidate = %name, "Candidate finished without an outcome");
                    let candidate = Candidate::new(index, name);
                    inner.counters.record(sx_types::ProbeStatus::Error);
                    outcomes.push(ProbeOutcome::error(
                        &candidate,
                        "no outcome recorded for candidate",
                        0,
                    ));
                }
            }
        }

        Ok(ScanReport {
            started_at: inner.started_at,
            completed_at: Some(Utc::now()),
            outcomes,
            counters: inner.counters,
            unprocessed,
            aborted,
        })
    }
}
