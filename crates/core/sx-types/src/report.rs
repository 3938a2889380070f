//! Scan report and counters.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{ProbeOutcome, ProbeStatus};

/// Running counters for a scan.
///
/// Updated in outcome arrival order, so mid-run values are only meaningful
/// for progress display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCounters {
    /// Candidates with a recorded outcome
    pub checked: u64,

    /// Buckets that exist and are listable
    pub accessible: u64,

    /// Buckets that exist but deny the caller
    pub forbidden: u64,

    /// Names with no bucket
    pub not_found: u64,

    /// Candidates that ended in an Error outcome
    pub errored: u64,
}

impl ScanCounters {
    /// Count one outcome.
    pub fn record(&mut self, status: ProbeStatus) {
        self.checked += 1;
        match status {
            ProbeStatus::ExistsAccessible => self.accessible += 1,
            ProbeStatus::ExistsForbidden => self.forbidden += 1,
            ProbeStatus::NotFound => self.not_found += 1,
            ProbeStatus::Error => self.errored += 1,
        }
    }

    /// Buckets known to exist, accessible or not.
    pub fn existing(&self) -> u64 {
        self.accessible + self.forbidden
    }
}

/// The finalized result of a scan run.
///
/// Outcomes are in original wordlist order. A report is frozen once built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    /// When the scan started
    pub started_at: Option<DateTime<Utc>>,

    /// When the scan was finalized
    pub completed_at: Option<DateTime<Utc>>,

    /// One outcome per dispatched candidate, in wordlist order
    pub outcomes: Vec<ProbeOutcome>,

    /// Run-level counters
    pub counters: ScanCounters,

    /// Candidates never dispatched because the run was aborted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unprocessed: Vec<String>,

    /// Why the run was aborted, if it was
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

impl ScanReport {
    /// Whether every candidate was probed.
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none() && self.unprocessed.is_empty()
    }

    /// Get the duration of the scan run.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Calculate the throughput in candidates per second.
    pub fn candidates_per_second(&self) -> Option<f64> {
        self.duration().map(|d| {
            let secs = d.num_milliseconds() as f64 / 1000.0;
            if secs > 0.0 {
                self.counters.checked as f64 / secs
            } else {
                0.0
            }
        })
    }

    /// Outcomes with the given status, in wordlist order.
    pub fn with_status(&self, status: ProbeStatus) -> impl Iterator<Item = &ProbeOutcome> {
        self.outcomes.iter().filter(move |o| o.status == status)
    }
}
