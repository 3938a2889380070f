//! Probe outcome types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Candidate;

/// Answer of an authenticated existence probe.
///
/// Only definitive answers live here. A call that produced no answer
/// (throttling, timeout, unknown service error) is an error, not a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistenceResult {
    /// The bucket exists and the caller may list it (HeadBucket 200)
    Accessible,

    /// The bucket exists but the caller lacks permission (HeadBucket 403)
    Forbidden,

    /// No bucket with this name exists (HeadBucket 404)
    NotFound,
}

impl From<ExistenceResult> for ProbeStatus {
    fn from(result: ExistenceResult) -> Self {
        match result {
            ExistenceResult::Accessible => ProbeStatus::ExistsAccessible,
            ExistenceResult::Forbidden => ProbeStatus::ExistsForbidden,
            ExistenceResult::NotFound => ProbeStatus::NotFound,
        }
    }
}

/// Final classification of one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProbeStatus {
    /// Bucket exists and is listable by the caller
    ExistsAccessible,

    /// Bucket exists, caller is denied
    ExistsForbidden,

    /// Bucket does not exist
    NotFound,

    /// No definitive answer could be obtained
    Error,
}

impl ProbeStatus {
    /// Whether the bucket is known to exist.
    pub fn exists(&self) -> bool {
        matches!(self, Self::ExistsAccessible | Self::ExistsForbidden)
    }

    /// Stable label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExistsAccessible => "EXISTS_ACCESSIBLE",
            Self::ExistsForbidden => "EXISTS_FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of processing one candidate.
///
/// Created once by the worker that probed the candidate, then handed to the
/// aggregator and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Zero-based position of the candidate in the wordlist
    pub index: usize,

    /// The bucket name
    pub candidate: String,

    /// Classification
    pub status: ProbeStatus,

    /// Sample of object keys (only when listing was requested and permitted)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub listed_objects: Vec<String>,

    /// Human-readable diagnostic, e.g. the remote error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Number of existence probe attempts made (including retries)
    #[serde(default)]
    pub attempts: u32,
}

impl ProbeOutcome {
    /// Outcome carrying a definitive existence answer.
    pub fn from_existence(candidate: &Candidate, result: ExistenceResult, attempts: u32) -> Self {
        Self {
            index: candidate.index,
            candidate: candidate.name.clone(),
            status: result.into(),
            listed_objects: Vec::new(),
            detail: None,
            attempts,
        }
    }

    /// Error outcome with a diagnostic.
    pub fn error(candidate: &Candidate, detail: impl Into<String>, attempts: u32) -> Self {
        Self {
            index: candidate.index,
            candidate: candidate.name.clone(),
            status: ProbeStatus::Error,
            listed_objects: Vec::new(),
            detail: Some(detail.into()),
            attempts,
        }
    }

    /// Attach a listing sample.
    pub fn with_listing(mut self, keys: Vec<String>) -> Self {
        self.listed_objects = keys;
        self
    }

    /// Attach a diagnostic.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
