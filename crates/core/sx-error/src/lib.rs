//! Error types and classification for s3xist.
//!
//! This crate provides:
//! - [`ScanError`] - Top-level error enum for a scan run
//! - [`ProbeError`] - Failures of a single remote call against the storage service
//! - [`AggregatorError`] - Result aggregator state machine violations
//! - [`ErrorCategory`] for retry/abort decision making

use thiserror::Error;

/// Top-level error type for s3xist.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Configuration errors (bad region, empty wordlist, invalid limits)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential profile could not be resolved or was rejected
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Remote call failure that escaped per-candidate handling
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Result aggregator misuse
    #[error("Aggregator error: {0}")]
    Aggregator(#[from] AggregatorError),

    /// Local I/O (wordlist, report file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScanError {
    /// Whether this error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Config(_) | Self::Auth(_) | Self::Io(_) => true,
            Self::Probe(e) => e.category() == ErrorCategory::Fatal,
            Self::Aggregator(_) | Self::Other(_) => false,
        }
    }
}

/// Failure of one remote call.
///
/// Permission-denied and not-found answers from the existence probe are not
/// errors; they are reported as `ExistenceResult` variants by the probe
/// client. Everything here is a call that produced no usable answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The service asked us to slow down (SlowDown, 429, 503)
    #[error("throttled: {0}")]
    Throttled(String),

    /// The call did not complete within the per-call timeout
    #[error("timed out after {0}ms")]
    Timeout(u64),

    /// Connection-level failure or a transient 5xx from the service
    #[error("transport failure: {0}")]
    Transport(String),

    /// Credentials were rejected or could not be resolved
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Any other service error, code and message preserved verbatim
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    /// Retries were exhausted on a transient failure
    #[error("{last} (gave up after {attempts} attempts)")]
    Exhausted { attempts: u32, last: Box<ProbeError> },
}

impl ProbeError {
    /// Build a service error from an error code and message.
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Classify this error for retry decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Throttled(_) | Self::Timeout(_) | Self::Transport(_) => ErrorCategory::Transient,
            Self::Auth(_) => ErrorCategory::Fatal,
            Self::Service { .. } | Self::Exhausted { .. } => ErrorCategory::Permanent,
        }
    }

    /// Whether the underlying failure was throttling, looking through
    /// [`ProbeError::Exhausted`].
    pub fn is_throttling(&self) -> bool {
        match self {
            Self::Throttled(_) => true,
            Self::Exhausted { last, .. } => last.is_throttling(),
            _ => false,
        }
    }
}

/// Result aggregator state machine violations.
///
/// These are programming errors in the scan orchestration, never runtime
/// conditions caused by the remote service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregatorError {
    /// An outcome arrived while the aggregator was not running
    #[error("outcome for '{candidate}' submitted while aggregator is {state}")]
    NotAccepting { candidate: String, state: String },

    /// Two outcomes arrived for the same candidate slot
    #[error("duplicate outcome for candidate #{index} '{candidate}'")]
    Duplicate { index: usize, candidate: String },

    /// Candidate index outside the wordlist
    #[error("candidate index {index} out of range (wordlist has {len} entries)")]
    OutOfRange { index: usize, len: usize },

    /// A state transition that skips or reverses the lifecycle
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

/// Error classification for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transient error - retry with exponential backoff
    ///
    /// Examples: throttling, timeout, connection reset, S3 500
    Transient,

    /// Permanent error - never retry, record an Error outcome
    ///
    /// Examples: unknown service error code, redirect to another region
    Permanent,

    /// Fatal error - never retry, abort the run
    ///
    /// Examples: invalid access key, expired token
    Fatal,
}

/// Result type alias using ScanError.
pub type Result<T> = std::result::Result<T, ScanError>;
