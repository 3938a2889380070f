//! Live status sinks for probe outcomes.
//!
//! This module provides the [`StatusOutput`] trait and implementations:
//! - [`ConsoleOutput`] - Colored per-candidate lines on stdout
//! - [`NullOutput`] - Discards everything (report-only runs, tests)

mod console;

pub use console::ConsoleOutput;

use async_trait::async_trait;
use sx_error::Result;
use sx_types::ProbeOutcome;

/// Receives each outcome as soon as a worker produces it.
///
/// Outcomes arrive in completion order, not wordlist order. Implementations
/// must tolerate concurrent calls from every worker.
#[async_trait]
pub trait StatusOutput: Send + Sync {
    /// Emit a single outcome.
    async fn emit(&self, outcome: &ProbeOutcome) -> Result<()>;

    /// Flush any buffered output.
    ///
    /// Called once after all workers have terminated.
    async fn flush(&self) -> Result<()>;
}

/// Output that drops every outcome.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOutput;

#[async_trait]
impl StatusOutput for NullOutput {
    async fn emit(&self, _outcome: &ProbeOutcome) -> Result<()> {
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}
