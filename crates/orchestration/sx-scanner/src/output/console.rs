//! Console output: one colored line per processed candidate.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::io::Write;
use sx_error::Result;
use sx_types::{ProbeOutcome, ProbeStatus};

use super::StatusOutput;

const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const YELLOW: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Human-readable status lines for an interactive terminal.
///
/// ```text
/// [FOUND] acme-backups
///     - 2024/db.sql.gz
/// [FORBIDDEN] acme-logs
/// [NOT FOUND] acme-tmp
/// [ERROR] acme-x: throttled: SlowDown (gave up after 3 attempts)
/// ```
pub struct ConsoleOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    color: bool,
    quiet: bool,
}

impl ConsoleOutput {
    /// Console output writing to stdout.
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    /// Console output writing to an arbitrary sink.
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
            color: true,
            quiet: false,
        }
    }

    /// Enable or disable ANSI colors.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Suppress lines for names that do not exist.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Render the lines for one outcome, or `None` if it is suppressed.
    pub fn format_outcome(&self, outcome: &ProbeOutcome) -> Option<String> {
        if self.quiet && outcome.status == ProbeStatus::NotFound {
            return None;
        }

        let (label, color) = match outcome.status {
            ProbeStatus::ExistsAccessible => ("FOUND", GREEN),
            ProbeStatus::ExistsForbidden => ("FORBIDDEN", CYAN),
            ProbeStatus::NotFound => ("NOT FOUND", DIM),
            ProbeStatus::Error => ("ERROR", YELLOW),
        };

        let mut line = if self.color {
            format!("{color}[{label}]{RESET} {}", outcome.candidate)
        } else {
            format!("[{label}] {}", outcome.candidate)
        };
        if let Some(detail) = &outcome.detail {
            line.push_str(": ");
            line.push_str(detail);
        }
        for key in &outcome.listed_objects {
            line.push_str("\n    - ");
            line.push_str(key);
        }
        Some(line)
    }
}

#[async_trait]
impl StatusOutput for ConsoleOutput {
    async fn emit(&self, outcome: &ProbeOutcome) -> Result<()> {
        if let Some(line) = self.format_outcome(outcome) {
            let mut writer = self.writer.lock();
            writeln!(writer, "{line}")?;
        }
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }
}
