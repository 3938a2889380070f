//! Rendering and persisting the final scan report.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use sx_error::{Result, ScanError};
use sx_types::ScanReport;
use tracing::info;

/// File format of the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// `STATUS<TAB>name[<TAB>detail]` per candidate, listing sample beneath
    #[default]
    Text,

    /// Pretty-printed JSON of the whole report
    Json,

    /// JSON Lines - one outcome per line
    Jsonl,
}

/// Render a report in the given format.
///
/// Outcomes keep wordlist order in every format.
pub fn render(report: &ScanReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => {
            let mut out = serde_json::to_string_pretty(report).map_err(json_error)?;
            out.push('\n');
            Ok(out)
        }
        ReportFormat::Jsonl => {
            let mut out = String::new();
            for outcome in &report.outcomes {
                out.push_str(&serde_json::to_string(outcome).map_err(json_error)?);
                out.push('\n');
            }
            Ok(out)
        }
    }
}

/// Render and write a report to `path`.
pub fn write_report(report: &ScanReport, format: ReportFormat, path: &Path) -> Result<()> {
    let rendered = render(report, format)?;
    std::fs::write(path, rendered)?;
    info!(
        path = %path.display(),
        outcomes = report.outcomes.len(),
        "Report written"
    );
    Ok(())
}

fn render_text(report: &ScanReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        out.push_str(outcome.status.as_str());
        out.push('\t');
        out.push_str(&outcome.candidate);
        if let Some(detail) = &outcome.detail {
            out.push('\t');
            out.push_str(detail);
        }
        out.push('\n');
        for key in &outcome.listed_objects {
            let _ = writeln!(out, "  - {key}");
        }
    }
    out
}

fn json_error(e: serde_json::Error) -> ScanError {
    ScanError::Other(anyhow::Error::new(e).context("report serialization failed"))
}
