//! s3xist CLI
//!
//! Authenticated S3 bucket existence scanner.

use clap::Parser;
use std::process::ExitCode;
use sx_cli_common::{format_number, init_logging};
use sx_types::{ProbeStatus, ScanReport};

mod args;
mod progress;
mod run;

use args::Cli;

/// Errored names printed in the summary before eliding the rest.
const MAX_SUMMARY_ERRORS: usize = 10;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    // Initialize logging (to stderr, so stdout is clean for status lines)
    if let Err(e) = init_logging(args.log_level) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    let report = match run::execute(args).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::from(run::exit_code(&e));
        }
    };

    print_summary(&report);

    if report.aborted.is_some() {
        return ExitCode::from(run::EXIT_ABORTED);
    }
    ExitCode::SUCCESS
}

/// Report results to stderr.
fn print_summary(report: &ScanReport) {
    let counters = &report.counters;

    eprintln!();
    eprintln!("Scan completed:");
    eprintln!("  Checked:         {}", format_number(counters.checked));
    eprintln!("  Accessible:      {}", format_number(counters.accessible));
    eprintln!("  Forbidden:       {}", format_number(counters.forbidden));
    eprintln!("  Not found:       {}", format_number(counters.not_found));
    eprintln!("  Errors:          {}", format_number(counters.errored));

    if let Some(duration) = report.duration() {
        let secs = duration.num_milliseconds() as f64 / 1000.0;
        eprintln!("  Duration:        {secs:.2}s");
    }
    if let Some(rate) = report.candidates_per_second().filter(|r| *r > 0.0) {
        eprintln!("  Throughput:      {rate:.1} names/sec");
    }

    let mut existing = report.outcomes.iter().filter(|o| o.status.exists()).peekable();
    if existing.peek().is_some() {
        eprintln!();
        eprintln!("Existing buckets:");
        for outcome in existing {
            eprintln!("  {:<18} {}", outcome.status.as_str(), outcome.candidate);
        }
    }

    let errors: Vec<_> = report.with_status(ProbeStatus::Error).collect();
    if !errors.is_empty() {
        eprintln!();
        eprintln!("Errors:");
        for outcome in errors.iter().take(MAX_SUMMARY_ERRORS) {
            eprintln!(
                "  {}: {}",
                outcome.candidate,
                outcome.detail.as_deref().unwrap_or("no detail")
            );
        }
        if errors.len() > MAX_SUMMARY_ERRORS {
            eprintln!("  ... and {} more", errors.len() - MAX_SUMMARY_ERRORS);
        }
    }

    if let Some(reason) = &report.aborted {
        eprintln!();
        eprintln!("  Aborted:         {reason}");
        eprintln!(
            "  Not processed:   {}",
            format_number(report.unprocessed.len() as u64)
        );
    }
}
