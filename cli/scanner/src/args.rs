//! CLI argument definitions for s3xist.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
pub use sx_cli_common::LogLevel;
use sx_scanner::{DEFAULT_MAX_KEYS, DEFAULT_THREAD_COUNT, MAX_KEYS_LIMIT, ReportFormat};

/// Authenticated S3 bucket existence scanner.
///
/// Checks every name in a wordlist against S3 using your own credentials,
/// telling apart buckets that exist and are listable, buckets that exist but
/// deny you, and names with no bucket at all.
///
/// ## Examples
///
/// Scan a wordlist with a named profile:
///   s3xist -p recon -r us-east-1 -w names.txt
///
/// Sample up to 5 keys from listable buckets and save a JSON report:
///   s3xist -p recon -r eu-west-1 -w names.txt --list-objects --max-keys 5 \
///     -o found.json --output-format json
#[derive(Parser, Debug)]
#[command(name = "s3xist")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === Input ===
    /// Newline-delimited list of candidate bucket names
    #[arg(short = 'w', long)]
    pub wordlist: PathBuf,

    // === AWS Configuration ===
    /// Named credential profile to authenticate with
    #[arg(short = 'p', long, env = "AWS_PROFILE")]
    pub profile: String,

    /// AWS region the probes are scoped to
    #[arg(short = 'r', long, env = "AWS_REGION")]
    pub region: String,

    /// Custom S3 endpoint URL (for LocalStack)
    #[arg(long, env = "SX_S3_ENDPOINT")]
    pub endpoint: Option<String>,

    // === Scanning ===
    /// Number of concurrent workers (must be >= 1)
    #[arg(short = 't', long, default_value_t = DEFAULT_THREAD_COUNT, value_parser = parse_positive_usize)]
    pub threads: usize,

    /// Sample object keys from buckets that allow listing
    #[arg(short = 'l', long)]
    pub list_objects: bool,

    /// Number of keys to sample per listable bucket
    #[arg(long, default_value_t = DEFAULT_MAX_KEYS, value_parser = parse_max_keys)]
    pub max_keys: usize,

    /// Retries for throttled or timed-out calls
    #[arg(long, default_value = "2")]
    pub max_retries: u32,

    /// Base backoff between retries in milliseconds
    #[arg(long, default_value = "200")]
    pub retry_backoff_ms: u64,

    /// Timeout for a single remote call in seconds
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    // === Output ===
    /// Write the final report to this file
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Format of the report file
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Do not print names that have no bucket
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Disable colored status lines
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    // === Progress Options ===
    /// Enable progress reporting to stderr
    #[arg(long)]
    pub progress: bool,

    /// Progress reporting interval in seconds
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    pub progress_interval: u64,

    // === Logging ===
    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Report file format.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// One `STATUS<TAB>name` line per candidate
    Text,
    /// Pretty-printed JSON of the whole report
    Json,
    /// JSON Lines (one outcome per line)
    Jsonl,
}

impl From<OutputFormat> for ReportFormat {
    fn from(arg: OutputFormat) -> Self {
        match arg {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Jsonl => ReportFormat::Jsonl,
        }
    }
}

/// Parse a positive usize (>= 1).
fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value < 1 {
        return Err(format!("{value} is not in 1.."));
    }
    Ok(value)
}

/// Parse a listing sample size (1..=1000).
fn parse_max_keys(s: &str) -> Result<usize, String> {
    let value = parse_positive_usize(s)?;
    if value > MAX_KEYS_LIMIT {
        return Err(format!("{value} is not in 1..={MAX_KEYS_LIMIT}"));
    }
    Ok(value)
}
