//! Logging initialization utilities.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::LogLevel;

/// AWS SDK crates whose request-level chatter is capped at `warn`.
const QUIET_TARGETS: &[&str] = &["aws_config", "aws_smithy_runtime", "aws_sdk_s3", "hyper"];

/// Build the filter for a log level.
///
/// `RUST_LOG` directives, when set, are appended and take precedence for the
/// targets they name.
pub fn log_filter(level: LogLevel) -> EnvFilter {
    let mut directives = vec![level.as_directive().to_string()];
    directives.extend(QUIET_TARGETS.iter().map(|target| format!("{target}=warn")));
    if let Ok(extra) = std::env::var("RUST_LOG") {
        directives.push(extra);
    }
    EnvFilter::new(directives.join(","))
}

/// Initialize logging with the specified level.
///
/// Logs are written to stderr so stdout remains clean for status lines.
pub fn init_logging(level: LogLevel) -> Result<()> {
    fmt::Subscriber::builder()
        .with_env_filter(log_filter(level))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    Ok(())
}
