//! Shared utilities for s3xist CLI binaries.
//!
//! Log level selection, logging setup and number formatting used by the
//! `s3xist` scanner binary.

pub mod args;
pub mod format;
pub mod logging;

pub use args::LogLevel;
pub use format::{format_duration, format_number};
pub use logging::{init_logging, log_filter};
