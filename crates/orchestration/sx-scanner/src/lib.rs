//! sx-scanner - concurrent bucket existence scanning.
//!
//! The scanning engine drains a wordlist through a bounded pool of workers:
//!
//! - [`TaskQueue`] hands candidates out one at a time
//! - [`Scanner`] runs the worker pool with cancellation on fatal errors
//! - [`ResultAggregator`] collects outcomes and builds the ordered [`ScanReport`]
//! - [`StatusOutput`] streams live per-candidate lines
//! - [`report`] renders the final report as text, JSON or JSON Lines
//! - [`load_wordlist`] reads the candidate names
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sx_probe::{ProbeClient, S3BucketApi, S3Config, create_s3_client};
//! use sx_scanner::{ConsoleOutput, ScanConfig, Scanner};
//!
//! let client = create_s3_client(&S3Config::new("us-east-1").with_profile("recon")).await?;
//! let probe = ProbeClient::new(Arc::new(S3BucketApi::new(client)));
//!
//! let scanner = Scanner::new(ScanConfig::new().with_list_objects(true), probe)
//!     .with_output(Arc::new(ConsoleOutput::stdout()));
//! let report = scanner.scan(["acme-backups", "acme-logs"]).await?;
//! ```
//!
//! [`ScanReport`]: sx_types::ScanReport

pub mod aggregator;
pub mod config;
pub mod output;
pub mod pool;
pub mod queue;
pub mod report;
pub mod wordlist;

pub use aggregator::{AggregatorState, ResultAggregator};
pub use config::{DEFAULT_MAX_KEYS, DEFAULT_THREAD_COUNT, MAX_KEYS_LIMIT, ScanConfig, is_valid_region};
pub use output::{ConsoleOutput, NullOutput, StatusOutput};
pub use pool::{INTERRUPTED, Scanner};
pub use queue::TaskQueue;
pub use report::{ReportFormat, render, write_report};
pub use wordlist::load_wordlist;
