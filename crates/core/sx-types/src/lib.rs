//! Core types for s3xist.
//!
//! This crate provides the foundational types used throughout the system:
//! - [`Candidate`] - A bucket name from the wordlist with its position
//! - [`ProbeOutcome`] - The classified result of probing one candidate
//! - [`ScanReport`] - The ordered, finalized result of a scan run

pub mod candidate;
pub mod outcome;
pub mod report;

pub use candidate::*;
pub use outcome::*;
pub use report::*;
