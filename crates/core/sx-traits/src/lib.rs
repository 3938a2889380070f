//! Core traits for s3xist.
//!
//! This crate defines the seam between the scanner and the storage service:
//! - [`BucketApi`] - Single-attempt authenticated bucket operations

pub mod bucket;

pub use bucket::*;
