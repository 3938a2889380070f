//! Candidate bucket names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A bucket name to probe, tagged with its position in the wordlist.
///
/// The index is what lets the aggregator rebuild the original wordlist
/// order after workers finish in arbitrary order. Two candidates with the
/// same name but different indices are distinct work items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    /// Zero-based position in the wordlist
    pub index: usize,

    /// The bucket name as read from the wordlist
    pub name: String,
}

impl Candidate {
    /// Create a new candidate.
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }

    /// Build indexed candidates from names in wordlist order.
    pub fn from_names<I, S>(names: I) -> Vec<Candidate>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Candidate::new(index, name))
            .collect()
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
