//! Wordlist loading.

use std::path::Path;
use sx_error::{Result, ScanError};

/// Read a newline-delimited wordlist.
///
/// Lines are trimmed and blank lines skipped; order is preserved. An empty
/// result is a configuration error.
pub fn load_wordlist(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ScanError::Config(format!("cannot read wordlist {}: {e}", path.display()))
    })?;

    let names: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if names.is_empty() {
        return Err(ScanError::Config(format!(
            "wordlist {} contains no names",
            path.display()
        )));
    }
    Ok(names)
}
