//! Work-list manifest parsing.
//!
//! The manifest is external configuration: UTF-8 text, one audio file path
//! per line, `#` starting a comment line. Entries are not validated here;
//! a bad path surfaces later as that item's failure.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Classification of one raw manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestLine {
    /// First character is `#`; skipped with a notice.
    Comment(String),
    /// Empty or whitespace-only; skipped silently.
    Blank,
    /// A work entry naming an input audio file.
    Entry(String),
}

/// Classifies one raw line. Entries are taken verbatim; leading whitespace
/// does not make a comment.
pub fn classify_line(line: &str) -> ManifestLine {
    if line.trim().is_empty() {
        ManifestLine::Blank
    } else if line.starts_with('#') {
        ManifestLine::Comment(line.to_string())
    } else {
        ManifestLine::Entry(line.to_string())
    }
}

/// Loads the manifest and classifies every line, in file order.
///
/// An unreadable manifest is fatal to the whole run.
pub fn load(path: &Path) -> Result<Vec<ManifestLine>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read manifest {}", path.display()))?;
    Ok(text.lines().map(classify_line).collect())
}
