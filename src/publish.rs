//! Idempotent artifact publishing.
//!
//! Publishing is a no-clobber copy: the first run's published artifacts are
//! never disturbed by later runs over the same manifest.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Outcome of a no-clobber publish. Failures surface as errors so the caller
/// decides whether they abort anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The artifact was copied to the destination.
    Published,
    /// The destination already exists and was left untouched.
    SkippedExisting,
}

/// Copies `src` to `dest` unless `dest` already exists.
///
/// An existing destination is the expected idempotence hit, not an error.
/// A missing source (the tool never produced that artifact) is an error.
pub fn publish_if_absent(src: &Path, dest: &Path) -> Result<PublishOutcome> {
    if dest.exists() {
        return Ok(PublishOutcome::SkippedExisting);
    }
    fs::copy(src, dest)
        .with_context(|| format!("publish {} to {}", src.display(), dest.display()))?;
    Ok(PublishOutcome::Published)
}
