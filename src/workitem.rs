//! Work-item path derivation.
//!
//! Every output location is a pure function of the input path and the output
//! root, so repeated runs land artifacts in the same places.

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

/// One entry from the work list: a single audio file to chapterize.
#[derive(Debug, Clone)]
pub struct WorkItem {
    input_path: PathBuf,
}

impl WorkItem {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
        }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// File name of the input with the final extension removed.
    ///
    /// This is a textual operation, not a format-aware one: `book.chapter1.mp3`
    /// becomes `book.chapter1`, a name with no dot is unchanged, and a leading
    /// dot marks a hidden file rather than an extension separator.
    pub fn audio_name(&self) -> Result<String> {
        let file_name = self
            .input_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                anyhow!(
                    "input path has no usable file name: {}",
                    self.input_path.display()
                )
            })?;
        Ok(strip_final_extension(file_name).to_string())
    }

    /// Directory containing the input. Published artifact copies land here.
    pub fn source_dir(&self) -> PathBuf {
        match self.input_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Per-item output directory under `output_root`.
    ///
    /// Two inputs in different directories with the same file name map to the
    /// same output directory; the driver does not disambiguate them.
    pub fn output_dir(&self, output_root: &Path) -> Result<PathBuf> {
        Ok(output_root.join(self.audio_name()?))
    }
}

/// Removes everything from the last `.` onward, dot included.
///
/// A dot in first position is part of the name (hidden file), never an
/// extension separator.
pub fn strip_final_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}
