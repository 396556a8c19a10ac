//! CLI argument parsing for the batch driver.
//!
//! The CLI is intentionally thin: it wires paths and the external tool
//! contract without embedding policy, so the driver loop stays testable on
//! its own.

use clap::Parser;
use std::path::PathBuf;

/// Default executable name for the external chapterizer.
pub const DEFAULT_CHAPTERIZER: &str = "audiobook-chapterizer";

/// Root CLI entrypoint for the batch run.
#[derive(Parser, Debug)]
#[command(
    name = "chapbatch",
    version,
    about = "Run the audiobook chapterizer over a work list of audio files",
    after_help = "Examples:\n  chapbatch books.txt\n  chapbatch --output-root ./output books.txt\n  chapbatch --chapterizer ./target/release/audiobook-chapterizer --model ./model books.txt\n  chapbatch --report report.json --strict books.txt"
)]
pub struct RootArgs {
    /// Work-list file: one audio path per line, `#` starts a comment line
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Root directory for per-item output directories
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_root: PathBuf,

    /// Chapterizer executable: a bare name resolved via PATH, or a path
    #[arg(long, value_name = "BIN", default_value = DEFAULT_CHAPTERIZER)]
    pub chapterizer: String,

    /// Vosk ASR model directory passed through to the chapterizer
    #[arg(long, value_name = "DIR", default_value = "./model")]
    pub model: PathBuf,

    /// Write a JSON report of per-item outcomes and aggregate counts
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Exit non-zero if any item failed (the batch still runs to completion)
    #[arg(long)]
    pub strict: bool,
}
