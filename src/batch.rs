//! Batch driver: per-item error boundary around the chapterizer invocation
//! and artifact publishing.
//!
//! Only two errors abort a run: an unreadable manifest and an uncreatable
//! output root. Everything that goes wrong for a single item is recorded and
//! the batch moves on to the next manifest entry.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::chapterizer::{Chapterizer, ItemPaths};
use crate::manifest::{self, ManifestLine};
use crate::publish::{publish_if_absent, PublishOutcome};
use crate::workitem::WorkItem;

/// Batch-level inputs, resolved from the CLI.
pub struct BatchConfig {
    pub manifest_path: PathBuf,
    pub output_root: PathBuf,
    pub chapterizer: Chapterizer,
    pub report_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Succeeded,
    Failed,
}

/// One processed manifest entry, as written to the report.
#[derive(Debug, Serialize)]
pub struct ItemRecord {
    pub input: String,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Aggregate outcome of a run. Comment and blank lines never appear in
/// `items`.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub comments_skipped: usize,
    pub items: Vec<ItemRecord>,
}

impl BatchSummary {
    fn new() -> Self {
        Self {
            processed: 0,
            succeeded: 0,
            failed: 0,
            comments_skipped: 0,
            items: Vec::new(),
        }
    }
}

/// Processes every manifest entry in file order, one at a time.
pub fn run(config: &BatchConfig) -> Result<BatchSummary> {
    let lines = manifest::load(&config.manifest_path)?;
    fs::create_dir_all(&config.output_root).with_context(|| {
        format!("create output root {}", config.output_root.display())
    })?;

    let mut summary = BatchSummary::new();
    for line in lines {
        match line {
            ManifestLine::Blank => {}
            ManifestLine::Comment(text) => {
                println!("Skipping comment line: {text}");
                summary.comments_skipped += 1;
            }
            ManifestLine::Entry(input) => {
                let item = WorkItem::new(&input);
                summary.processed += 1;
                match process_item(&item, config) {
                    Ok(()) => {
                        summary.succeeded += 1;
                        summary.items.push(ItemRecord {
                            input,
                            status: ItemStatus::Succeeded,
                            reason: None,
                        });
                    }
                    Err(err) => {
                        // Per-item failures never abort the batch.
                        tracing::warn!(input = %item.input_path().display(), "item failed");
                        eprintln!("Failed to process {input}: {err:#}");
                        summary.failed += 1;
                        summary.items.push(ItemRecord {
                            input,
                            status: ItemStatus::Failed,
                            reason: Some(format!("{err:#}")),
                        });
                    }
                }
            }
        }
    }

    if let Some(report_path) = &config.report_path {
        write_report(report_path, &summary)?;
        println!("Wrote batch report to {}", report_path.display());
    }

    Ok(summary)
}

/// Runs the chapterizer for one input and lands its artifacts.
///
/// Any error returned here is contained by the driver loop; nothing in this
/// function carries state into the next item.
fn process_item(item: &WorkItem, config: &BatchConfig) -> Result<()> {
    let audio_name = item.audio_name()?;
    let output_dir = item.output_dir(&config.output_root)?;
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("create output directory {}", output_dir.display()))?;

    println!("Processing {}", item.input_path().display());
    println!("Writing output files to {}", output_dir.display());

    let paths = ItemPaths::new(&output_dir, &audio_name);
    let run_result = config.chapterizer.run_captured(item.input_path(), &paths);

    // Publishing is attempted unconditionally: the tool may have partially
    // written artifacts even on failure, and those still get landed.
    let mut failures: Vec<String> = Vec::new();
    match &run_result {
        Ok(status) if status.success() => {}
        Ok(status) => failures.push(match status.code() {
            Some(code) => format!("chapterizer exited with status {code}"),
            None => "chapterizer was terminated by a signal".to_string(),
        }),
        Err(err) => failures.push(format!("{err:#}")),
    }

    for artifact in [&paths.cue_file, &paths.ffmetadata_file] {
        match publish_artifact(artifact, &item.source_dir()) {
            Ok(PublishOutcome::Published) => {
                tracing::info!(artifact = %artifact.display(), "published");
            }
            Ok(PublishOutcome::SkippedExisting) => {
                tracing::debug!(artifact = %artifact.display(), "destination exists, skipped");
            }
            Err(err) => failures.push(format!("{err:#}")),
        }
    }

    println!("Finished processing {}", item.input_path().display());

    if failures.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(failures.join("; ")))
    }
}

/// Publishes one artifact beside the original input, without clobbering a
/// copy from an earlier run.
fn publish_artifact(artifact: &Path, source_dir: &Path) -> Result<PublishOutcome> {
    let file_name = artifact
        .file_name()
        .ok_or_else(|| anyhow!("artifact path has no file name: {}", artifact.display()))?;
    publish_if_absent(artifact, &source_dir.join(file_name))
}

fn write_report(path: &Path, summary: &BatchSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("serialize batch report")?;
    fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
    Ok(())
}
