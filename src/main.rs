use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod batch;
mod chapterizer;
mod cli;
mod manifest;
mod publish;
mod workitem;

use batch::BatchConfig;
use chapterizer::Chapterizer;
use cli::RootArgs;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = BatchConfig {
        manifest_path: args.manifest,
        output_root: args.output_root,
        chapterizer: Chapterizer::new(args.chapterizer, args.model),
        report_path: args.report,
    };

    let summary = batch::run(&config)?;
    println!(
        "Batch complete: {} succeeded, {} failed, {} comment line(s) skipped",
        summary.succeeded, summary.failed, summary.comments_skipped
    );

    if args.strict && summary.failed > 0 {
        bail!("{} of {} item(s) failed", summary.failed, summary.processed);
    }
    Ok(())
}
