//! Merge command - reconcile multi-page reports in an extraction directory.

use std::path::PathBuf;

use clap::Args;
use console::style;

use labrex_core::pipeline::merge_extraction_dir;

/// Arguments for the merge command.
#[derive(Args)]
pub struct MergeArgs {
    /// Directory containing *_extracted.json files
    #[arg(required = true)]
    extraction_dir: PathBuf,
}

pub async fn run(args: MergeArgs) -> anyhow::Result<()> {
    if !args.extraction_dir.is_dir() {
        anyhow::bail!(
            "Extraction directory not found: {}",
            args.extraction_dir.display()
        );
    }

    let outcomes = merge_extraction_dir(&args.extraction_dir)?;

    if outcomes.is_empty() {
        println!("{} No multi-page reports found.", style("ℹ").blue());
        return Ok(());
    }

    for outcome in &outcomes {
        println!(
            "{} Merged {} pages → {}",
            style("✓").green(),
            outcome.page_files.len(),
            outcome.output_path.display()
        );
    }

    Ok(())
}
