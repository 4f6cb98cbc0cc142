//! Batch command - process a directory of token tables.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use labrex_core::models::config::LabrexConfig;
use labrex_core::models::report::PageResult;
use labrex_core::pipeline::{
    extraction_file_name, merge_extraction_dir, PageProcessor, TOKENS_SUFFIX,
};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Directory containing *_tokens.csv files
    #[arg(required = true)]
    tokens_dir: PathBuf,

    /// Output directory for extraction artifacts
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Skip the multi-page merge pass
    #[arg(long)]
    no_merge: bool,
}

/// Result of processing a single token table.
struct FileReport {
    file: String,
    fields: usize,
    tests: usize,
    corrected: usize,
    flagged: usize,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = if let Some(path) = config_path {
        LabrexConfig::from_file(std::path::Path::new(path))?
    } else {
        LabrexConfig::default()
    };

    if !args.tokens_dir.is_dir() {
        anyhow::bail!("Token directory not found: {}", args.tokens_dir.display());
    }

    // Collect token tables in sorted (page) order
    let mut token_files: Vec<String> = fs::read_dir(&args.tokens_dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(TOKENS_SUFFIX))
        .collect();
    token_files.sort();

    if token_files.is_empty() {
        anyhow::bail!(
            "No token tables found in {}",
            args.tokens_dir.display()
        );
    }

    println!(
        "{} Found {} token table(s) to process",
        style("ℹ").blue(),
        token_files.len()
    );

    fs::create_dir_all(&args.output_dir)?;

    let progress = ProgressBar::new(token_files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let processor = PageProcessor::from_config(&config);
    let mut reports = Vec::with_capacity(token_files.len());

    for file in &token_files {
        let path = args.tokens_dir.join(file);

        // A malformed table degrades to an empty result; the batch continues
        let (page, error) = match processor.process_file(&path) {
            Ok(page) => (page, None),
            Err(e) => {
                warn!("failed to process {}: {}", path.display(), e);
                (PageResult::default(), Some(e.to_string()))
            }
        };

        let output_path = args.output_dir.join(extraction_file_name(file));
        fs::write(&output_path, serde_json::to_string_pretty(&page)?)?;
        debug!("wrote {}", output_path.display());

        reports.push(FileReport {
            file: file.clone(),
            fields: page.fields.len(),
            tests: page.test_results.len(),
            corrected: page.corrected_count(),
            flagged: page.flagged_count(),
            error,
        });

        progress.inc(1);
    }

    progress.finish_with_message("Complete");

    // Per-file summary
    for report in &reports {
        let mut line = format!(
            "  {} {}: {} fields, {} tests",
            style("✓").green(),
            report.file,
            report.fields,
            report.tests
        );
        if report.corrected > 0 {
            line.push_str(&format!(", {} auto-corrected", report.corrected));
        }
        if report.flagged > 0 {
            line.push_str(&format!(", {} flagged", report.flagged));
        }
        if let Some(error) = &report.error {
            line = format!("  {} {}: {}", style("✗").red(), report.file, error);
        }
        println!("{line}");
    }

    // Merge multi-page reports
    if !args.no_merge {
        let outcomes = merge_extraction_dir(&args.output_dir)?;
        for outcome in &outcomes {
            println!(
                "  {} Merged {} pages → {}_merged.json",
                style("✓").green(),
                outcome.page_files.len(),
                outcome.base_name
            );
        }
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args.output_dir.join("summary.csv");
        write_summary(&summary_path, &reports)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    println!();
    println!(
        "{} Processed {} file(s) in {:?}",
        style("✓").green(),
        reports.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(reports.len() - failed).green(),
        style(failed).red()
    );

    Ok(())
}

fn write_summary(path: &PathBuf, reports: &[FileReport]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "fields",
        "tests",
        "auto_corrected",
        "flagged",
        "error",
    ])?;

    for report in reports {
        let status = if report.error.is_some() { "error" } else { "success" };
        wtr.write_record([
            report.file.as_str(),
            status,
            &report.fields.to_string(),
            &report.tests.to_string(),
            &report.corrected.to_string(),
            &report.flagged.to_string(),
            report.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
