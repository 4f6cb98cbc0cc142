//! Process command - extract data from a single token table.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use labrex_core::models::config::LabrexConfig;
use labrex_core::models::report::PageResult;
use labrex_core::pipeline::PageProcessor;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input token table (CSV)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    // Load configuration
    let config = if let Some(path) = config_path {
        LabrexConfig::from_file(std::path::Path::new(path))?
    } else {
        LabrexConfig::default()
    };

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let processor = PageProcessor::from_config(&config);
    let result = processor.process_file(&args.input)?;

    info!(
        "extracted {} fields and {} tests from {}",
        result.fields.len(),
        result.test_results.len(),
        args.input.display()
    );

    let content = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Text => format_page_text(&result),
    };

    match args.output {
        Some(output) => {
            fs::write(&output, content)?;
            println!(
                "{} Wrote extraction result to {}",
                style("✓").green(),
                output.display()
            );
        }
        None => println!("{content}"),
    }

    Ok(())
}

fn format_page_text(page: &PageResult) -> String {
    let mut output = String::new();

    output.push_str("Fields:\n");
    if page.fields.is_empty() {
        output.push_str("  (none)\n");
    }
    for (name, field) in &page.fields {
        output.push_str(&format!(
            "  {}: {} ({:.2})\n",
            name, field.value, field.confidence
        ));
    }

    output.push_str("\nTest results:\n");
    if page.test_results.is_empty() {
        output.push_str("  (none)\n");
    }
    for test in &page.test_results {
        output.push_str(&format!("  {} {} {}", test.test_name, test.value, test.unit));
        if let Some(range) = &test.reference_range {
            output.push_str(&format!("  [{range}]"));
        }
        if let Some(flag) = &test.flag {
            output.push_str(&format!("  ({flag:?})"));
        }
        if let Some(note) = &test.auto_correction {
            output.push_str(&format!("  ({note})"));
        }
        output.push('\n');
    }

    output
}
