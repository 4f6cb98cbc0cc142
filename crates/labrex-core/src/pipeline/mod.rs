//! Page processing and multi-page merge orchestration.

mod merge;
mod page;

pub use merge::{base_report_id, merge_extraction_dir, merge_pages, MergeOutcome};
pub use page::PageProcessor;

/// Suffix of per-page token tables.
pub const TOKENS_SUFFIX: &str = "_tokens.csv";

/// Suffix of per-page extraction artifacts.
pub const EXTRACTED_SUFFIX: &str = "_extracted.json";

/// Suffix of merged multi-page artifacts.
pub const MERGED_SUFFIX: &str = "_merged.json";

/// Derive the extraction artifact name for a token table file name.
///
/// `report_page01_tokens.csv` becomes `report_page01_extracted.json`. A file
/// without the conventional suffix falls back to its stem.
pub fn extraction_file_name(token_file_name: &str) -> String {
    match token_file_name.strip_suffix(TOKENS_SUFFIX) {
        Some(stem) => format!("{stem}{EXTRACTED_SUFFIX}"),
        None => {
            let stem = std::path::Path::new(token_file_name)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(token_file_name);
            format!("{stem}{EXTRACTED_SUFFIX}")
        }
    }
}
