//! Multi-page report merging.
//!
//! Pages of one scanned report arrive as separate token tables and produce
//! separate extraction artifacts. The merger groups artifacts by the base
//! report identity inferred from file names and reconciles them into one
//! record per report.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::{EXTRACTED_SUFFIX, MERGED_SUFFIX};
use crate::error::Result;
use crate::extract::patterns::PAGE_SUFFIX;
use crate::models::report::PageResult;

/// One merged report written by [`merge_extraction_dir`].
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Base report identity shared by the merged pages.
    pub base_name: String,

    /// Per-page artifact file names, in merge order.
    pub page_files: Vec<String>,

    /// Path of the written merged artifact.
    pub output_path: PathBuf,
}

/// Derive a report's base identity from a file stem by stripping
/// page-number suffixes (`_page<N>` or `_<N>`, wherever they occur).
pub fn base_report_id(stem: &str) -> String {
    PAGE_SUFFIX.replace_all(stem, "").into_owned()
}

/// Merge page results into one record.
///
/// Demographics come wholesale from the first page that has any fields;
/// later pages never contribute demographics, even when the first page's
/// fields are incomplete. Test results are the union over all pages,
/// deduplicated by normalized test name with the first occurrence winning.
pub fn merge_pages(pages: &[PageResult]) -> PageResult {
    let mut merged = PageResult::default();
    let mut seen_tests: HashSet<String> = HashSet::new();

    for page in pages {
        if merged.fields.is_empty() && !page.fields.is_empty() {
            merged.fields = page.fields.clone();
        }

        for test in &page.test_results {
            if seen_tests.insert(test.normalized_name()) {
                merged.test_results.push(test.clone());
            }
        }
    }

    merged
}

/// Merge all multi-page reports found in an extraction directory.
///
/// Scans for `*_extracted.json` artifacts (ignoring previously merged
/// output), groups them by base identity, and writes a
/// `<base>_merged.json` artifact for every group with at least two pages.
/// Page precedence follows sorted file name order. Single-page groups are
/// left untouched.
pub fn merge_extraction_dir(dir: &Path) -> Result<Vec<MergeOutcome>> {
    let mut page_files: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(EXTRACTED_SUFFIX) && !name.contains("_merged"))
        .collect();
    page_files.sort();

    if page_files.len() <= 1 {
        return Ok(Vec::new());
    }

    // Group files by base report identity; files stay in sorted order
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for name in &page_files {
        let stem = name.strip_suffix(EXTRACTED_SUFFIX).unwrap_or(name);
        groups.entry(base_report_id(stem)).or_default().push(name.clone());
    }

    let mut outcomes = Vec::new();

    for (base_name, files) in &groups {
        if files.len() < 2 {
            continue;
        }

        let mut pages = Vec::with_capacity(files.len());
        for name in files {
            let content = fs::read_to_string(dir.join(name))?;
            pages.push(serde_json::from_str::<PageResult>(&content)?);
        }

        let merged = merge_pages(&pages);
        let output_path = dir.join(format!("{base_name}{MERGED_SUFFIX}"));
        fs::write(&output_path, serde_json::to_string_pretty(&merged)?)?;

        info!(
            "merged {} pages into {}",
            files.len(),
            output_path.display()
        );

        outcomes.push(MergeOutcome {
            base_name: base_name.clone(),
            page_files: files.clone(),
            output_path,
        });
    }

    Ok(outcomes)
}
