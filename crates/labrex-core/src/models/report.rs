//! Extraction result models: fields, test results, and page records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single extracted demographic field (e.g. patient name, age).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Extracted value, trimmed.
    pub value: String,

    /// Mean confidence of the source line, rounded to 2 decimals.
    pub confidence: f64,
}

/// Validation flag attached to a test result without discarding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Flag {
    /// The value parses but lies outside the expected range for the test.
    OutOfExpectedRange,

    /// The value does not parse as a decimal number.
    InvalidNumericValue,
}

/// One extracted medical test measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Canonical test name (e.g. "RBC Count", "Hemoglobin").
    pub test_name: String,

    /// Measured value as a decimal literal.
    pub value: String,

    /// Measurement unit; empty when none was recognized or backfilled.
    pub unit: String,

    /// Mean confidence of the source line, rounded to 2 decimals.
    pub confidence: f64,

    /// Reference range printed next to the value, normalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_range: Option<String>,

    /// Validation warning, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<Flag>,

    /// Expected range for the test, set alongside an out-of-range flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_range: Option<String>,

    /// Human-readable description of an applied auto-correction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_correction: Option<String>,
}

impl TestResult {
    /// Deduplication key: lowercased test name with spaces removed.
    pub fn normalized_name(&self) -> String {
        normalize_test_name(&self.test_name)
    }
}

/// Normalize a test name for deduplication (lowercase, spaces stripped).
pub fn normalize_test_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "")
}

/// Extraction result for one page: demographics plus test results.
///
/// `fields` is keyed by field name; key order is not meaningful, only the
/// first-match-wins insertion policy is. A merged multi-page report uses the
/// same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Extracted demographic fields, keyed by field name.
    pub fields: BTreeMap<String, Field>,

    /// Extracted test results in page order, unique by normalized name.
    pub test_results: Vec<TestResult>,
}

impl PageResult {
    /// True when nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.test_results.is_empty()
    }

    /// Number of test results carrying an auto-correction note.
    pub fn corrected_count(&self) -> usize {
        self.test_results
            .iter()
            .filter(|t| t.auto_correction.is_some())
            .count()
    }

    /// Number of test results carrying a validation flag.
    pub fn flagged_count(&self) -> usize {
        self.test_results.iter().filter(|t| t.flag.is_some()).count()
    }
}
