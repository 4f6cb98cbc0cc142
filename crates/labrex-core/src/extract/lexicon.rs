//! The medical test lexicon: name patterns, expected units and ranges.
//!
//! The lexicon is plain data injected into the extractor and validator so
//! tests can substitute their own tables. [`TestLexicon::builtin`] carries
//! the production tables.

use std::collections::HashMap;

use rust_decimal::Decimal;

/// Multi-word test name patterns, most specific first. Order matters: the
/// first fully matching entry wins, so entries must precede any shorter or
/// more general pattern they overlap with.
const MULTI_WORD_TESTS: &[(&str, &[&str])] = &[
    ("RBC Count", &["rbc", "count"]),
    ("WBC Count", &["wbc", "count"]),
    ("Platelet Count", &["platelet", "count"]),
    ("Total Cholesterol", &["total", "cholesterol"]),
    ("HDL Cholesterol", &["hdl", "cholesterol"]),
    ("LDL Cholesterol", &["ldl", "cholesterol"]),
    ("Total Bilirubin", &["total", "bilirubin"]),
    ("Alkaline Phosphatase", &["alkaline", "phosphatase"]),
    ("Total Protein", &["total", "protein"]),
    ("Glucose Fasting", &["glucose", "fasting"]),
    ("SGOT AST", &["sgot", "ast"]),
    ("SGPT ALT", &["sgpt", "alt"]),
];

/// Single-word test names, tried after the multi-word table.
const SINGLE_WORD_TESTS: &[&str] = &[
    "hemoglobin",
    "hematocrit",
    "triglycerides",
    "creatinine",
    "urea",
    "albumin",
    "glucose",
];

/// Expected units for validation and auto-correction.
const EXPECTED_UNITS: &[(&str, &str)] = &[
    ("Hemoglobin", "g/dL"),
    ("RBC Count", "million/μL"),
    ("WBC Count", "thousand/μL"),
    ("Platelet Count", "thousand/μL"),
    ("Hematocrit", "%"),
    ("Glucose", "mg/dL"),
    ("Glucose Fasting", "mg/dL"),
    ("Total Cholesterol", "mg/dL"),
    ("HDL Cholesterol", "mg/dL"),
    ("LDL Cholesterol", "mg/dL"),
    ("Triglycerides", "mg/dL"),
    ("Creatinine", "mg/dL"),
    ("Urea", "mg/dL"),
    ("Total Bilirubin", "mg/dL"),
    ("SGOT AST", "U/L"),
    ("SGPT ALT", "U/L"),
    ("Alkaline Phosphatase", "U/L"),
    ("Total Protein", "g/dL"),
    ("Albumin", "g/dL"),
];

/// Expected value ranges as (name, min, max) with decimal (mantissa, scale)
/// pairs, preserving the display precision of each bound.
const EXPECTED_RANGES: &[(&str, (i64, u32), (i64, u32))] = &[
    ("Hemoglobin", (5, 0), (20, 0)),
    ("RBC Count", (20, 1), (80, 1)),
    ("WBC Count", (20, 1), (200, 1)),
    ("Platelet Count", (50, 0), (600, 0)),
    ("Hematocrit", (20, 0), (60, 0)),
    ("Glucose Fasting", (40, 0), (300, 0)),
    ("Total Cholesterol", (100, 0), (400, 0)),
    ("HDL Cholesterol", (20, 0), (100, 0)),
    ("LDL Cholesterol", (50, 0), (250, 0)),
    ("Triglycerides", (30, 0), (500, 0)),
    ("Creatinine", (3, 1), (30, 1)),
    ("Urea", (10, 0), (80, 0)),
    ("Total Bilirubin", (1, 1), (50, 1)),
    ("SGOT AST", (5, 0), (200, 0)),
    ("SGPT ALT", (5, 0), (200, 0)),
    ("Alkaline Phosphatase", (20, 0), (300, 0)),
    ("Total Protein", (40, 1), (100, 1)),
    ("Albumin", (20, 1), (60, 1)),
];

/// One multi-word test name pattern: the canonical name plus the lowercase
/// substrings required in consecutive line tokens.
#[derive(Debug, Clone)]
pub struct MultiWordEntry {
    /// Canonical test name.
    pub name: String,
    /// Required substrings, one per consecutive token.
    pub keywords: Vec<String>,
}

/// Expected numeric range for a test, inclusive on both bounds.
#[derive(Debug, Clone)]
pub struct ExpectedRange {
    /// Lower bound.
    pub min: Decimal,
    /// Upper bound.
    pub max: Decimal,
}

impl ExpectedRange {
    /// True when the value lies within `[min, max]`.
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }

    /// Human-readable form, e.g. "2.0 - 8.0".
    pub fn display(&self) -> String {
        format!("{} - {}", self.min, self.max)
    }
}

/// Read-only reference data for test extraction and validation.
#[derive(Debug, Clone)]
pub struct TestLexicon {
    multi_word: Vec<MultiWordEntry>,
    single_word: Vec<String>,
    expected_units: HashMap<String, String>,
    expected_ranges: HashMap<String, ExpectedRange>,
}

impl TestLexicon {
    /// The built-in lexicon used in production.
    pub fn builtin() -> Self {
        Self {
            multi_word: MULTI_WORD_TESTS
                .iter()
                .map(|(name, keywords)| MultiWordEntry {
                    name: (*name).to_string(),
                    keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
                })
                .collect(),
            single_word: SINGLE_WORD_TESTS.iter().map(|s| (*s).to_string()).collect(),
            expected_units: EXPECTED_UNITS
                .iter()
                .map(|(name, unit)| ((*name).to_string(), (*unit).to_string()))
                .collect(),
            expected_ranges: EXPECTED_RANGES
                .iter()
                .map(|(name, min, max)| {
                    (
                        (*name).to_string(),
                        ExpectedRange {
                            min: Decimal::new(min.0, min.1),
                            max: Decimal::new(max.0, max.1),
                        },
                    )
                })
                .collect(),
        }
    }

    /// Build a lexicon from custom tables.
    pub fn new(
        multi_word: Vec<MultiWordEntry>,
        single_word: Vec<String>,
        expected_units: HashMap<String, String>,
        expected_ranges: HashMap<String, ExpectedRange>,
    ) -> Self {
        Self {
            multi_word,
            single_word,
            expected_units,
            expected_ranges,
        }
    }

    /// Match a test name at the start of a line.
    ///
    /// `tokens_lower` are the line's token texts, lowercased. Multi-word
    /// entries are tried first in declared order: every keyword must be
    /// contained in the corresponding consecutive token. When none matches,
    /// single-word names are tried by substring containment in the first
    /// token, yielding a capitalized canonical name.
    ///
    /// Returns the canonical name and the number of tokens consumed.
    pub fn match_test_name(&self, tokens_lower: &[String]) -> Option<(String, usize)> {
        for entry in &self.multi_word {
            if entry.keywords.len() <= tokens_lower.len()
                && entry
                    .keywords
                    .iter()
                    .zip(tokens_lower)
                    .all(|(keyword, token)| token.contains(keyword.as_str()))
            {
                return Some((entry.name.clone(), entry.keywords.len()));
            }
        }

        if let Some(first) = tokens_lower.first() {
            for name in &self.single_word {
                if first.contains(name.as_str()) {
                    return Some((capitalize(name), 1));
                }
            }
        }

        None
    }

    /// Expected unit for a canonical test name, if known.
    pub fn expected_unit(&self, test_name: &str) -> Option<&str> {
        self.expected_units.get(test_name).map(String::as_str)
    }

    /// Expected value range for a canonical test name, if known.
    pub fn expected_range(&self, test_name: &str) -> Option<&ExpectedRange> {
        self.expected_ranges.get(test_name)
    }
}

impl Default for TestLexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
