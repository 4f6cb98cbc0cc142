//! Test result extraction from reconstructed lines.

use std::collections::HashSet;

use tracing::debug;

use super::lexicon::TestLexicon;
use super::patterns::{DASH_RUN, DASH_SPACING, NUMERIC_TOKEN, RANGE_TOKEN, UNIT, VALUE, WHITESPACE};
use super::round2;
use crate::layout::Line;
use crate::models::report::{normalize_test_name, TestResult};

/// Extracts medical test results from lines.
///
/// Each line is matched against the lexicon's test names; a matching line is
/// then scanned forward for the measured value, an optional unit, and an
/// optional reference range. Results are unique per page by normalized test
/// name; the first occurrence wins.
pub struct TestResultExtractor {
    lexicon: TestLexicon,
    min_line_confidence: f64,
}

impl TestResultExtractor {
    /// Create an extractor with the built-in lexicon and a 65.0 confidence floor.
    pub fn new() -> Self {
        Self {
            lexicon: TestLexicon::builtin(),
            min_line_confidence: 65.0,
        }
    }

    /// Replace the test lexicon.
    pub fn with_lexicon(mut self, lexicon: TestLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Set the minimum mean line confidence for a line to be considered.
    pub fn with_min_line_confidence(mut self, confidence: f64) -> Self {
        self.min_line_confidence = confidence;
        self
    }

    /// Extract test results from the page's lines, pre-validation.
    pub fn extract(&self, lines: &[Line]) -> Vec<TestResult> {
        let mut results: Vec<TestResult> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for line in lines {
            if line.len() < 2 {
                continue;
            }

            let avg_confidence = line.mean_confidence();
            if avg_confidence < self.min_line_confidence {
                continue;
            }

            let tokens: Vec<&str> = line.tokens.iter().map(|t| t.text.as_str()).collect();
            let tokens_lower: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

            // Skip header rows
            let line_text = tokens_lower.join(" ");
            if (line_text.contains("test") && line_text.contains("name"))
                || (line_text.contains("reference") && line_text.contains("range"))
            {
                continue;
            }

            let Some((test_name, consumed)) = self.lexicon.match_test_name(&tokens_lower) else {
                continue;
            };

            // Scan forward for the value, then unit and reference range
            let mut value: Option<String> = None;
            let mut unit = String::new();
            let mut reference_range: Option<String> = None;

            for i in consumed..tokens.len() {
                if VALUE.is_match(tokens[i]) {
                    value = Some(tokens[i].to_string());

                    if i + 1 < tokens.len() {
                        if UNIT.is_match(&tokens_lower[i + 1]) {
                            unit = tokens[i + 1].to_string();
                            reference_range = extract_reference_range(&tokens, i + 2);
                        } else {
                            reference_range = extract_reference_range(&tokens, i + 1);
                        }
                    }

                    break;
                }
            }

            let Some(value) = value else {
                continue;
            };

            let key = normalize_test_name(&test_name);
            if seen.contains(&key) {
                continue;
            }
            seen.insert(key);

            debug!(
                "test {}: value {:?} unit {:?} range {:?} (conf {:.1})",
                test_name, value, unit, reference_range, avg_confidence
            );

            results.push(TestResult {
                test_name,
                value,
                unit,
                confidence: round2(avg_confidence),
                reference_range,
                flag: None,
                expected_range: None,
                auto_correction: None,
            });
        }

        results
    }
}

impl Default for TestResultExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract a reference range from the tokens following the unit (or value).
///
/// Scans up to 6 tokens, collecting numeric components and range connectors
/// (`<`, `>`, dashes and "to", the latter normalized to `-`). A single token
/// already holding a complete "num-num" range short-circuits. The scan stops
/// at the first non-qualifying token once collection has started. The result
/// uses single spaces around dashes, or `None` when nothing qualified.
fn extract_reference_range(tokens: &[&str], start: usize) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut i = start;

    while i < tokens.len() && i < start + 6 {
        let token = tokens[i];

        if NUMERIC_TOKEN.is_match(token) {
            parts.push(token.to_string());
        } else if matches!(token, "<" | ">" | "-" | "–" | "—" | "to") {
            parts.push(if token == "<" || token == ">" {
                token.to_string()
            } else {
                "-".to_string()
            });
        } else if RANGE_TOKEN.is_match(token) {
            // Complete range in a single token, e.g. "12.0-15.5"
            return Some(DASH_RUN.replace_all(token, " - ").into_owned());
        } else if !parts.is_empty() {
            break;
        }

        i += 1;
    }

    if parts.is_empty() {
        return None;
    }

    let joined = parts.join(" ");
    let spaced = DASH_SPACING.replace_all(&joined, " - ");
    let normalized = WHITESPACE.replace_all(&spaced, " ").trim().to_string();

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}
