//! Per-page processing: token table in, validated page result out.

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::extract::{FieldExtractor, TestLexicon, TestResultExtractor};
use crate::layout::LineReconstructor;
use crate::models::config::LabrexConfig;
use crate::models::report::PageResult;
use crate::tokens::{read_token_table, Token};
use crate::validate::Validator;

/// Runs the full extraction pipeline for one page.
///
/// Tokens are filtered by confidence, grouped into lines, and scanned for
/// demographics and test results; each test result is then validated. A page
/// with no usable tokens yields an empty result, not an error.
pub struct PageProcessor {
    min_token_confidence: f64,
    reconstructor: LineReconstructor,
    field_extractor: FieldExtractor,
    test_extractor: TestResultExtractor,
    validator: Validator,
}

impl PageProcessor {
    /// Create a processor with default thresholds and the built-in lexicon.
    pub fn new() -> Self {
        Self::from_config(&LabrexConfig::default())
    }

    /// Create a processor from a configuration.
    pub fn from_config(config: &LabrexConfig) -> Self {
        Self {
            min_token_confidence: config.extraction.min_token_confidence,
            reconstructor: LineReconstructor::new().with_y_tolerance(config.layout.y_tolerance),
            field_extractor: FieldExtractor::new()
                .with_min_line_confidence(config.extraction.min_field_line_confidence),
            test_extractor: TestResultExtractor::new()
                .with_min_line_confidence(config.extraction.min_test_line_confidence),
            validator: Validator::new(),
        }
    }

    /// Replace the test lexicon used for extraction and validation.
    pub fn with_lexicon(mut self, lexicon: TestLexicon) -> Self {
        self.test_extractor = self.test_extractor.with_lexicon(lexicon.clone());
        self.validator = self.validator.with_lexicon(lexicon);
        self
    }

    /// Process one page's tokens into a validated [`PageResult`].
    pub fn process_tokens(&self, tokens: Vec<Token>) -> PageResult {
        let kept: Vec<Token> = tokens
            .into_iter()
            .filter(|t| t.confidence > self.min_token_confidence)
            .collect();

        if kept.is_empty() {
            return PageResult::default();
        }

        let lines = self.reconstructor.reconstruct(&kept);

        debug!("found {} lines", lines.len());
        for (i, line) in lines.iter().take(10).enumerate() {
            debug!("line {}: (conf={:.1}) {}", i, line.mean_confidence(), line.text());
        }

        let fields = self.field_extractor.extract(&lines);
        let mut test_results = self.test_extractor.extract(&lines);
        for test in &mut test_results {
            self.validator.validate(test);
        }

        PageResult {
            fields,
            test_results,
        }
    }

    /// Load a token table from disk and process it.
    pub fn process_file(&self, path: &Path) -> Result<PageResult> {
        let tokens = read_token_table(path)?;
        Ok(self.process_tokens(tokens))
    }
}

impl Default for PageProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token(text: &str, left: u32, top: u32, confidence: f64) -> Token {
        Token {
            confidence,
            text: text.to_string(),
            left,
            top,
            width: 40,
            height: 12,
        }
    }

    #[test]
    fn test_rbc_count_end_to_end() {
        let tokens = vec![
            token("RBC", 10, 100, 90.0),
            token("Count", 60, 101, 90.0),
            token("45", 120, 100, 90.0),
            token("million/uL", 160, 101, 85.0),
        ];

        let page = PageProcessor::new().process_tokens(tokens);

        assert_eq!(page.test_results.len(), 1);
        let result = &page.test_results[0];
        assert_eq!(result.test_name, "RBC Count");
        assert_eq!(result.value, "4.5");
        assert_eq!(result.unit, "million/μL");
        assert_eq!(result.confidence, 88.75);
        assert_eq!(
            result.auto_correction.as_deref(),
            Some("Decimal correction: 45 → 4.5")
        );
        assert_eq!(result.flag, None);
    }

    #[test]
    fn test_low_confidence_tokens_dropped() {
        let tokens = vec![
            token("Hemoglobin", 10, 100, 90.0),
            token("14.2", 120, 100, 90.0),
            // Noise below the floor must not disturb the line
            token("xx", 60, 100, 12.0),
        ];

        let page = PageProcessor::new().process_tokens(tokens);

        assert_eq!(page.test_results.len(), 1);
        assert_eq!(page.test_results[0].value, "14.2");
    }

    #[test]
    fn test_all_tokens_filtered_yields_empty_result() {
        let tokens = vec![token("noise", 10, 100, 20.0), token("more", 60, 100, 30.0)];

        let page = PageProcessor::new().process_tokens(tokens);

        assert!(page.is_empty());
    }

    #[test]
    fn test_fields_and_tests_from_one_page() {
        let tokens = vec![
            token("Patient", 10, 40, 88.0),
            token("Name:", 70, 41, 88.0),
            token("John", 120, 40, 88.0),
            token("Smith", 160, 41, 88.0),
            token("Hemoglobin", 10, 100, 92.0),
            token("14.2", 120, 101, 92.0),
            token("g/dL", 160, 100, 92.0),
        ];

        let page = PageProcessor::new().process_tokens(tokens);

        assert_eq!(page.fields["Name"].value, "John Smith");
        assert_eq!(page.test_results[0].test_name, "Hemoglobin");
        assert_eq!(page.test_results[0].unit, "g/dL");
    }

    #[test]
    fn test_idempotent_output() {
        let tokens = vec![
            token("WBC", 10, 100, 80.0),
            token("Count", 60, 100, 80.0),
            token("7.2", 120, 100, 80.0),
        ];

        let processor = PageProcessor::new();
        let first = processor.process_tokens(tokens.clone());
        let second = processor.process_tokens(tokens);

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_process_file_missing_is_error() {
        let processor = PageProcessor::new();
        assert!(processor.process_file(Path::new("missing_tokens.csv")).is_err());
    }
}
