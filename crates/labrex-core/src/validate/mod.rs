//! Validation and auto-correction of extracted test results.
//!
//! Corrections compensate for known OCR error patterns (lost decimal points,
//! missing or misread units). Suspicious values are flagged, never dropped:
//! the downstream human review stage is the authority of last resort.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use crate::extract::TestLexicon;
use crate::models::report::{Flag, TestResult};

/// Applies unit backfill, decimal-shift correction and range flagging.
pub struct Validator {
    lexicon: TestLexicon,
}

impl Validator {
    /// Create a validator over the built-in lexicon.
    pub fn new() -> Self {
        Self {
            lexicon: TestLexicon::builtin(),
        }
    }

    /// Replace the test lexicon.
    pub fn with_lexicon(mut self, lexicon: TestLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Validate and auto-correct a single test result in place.
    ///
    /// Rules run in a fixed order; a later correction note overwrites an
    /// earlier one, so at most one note survives. An unparseable value is
    /// flagged and left untouched, skipping the numeric rules.
    pub fn validate(&self, result: &mut TestResult) {
        // Backfill a missing unit from the lexicon
        if result.unit.is_empty() {
            if let Some(unit) = self.lexicon.expected_unit(&result.test_name) {
                result.unit = unit.to_string();
                result.auto_correction = Some("Added missing unit".to_string());
            }
        }

        // Normalize unit spelling (uL → μL)
        if !result.unit.is_empty() {
            let original = result.unit.clone();
            let normalized = original.replace("uL", "μL").replace("ul", "μL");
            if normalized != original {
                result.unit = normalized.clone();
                if result.auto_correction.is_none() {
                    result.auto_correction =
                        Some(format!("Normalized unit: {} → {}", original, normalized));
                }
            }
        }

        let Ok(numeric_value) = parse_decimal_value(&result.value) else {
            result.flag = Some(Flag::InvalidNumericValue);
            debug!("{}: value {:?} is not numeric", result.test_name, result.value);
            return;
        };

        // Decimal-shift correction for counts where OCR commonly drops the
        // decimal point ("4.5" read as "45")
        let mut current_value = numeric_value;
        let shift_window = match result.test_name.as_str() {
            "RBC Count" => Some((Decimal::from(40), Decimal::from(60))),
            "WBC Count" => Some((Decimal::from(40), Decimal::from(120))),
            _ => None,
        };

        if let Some((low, high)) = shift_window {
            if current_value >= low && current_value <= high {
                let corrected = current_value * Decimal::new(1, 1);
                result.auto_correction =
                    Some(format!("Decimal correction: {} → {}", result.value, corrected));
                result.value = corrected.to_string();
                current_value = corrected;
            }
        }

        // Flag values outside the expected range for the test
        if let Some(range) = self.lexicon.expected_range(&result.test_name) {
            if !range.contains(current_value) {
                result.flag = Some(Flag::OutOfExpectedRange);
                result.expected_range = Some(range.display());
                debug!(
                    "{}: value {} outside expected range {}",
                    result.test_name,
                    result.value,
                    range.display()
                );
            }
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a measured value as a decimal, tolerating a trailing dot ("45.").
fn parse_decimal_value(value: &str) -> Result<Decimal, rust_decimal::Error> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    Decimal::from_str(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(name: &str, value: &str, unit: &str) -> TestResult {
        TestResult {
            test_name: name.to_string(),
            value: value.to_string(),
            unit: unit.to_string(),
            confidence: 90.0,
            reference_range: None,
            flag: None,
            expected_range: None,
            auto_correction: None,
        }
    }

    #[test]
    fn test_missing_unit_backfilled() {
        let mut r = result("Hemoglobin", "14.2", "");
        Validator::new().validate(&mut r);

        assert_eq!(r.unit, "g/dL");
        assert_eq!(r.auto_correction.as_deref(), Some("Added missing unit"));
        assert_eq!(r.flag, None);
    }

    #[test]
    fn test_unknown_test_unit_left_empty() {
        let mut r = result("Mystery", "1.0", "");
        Validator::new().validate(&mut r);

        assert_eq!(r.unit, "");
        assert_eq!(r.auto_correction, None);
    }

    #[test]
    fn test_unit_normalized() {
        let mut r = result("Platelet Count", "250", "thousand/uL");
        Validator::new().validate(&mut r);

        assert_eq!(r.unit, "thousand/μL");
        assert_eq!(
            r.auto_correction.as_deref(),
            Some("Normalized unit: thousand/uL → thousand/μL")
        );
    }

    #[test]
    fn test_normalization_note_does_not_overwrite_backfill_note() {
        use std::collections::HashMap;
        use crate::extract::{ExpectedRange, TestLexicon};

        // A lexicon whose expected unit still carries the "ul" spelling:
        // the backfill note must survive the subsequent normalization.
        let mut units = HashMap::new();
        units.insert("Ferritin".to_string(), "ng/ul".to_string());
        let lexicon = TestLexicon::new(
            Vec::new(),
            vec!["ferritin".to_string()],
            units,
            HashMap::<String, ExpectedRange>::new(),
        );

        let mut r = result("Ferritin", "120", "");
        Validator::new().with_lexicon(lexicon).validate(&mut r);

        assert_eq!(r.unit, "ng/μL");
        assert_eq!(r.auto_correction.as_deref(), Some("Added missing unit"));
    }

    #[test]
    fn test_invalid_value_flagged_and_kept() {
        let mut r = result("Hemoglobin", "14..2", "g/dL");
        Validator::new().validate(&mut r);

        assert_eq!(r.flag, Some(Flag::InvalidNumericValue));
        assert_eq!(r.value, "14..2");
        assert_eq!(r.expected_range, None);
    }

    #[test]
    fn test_trailing_dot_value_parses() {
        let mut r = result("Hemoglobin", "14.", "g/dL");
        Validator::new().validate(&mut r);

        assert_eq!(r.flag, None);
        assert_eq!(r.value, "14.");
    }

    #[test]
    fn test_rbc_decimal_shift() {
        let mut r = result("RBC Count", "45", "million/μL");
        Validator::new().validate(&mut r);

        assert_eq!(r.value, "4.5");
        assert_eq!(
            r.auto_correction.as_deref(),
            Some("Decimal correction: 45 → 4.5")
        );
        assert_eq!(r.flag, None);
    }

    #[test]
    fn test_wbc_decimal_shift_window() {
        let mut r = result("WBC Count", "118", "thousand/μL");
        Validator::new().validate(&mut r);
        assert_eq!(r.value, "11.8");

        // Below the window: no correction, and in range
        let mut r = result("WBC Count", "12", "thousand/μL");
        Validator::new().validate(&mut r);
        assert_eq!(r.value, "12");
        assert_eq!(r.auto_correction, None);
    }

    #[test]
    fn test_decimal_shift_note_overwrites_unit_note() {
        let mut r = result("RBC Count", "45", "million/uL");
        Validator::new().validate(&mut r);

        assert_eq!(r.unit, "million/μL");
        assert_eq!(r.value, "4.5");
        assert_eq!(
            r.auto_correction.as_deref(),
            Some("Decimal correction: 45 → 4.5")
        );
    }

    #[test]
    fn test_out_of_range_flagged_value_retained() {
        let mut r = result("Hemoglobin", "35", "g/dL");
        Validator::new().validate(&mut r);

        assert_eq!(r.flag, Some(Flag::OutOfExpectedRange));
        assert_eq!(r.expected_range.as_deref(), Some("5 - 20"));
        assert_eq!(r.value, "35");
    }

    #[test]
    fn test_range_law_boundaries_inclusive() {
        for value in ["5", "20"] {
            let mut r = result("Hemoglobin", value, "g/dL");
            Validator::new().validate(&mut r);
            assert_eq!(r.flag, None, "boundary value {value} must not be flagged");
        }

        for value in ["4.9", "20.1"] {
            let mut r = result("Hemoglobin", value, "g/dL");
            Validator::new().validate(&mut r);
            assert_eq!(
                r.flag,
                Some(Flag::OutOfExpectedRange),
                "value {value} must be flagged"
            );
        }
    }

    #[test]
    fn test_range_check_uses_corrected_value() {
        // 52 would be far outside the RBC range, but the decimal shift
        // brings it to 5.2 which is in range.
        let mut r = result("RBC Count", "52", "million/μL");
        Validator::new().validate(&mut r);

        assert_eq!(r.value, "5.2");
        assert_eq!(r.flag, None);
    }

    #[test]
    fn test_decimal_correction_keeps_scale() {
        let mut r = result("WBC Count", "120", "thousand/μL");
        Validator::new().validate(&mut r);
        assert_eq!(r.value, "12.0");
        assert_eq!(
            r.auto_correction.as_deref(),
            Some("Decimal correction: 120 → 12.0")
        );
    }
}
