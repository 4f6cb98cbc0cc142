//! Demographic field extraction from reconstructed lines.

use std::collections::BTreeMap;

use tracing::debug;

use super::patterns::FIELD_PATTERNS;
use super::round2;
use crate::layout::Line;
use crate::models::report::Field;

/// Words that start another field label; a Name capture never runs into one.
const LABEL_WORDS: &[&str] = &["patient", "age", "gender", "sex", "date", "doctor", "id"];

/// Extracts patient demographic fields using regex patterns.
///
/// Each field is claimed by the first matching line and never overwritten,
/// so a repeated label further down the page is ignored.
pub struct FieldExtractor {
    min_line_confidence: f64,
}

impl FieldExtractor {
    /// Create an extractor with the default 70.0 line confidence floor.
    pub fn new() -> Self {
        Self {
            min_line_confidence: 70.0,
        }
    }

    /// Set the minimum mean line confidence for a line to be considered.
    pub fn with_min_line_confidence(mut self, confidence: f64) -> Self {
        self.min_line_confidence = confidence;
        self
    }

    /// Extract all recognized fields from the page's lines.
    pub fn extract(&self, lines: &[Line]) -> BTreeMap<String, Field> {
        let mut fields: BTreeMap<String, Field> = BTreeMap::new();

        for line in lines {
            if line.is_empty() {
                continue;
            }

            let avg_confidence = line.mean_confidence();
            if avg_confidence < self.min_line_confidence {
                continue;
            }

            let text = line.text();

            for (name, pattern) in FIELD_PATTERNS.iter() {
                if fields.contains_key(*name) {
                    continue;
                }

                let Some(caps) = pattern.captures(&text) else {
                    continue;
                };

                let raw = caps[1].trim();
                let value = if *name == "Name" {
                    // The capture is greedy and may run into the next label
                    // on the same line ("... Smith Patient ID: ...").
                    match trim_label_words(raw) {
                        Some(value) => value,
                        None => continue,
                    }
                } else {
                    raw.to_string()
                };

                debug!("field {}: {:?} (conf {:.1})", name, value, avg_confidence);

                fields.insert(
                    (*name).to_string(),
                    Field {
                        value,
                        confidence: round2(avg_confidence),
                    },
                );
            }
        }

        fields
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop trailing words that begin another field's label. Returns `None` when
/// fewer than two name words remain, treating the capture as a non-match.
fn trim_label_words(value: &str) -> Option<String> {
    let mut words: Vec<&str> = value.split_whitespace().collect();

    while let Some(last) = words.last() {
        if LABEL_WORDS.contains(&last.to_lowercase().as_str()) {
            words.pop();
        } else {
            break;
        }
    }

    if words.len() < 2 {
        return None;
    }
    Some(words.join(" "))
}
