//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the labrex pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabrexConfig {
    /// Line reconstruction configuration.
    pub layout: LayoutConfig,

    /// Field and test extraction configuration.
    pub extraction: ExtractionConfig,
}

impl Default for LabrexConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

/// Line reconstruction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Maximum vertical distance (pixels) for a token to join the current line.
    pub y_tolerance: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { y_tolerance: 20 }
    }
}

/// Extraction confidence thresholds, in OCR percent (0 - 100).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Tokens at or below this confidence are dropped before grouping.
    pub min_token_confidence: f64,

    /// Lines below this mean confidence are skipped for field extraction.
    pub min_field_line_confidence: f64,

    /// Lines below this mean confidence are skipped for test extraction.
    pub min_test_line_confidence: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_token_confidence: 30.0,
            min_field_line_confidence: 70.0,
            min_test_line_confidence: 65.0,
        }
    }
}

impl LabrexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
