//! OCR token tables.
//!
//! A token is one OCR-recognized word with its bounding box and confidence.
//! Token tables are produced per page by the upstream OCR stage and stored
//! as CSV with columns `conf,text,left,top,width,height`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single OCR token: recognized text plus position and confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// OCR confidence in percent (0.0 - 100.0).
    #[serde(alias = "conf")]
    pub confidence: f64,

    /// Recognized text content.
    pub text: String,

    /// Left edge of the bounding box in pixels.
    pub left: u32,

    /// Top edge of the bounding box in pixels.
    pub top: u32,

    /// Bounding box width in pixels.
    pub width: u32,

    /// Bounding box height in pixels.
    pub height: u32,
}

/// Read a per-page token table from a CSV file.
pub fn read_token_table(path: &Path) -> Result<Vec<Token>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut tokens = Vec::new();

    for row in reader.deserialize() {
        let token: Token = row?;
        tokens.push(token);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_read_token_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "conf,text,left,top,width,height").unwrap();
        writeln!(file, "96.33,Hemoglobin,10,100,80,14").unwrap();
        writeln!(file, "88,14.2,120,101,30,14").unwrap();
        file.flush().unwrap();

        let tokens = read_token_table(file.path()).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "Hemoglobin");
        assert_eq!(tokens[0].confidence, 96.33);
        assert_eq!(tokens[1].left, 120);
        assert_eq!(tokens[1].top, 101);
    }

    #[test]
    fn test_read_token_table_missing_file() {
        let result = read_token_table(Path::new("does/not/exist_tokens.csv"));
        assert!(result.is_err());
    }
}
