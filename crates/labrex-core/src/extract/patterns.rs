//! Regex patterns for lab report extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Demographic field patterns, evaluated in declared order per line.
    /// All patterns are case-insensitive, matching the tolerance OCR output
    /// needs. Evaluation order is part of the contract: the name of the
    /// first pattern to match a line claims that field for the line's value.
    pub static ref FIELD_PATTERNS: Vec<(&'static str, Regex)> = vec![
        (
            "Hospital",
            Regex::new(r"(?i)([A-Z][A-Za-z\s&]+(?:Hospital|Lab|Centre|Center|Clinic))").unwrap(),
        ),
        (
            "Name",
            Regex::new(r"(?i)(?:Patient\s+)?Name\s*[:\-]\s*([A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,3})")
                .unwrap(),
        ),
        (
            "Patient ID",
            Regex::new(r"(?i)(?:Patient\s+)?ID\s*[:\-]\s*([A-Z]{2,}\d{4,})\b").unwrap(),
        ),
        (
            "Age",
            Regex::new(r"(?i)Age\s*[:\-]\s*(\d{1,3})\s*(?:years?|yrs?)?\b").unwrap(),
        ),
        (
            "Gender",
            Regex::new(r"(?i)(?:Gender|Sex)\s*[:\-]\s*(Male|Female|M|F)\b").unwrap(),
        ),
        (
            "Date",
            Regex::new(r"(?i)Date\s*[:\-]\s*(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})\b").unwrap(),
        ),
        (
            "Doctor",
            Regex::new(r"(?i)Doctor\s*[:\-]?\s*(Dr\.?\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+){0,2})\b")
                .unwrap(),
        ),
    ];

    /// A measured value: plain decimal with optional fraction.
    pub static ref VALUE: Regex = Regex::new(r"^\d+\.?\d*$").unwrap();

    /// Accepted measurement units, matched against the lowercased token.
    pub static ref UNIT: Regex = Regex::new(
        r"^(mg/dl|g/dl|mmol/l|%|u/l|iu/l|million/[uµμ]l|thousand/[uµμ]l|cells/[uµμ]l)$"
    ).unwrap();

    /// A numeric reference-range component (digits and dots only).
    pub static ref NUMERIC_TOKEN: Regex = Regex::new(r"^[\d.]+$").unwrap();

    /// A complete range in a single token, e.g. "12.0-15.5".
    pub static ref RANGE_TOKEN: Regex =
        Regex::new(r"^\d+\.?\d*\s*[-–]\s*\d+\.?\d*$").unwrap();

    /// Dash run inside a single-token range, for normalization.
    pub static ref DASH_RUN: Regex = Regex::new(r"\s*[-–]\s*").unwrap();

    /// Plain dash with surrounding whitespace, for final spacing.
    pub static ref DASH_SPACING: Regex = Regex::new(r"\s*-\s*").unwrap();

    /// Whitespace run, collapsed to single spaces in normalized output.
    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    /// Page-number suffixes stripped when deriving a report's base identity.
    pub static ref PAGE_SUFFIX: Regex = Regex::new(r"_page\d+|_\d+").unwrap();
}
