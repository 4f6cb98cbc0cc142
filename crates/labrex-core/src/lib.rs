//! Core library for lab report extraction.
//!
//! This crate provides:
//! - OCR token table ingestion (one CSV per scanned page)
//! - Line reconstruction from token bounding boxes
//! - Rule-based extraction of patient demographics and test results
//! - Validation and auto-correction of extracted test results
//! - Multi-page report merging

pub mod error;
pub mod models;
pub mod tokens;
pub mod layout;
pub mod extract;
pub mod validate;
pub mod pipeline;

pub use error::{LabrexError, Result};
pub use models::config::LabrexConfig;
pub use models::report::{Field, Flag, PageResult, TestResult};
pub use tokens::{read_token_table, Token};
pub use layout::{Line, LineReconstructor};
pub use extract::{FieldExtractor, TestLexicon, TestResultExtractor};
pub use validate::Validator;
pub use pipeline::{merge_extraction_dir, MergeOutcome, PageProcessor};
