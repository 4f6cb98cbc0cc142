//! Error types for the labrex-core library.

use thiserror::Error;

/// Main error type for the labrex library.
#[derive(Error, Debug)]
pub enum LabrexError {
    /// Failed to read or parse a token table.
    #[error("failed to read token table: {0}")]
    TokenTable(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for the labrex library.
pub type Result<T> = std::result::Result<T, LabrexError>;
