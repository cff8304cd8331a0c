//! Error types for the sigmark library.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors surfaced before any comparison is evaluated.
///
/// Per-comparison problems (too few observations, degenerate samples) are not
/// errors; they are reported as [`crate::Diagnostic`]s on the result.
#[derive(Debug, Error)]
pub enum SigmarkError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A cell could not be interpreted.
    #[error("Parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to annotate.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Invalid option value or malformed comparison list.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A mapped field does not exist in the input table.
    #[error("Column '{name}' not found (available: {})", available.join(", "))]
    MissingColumn { name: String, available: Vec<String> },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for sigmark operations.
pub type Result<T> = std::result::Result<T, SigmarkError>;
