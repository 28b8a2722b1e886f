//! Error types for the Scenarist library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Scenarist operations.
#[derive(Debug, Error)]
pub enum ScenaristError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bad upload archive: not a zip, or expected members missing.
    #[error("Archive error: {0}")]
    Archive(String),

    /// Empty file or no data to work with.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Invalid change specifications (e.g. conflicting change kinds).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The intent interpreter could not turn free text into changes.
    #[error("Interpretation error: {0}")]
    Interpretation(String),

    /// Configuration error (missing API key, bad endpoint, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Scenario store failure (save/list/delete).
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// CSV/zip export failure.
    #[error("Export error: {0}")]
    Export(String),
}

/// Result type alias for Scenarist operations.
pub type Result<T> = std::result::Result<T, ScenaristError>;
