//! Error types for the tabsight library.
//!
//! The statistical core never returns these for malformed data; it degrades to
//! empty insights instead. Errors are reserved for I/O at the edges and for
//! contract violations between callers and the engine.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tabsight operations.
#[derive(Debug, Error)]
pub enum TabsightError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library (only surfaced when writing shards).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error saving or loading insight documents.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The narrative generator failed.
    #[error("Narrative error: {0}")]
    Narrative(String),

    /// A caller handed the engine inputs that break its contract.
    #[error("Precondition failed: {0}")]
    Precondition(String),
}

/// Result type alias for tabsight operations.
pub type Result<T> = std::result::Result<T, TabsightError>;
