//! Error types for the poster editor core
//!
//! Parsing and sanitization never surface errors past the ingestion boundary;
//! a broken import degrades to a best-effort (possibly empty) tree. Only the
//! I/O edges of the system - reading import files, decoding uploads, and
//! delivering exported artifacts - produce values of [`EditorError`].

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the poster editor core.
#[derive(Debug, Error)]
pub enum EditorError {
    /// An import or upload file could not be read. The working document is
    /// left unchanged when this is returned.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Uploaded bytes were not a recognizable image format, so no data URI
    /// could be produced.
    #[error("unrecognized image data: {0}")]
    ImageFormat(String),

    /// The exported artifact could not be delivered. The working document is
    /// never mutated by a failed export, so retrying is always safe.
    #[error("export delivery failed: {0}")]
    Export(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;
