//! Error types for document load/save operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing a regions document.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document is not valid JSON or does not have the expected shape
    #[error("Malformed document: {message}")]
    MalformedDocument {
        /// Description of the problem, including where it was found
        message: String,
    },

    /// The finished temporary file could not be moved over the destination
    #[error("Failed to replace {path:?}: {source}")]
    Persist {
        /// Destination that was left untouched
        path: PathBuf,
        /// Underlying rename error
        #[source]
        source: std::io::Error,
    },
}

impl FormatError {
    /// Create a malformed document error with a message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }

    /// Check if this error describes a document shape or syntax problem.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedDocument { .. })
    }
}
