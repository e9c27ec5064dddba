//! Error types for deal loading and client state

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for deal operations
pub type DealResult<T> = Result<T, DealError>;

/// Deal and client-state errors
#[derive(Error, Debug)]
pub enum DealError {
    /// Deals file could not be read
    #[error("Failed to read deals file {path}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Deals document is not valid JSON
    #[error("Deals JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    /// Deals document has no array of records
    #[error("Deals document must be a JSON array or an object with a \"deals\" array")]
    NotAnArray,

    /// Record lacks a required field
    #[error("Deal record is missing '{0}'")]
    MissingField(&'static str),

    /// Email address rejected
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Client state store failure
    #[error(transparent)]
    Store(#[from] savemate_core::Error),
}
