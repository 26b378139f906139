//! Centralized error types for ingo2zimbra.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the ingo2zimbra library.
///
/// Every variant is fatal for the mailbox being converted. Rules and
/// conditions that cannot be translated are not errors; they are skipped
/// and reported through [`crate::script::Diagnostics`].
#[derive(Error, Debug)]
pub enum ConvertError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified input file does not exist.
    #[error("Input file not found: {0}")]
    FileNotFound(PathBuf),

    /// The serialized preference value is malformed, even after repair.
    #[error("Malformed serialized data: {0}")]
    Decode(String),

    /// The decoded value does not have the shape of an Ingo rule list.
    #[error("Unexpected rule structure: {0}")]
    InvalidStructure(String),

    /// The preferences database could not be queried.
    #[error("Error while trying to fetch rules from database: {0}")]
    Database(String),

    /// The configuration or command line is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for `Result<T, ConvertError>`.
pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<rusqlite::Error> for ConvertError {
    fn from(source: rusqlite::Error) -> Self {
        Self::Database(source.to_string())
    }
}
