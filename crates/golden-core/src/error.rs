//! Error types for golden file comparison.

use std::path::PathBuf;

use thiserror::Error;

use crate::GoldenKey;

/// Main error type for golden file operations.
///
/// A byte mismatch is not an error: comparators report it as an outcome.
/// Errors mean the comparison could not be performed at all.
#[derive(Debug, Error)]
pub enum Error {
    /// The golden file does not exist on disk
    #[error("Could not be compared against non-existent file: \"{key}\" ({})", .path.display())]
    MissingGolden {
        /// Key the caller asked for
        key: GoldenKey,
        /// Path the key resolved to
        path: PathBuf,
    },

    /// Update requested before a real comparator was installed
    #[error("Golden file comparator has not been initialized")]
    NotInitialized,

    /// Key does not name a file under the base directory
    #[error("Invalid golden key: {0}")]
    InvalidKey(String),

    /// Test file location could not be turned into a base directory
    #[error("Invalid test file location: {0}")]
    InvalidTestLocation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error reports a golden file that does not exist.
    pub fn is_missing_golden(&self) -> bool {
        matches!(self, Error::MissingGolden { .. })
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
