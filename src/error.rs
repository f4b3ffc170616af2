//! Global error handling for dirpack
//!
//! Only a failure to write the output document (or an invalid configuration
//! at startup) aborts a packing run; every other failure mode degrades the
//! run and keeps it going.

use std::io;
use thiserror::Error;

/// Global error type for dirpack operations
#[derive(Error, Debug)]
pub enum PackError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Failure to write the output document
    #[error("Failed to write output {path}: {source}")]
    OutputWrite {
        /// Destination path that could not be written
        path: String,
        /// Underlying IO error
        source: io::Error,
    },
}

/// Specialized Result type for dirpack operations
pub type Result<T> = std::result::Result<T, PackError>;

// Allow converting PackError to io::Error so main can stay io::Result
impl From<PackError> for io::Error {
    fn from(err: PackError) -> Self {
        match err {
            PackError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
