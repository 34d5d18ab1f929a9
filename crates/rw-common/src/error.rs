//! Error types for the random-walk corpus tools.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for corpus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for corpus generation and assertion joining.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    // Input errors (20-29)
    #[error("invalid walk collection {path}: {reason}")]
    InvalidWalks { path: PathBuf, reason: String },

    #[error("invalid relation file {path}: {reason}")]
    InvalidRelationFile { path: PathBuf, reason: String },

    #[error("{path}:{line}: {reason}")]
    MalformedAssertion {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("relation '{0}' is not in the selected vocabulary")]
    UnknownRelation(String),

    // Worker errors (30-39)
    #[error("batch {batch} failed: {reason}")]
    Worker { batch: usize, reason: String },

    #[error("aggregation failed: {0}")]
    Aggregation(String),

    #[error("worker pool error: {0}")]
    Pool(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error at {path}: {source}")]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidConfig { .. } => 11,
            Error::InvalidWalks { .. } => 20,
            Error::InvalidRelationFile { .. } => 21,
            Error::MalformedAssertion { .. } => 22,
            Error::UnknownRelation(_) => 23,
            Error::Worker { .. } => 30,
            Error::Aggregation(_) => 31,
            Error::Pool(_) => 32,
            Error::Io(_) => 60,
            Error::IoAt { .. } => 61,
            Error::Json(_) => 62,
        }
    }

    /// Attach a path to an I/O error.
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::IoAt {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_grouped_by_category() {
        assert_eq!(Error::Config("x".into()).code() / 10, 1);
        assert_eq!(Error::UnknownRelation("isA".into()).code() / 10, 2);
        assert_eq!(
            Error::Worker {
                batch: 3,
                reason: "boom".into()
            }
            .code()
                / 10,
            3
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(Error::io_at("/tmp/x", io).code() / 10, 6);
    }

    #[test]
    fn test_io_at_message_names_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::io_at("/data/walks.json", io);
        assert!(err.to_string().contains("/data/walks.json"));
    }
}
