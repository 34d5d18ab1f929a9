//! Exit codes for the rw-corpus CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.

use rw_common::Error;

/// Exit codes for rw-corpus operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Completed successfully
    Ok = 0,

    /// Configuration error
    ConfigError = 10,

    /// Walk collection or relation file could not be parsed
    InputError = 11,

    /// A batch failed during formatting or aggregation
    WorkerError = 12,

    /// I/O error
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Ok)
    }

    /// Classify an error for process exit.
    pub fn for_error(err: &Error) -> Self {
        match err {
            Error::Config(_) | Error::InvalidConfig { .. } => ExitCode::ConfigError,
            Error::InvalidWalks { .. }
            | Error::InvalidRelationFile { .. }
            | Error::MalformedAssertion { .. }
            | Error::UnknownRelation(_) => ExitCode::InputError,
            Error::Worker { .. } | Error::Aggregation(_) => ExitCode::WorkerError,
            Error::Io(_) | Error::IoAt { .. } => ExitCode::IoError,
            Error::Pool(_) | Error::Json(_) => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}
