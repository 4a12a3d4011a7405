//! Error types for note migration.
//!
//! All errors in the system are represented by the [`Error`] enum.
//! The four per-file kinds (`NotFound`, `ReadError`, `WriteError`,
//! `ProcessingError`) are what a batch records for a failed note.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// The core error type for all migration operations.
#[derive(ThisError, Debug)]
pub enum Error {
    /// Input path does not exist
    #[error("Not found: {path}")]
    NotFound { path: PathBuf },

    /// Input exists but cannot be read as UTF-8 text
    #[error("Cannot read {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    /// Destination cannot be written
    #[error("Cannot write {path}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    /// Any other failure while migrating one note
    #[error("Failed to process {path}: {reason}")]
    ProcessingError { path: PathBuf, reason: String },

    /// Invalid configuration
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`], as it appears in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Read,
    Write,
    Processing,
    Config,
}

impl Error {
    /// Create a not found error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Error::NotFound { path: path.into() }
    }

    /// Create a read error
    pub fn read_error(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::ReadError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a write error
    pub fn write_error(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::WriteError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a processing error
    pub fn processing_error(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::ProcessingError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a configuration error
    pub fn config_error(reason: impl Into<String>) -> Self {
        Error::ConfigError {
            reason: reason.into(),
        }
    }

    /// Classify a read failure: a missing file is `NotFound`, anything else
    /// (permissions, invalid UTF-8) is `ReadError`.
    pub fn from_read(path: impl Into<PathBuf>, err: io::Error) -> Self {
        let path = path.into();
        if err.kind() == io::ErrorKind::NotFound {
            Error::NotFound { path }
        } else {
            Error::read_error(path, err)
        }
    }

    /// Which kind of failure this is
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::ReadError { .. } => ErrorKind::Read,
            Error::WriteError { .. } => ErrorKind::Write,
            Error::ProcessingError { .. } => ErrorKind::Processing,
            Error::ConfigError { .. } => ErrorKind::Config,
        }
    }
}
