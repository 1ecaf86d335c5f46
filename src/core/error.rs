//! Error types for listing-dl
//!
//! Provides error handling for listing fetches, downloads and the ledger.

use std::fmt;
use std::path::PathBuf;

/// Main error type for listing-dl operations
#[derive(Debug)]
pub enum Error {
    /// Non-success HTTP status or protocol-level failure
    HttpError(String),

    /// Network connectivity issues (connect failure, timeout)
    NetworkError(String),

    /// File I/O error on the downloaded artifact
    IoError(std::io::Error),

    /// Reading or appending the download ledger failed
    LedgerIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid configuration or parameters
    InvalidInput(String),

    /// The transfer broke off after the file was created; the partial file was removed
    StreamInterrupted {
        path: PathBuf,
        bytes_written: u64,
        reason: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::HttpError(msg) => {
                write!(f, "HTTP error: {msg}")
            }
            Error::NetworkError(msg) => {
                write!(f, "Network error: {msg}")
            }
            Error::IoError(err) => {
                write!(f, "I/O error: {err}")
            }
            Error::LedgerIo { path, source } => {
                write!(f, "Ledger error ({}): {source}", path.display())
            }
            Error::InvalidInput(msg) => {
                write!(f, "Invalid input: {msg}")
            }
            Error::StreamInterrupted {
                path,
                bytes_written,
                reason,
            } => {
                write!(
                    f,
                    "Download of {} interrupted after {bytes_written} bytes: {reason}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            Error::LedgerIo { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Error::NetworkError(err.to_string())
        } else {
            Error::HttpError(err.to_string())
        }
    }
}

/// Convenience result type for listing-dl operations
pub type Result<T> = std::result::Result<T, Error>;
