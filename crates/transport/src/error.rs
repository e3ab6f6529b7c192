//! Transport Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A transport error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The exchange completed, but the server answered with a non-success
    /// status code.
    #[display("HTTP {status} from {url}")]
    Status {
        /// The requested URL.
        url: String,
        /// The status code the server answered with.
        status: u16,
    },
    /// The request never completed (DNS, connect, TLS, timeout, truncated body).
    #[display("network error for {url}: {reason}")]
    Network {
        /// The requested URL.
        url: String,
        /// Human readable description from the underlying client.
        reason: String,
    },
    /// The transport could not be constructed (bad TLS setup, invalid user agent).
    #[display("transport setup failed: {_0}")]
    Setup(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Network { .. } => true,
            Self::Setup(_) => false,
        }
    }

    /// The status code, when the exchange actually completed.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
