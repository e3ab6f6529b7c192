//! Drive Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A Drive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for Drive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The listing endpoint answered with a non-success status.
    #[display("listing request failed with HTTP {_0}")]
    Transport(#[error(not(source))] u16),
    /// The listing request never completed.
    #[display("listing request never completed")]
    Network,
    /// The listing response body is not the expected JSON document.
    #[display("listing response is not valid JSON")]
    Parse,
    /// Input is neither a Drive link nor a bare id.
    #[display("not a Google Drive link or id: {_0}")]
    InvalidUrl(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(status) => *status == 429 || *status >= 500,
            Self::Network => true,
            Self::Parse | Self::InvalidUrl(_) => false,
        }
    }
}
