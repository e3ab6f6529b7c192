//! Config Error Types

use derive_more::{Display, Error};

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A configuration source couldn't be read or doesn't match the expected
    /// shape. See the error tree for the offending file or key.
    #[display("could not load configuration")]
    Load,
    /// No usable Drive API key in any source.
    #[display("no Google Drive API key configured (set `api_key`, VITRINA_API_KEY or --api-key)")]
    MissingApiKey,
    /// A proxy endpoint isn't an absolute HTTP(S) URL.
    #[display("proxy endpoint is not an http(s) URL: {_0}")]
    InvalidProxy(#[error(not(source))] String),
}

impl ErrorKind {
    /// Configuration errors never go away on their own.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
