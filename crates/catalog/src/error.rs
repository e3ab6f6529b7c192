//! Catalog Error Types
//!
//! Only failures that make the whole catalog meaningless are errors. Anything
//! going wrong with a single product becomes a
//! [`CatalogEvent::Skipped`](crate::CatalogEvent::Skipped) instead.

use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The root link doesn't identify a Drive folder. Fix the input.
    #[display("root folder link is not a Google Drive folder")]
    InvalidRootUrl,
    /// The root folder couldn't be listed (wrong API key, folder not shared,
    /// quota, network). See the error tree.
    #[display("could not list the root folder")]
    Listing,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InvalidRootUrl => false,
            Self::Listing => true,
        }
    }
}
