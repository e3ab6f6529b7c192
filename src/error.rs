//! Command Line Error Types

use derive_more::{Display, Error};

/// A command-line error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for command-line operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("invalid configuration")]
    Config,
    #[display("could not set up the HTTP clients")]
    Transport,
    #[display("no folder given and no `root_folder` configured")]
    MissingFolder,
    #[display("could not list folder")]
    Listing,
    #[display("could not build the catalog")]
    Catalog,
    #[display("could not write the output")]
    Output,
}
