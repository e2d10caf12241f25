//! Error types for the synthesis crate.

use thiserror::Error;

/// Result type alias for synthesis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while constructing or driving generators.
#[derive(Error, Debug)]
pub enum Error {
    /// A caller-supplied parameter is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Create an invalid-argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
