//! Error types for RIFF WAVE reading and writing.

use thiserror::Error;

/// Result type alias for wave-io operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while scanning, decoding, or encoding RIFF WAVE streams.
#[derive(Error, Debug)]
pub enum Error {
    /// The stream does not begin with `RIFF`/`WAVE` framing.
    #[error("not a RIFF WAVE stream")]
    NotRiffWave,

    /// A format-code/bit-depth combination with no defined sample mapping,
    /// or a required chunk is missing at decode time.
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// A caller-supplied parameter is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Underlying file or stream failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an unsupported-encoding error.
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Error::UnsupportedEncoding(msg.into())
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
