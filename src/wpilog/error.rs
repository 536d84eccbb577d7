//! Decode and encode error types.

use thiserror::Error;

/// Errors surfaced while decoding a WPILOG buffer.
///
/// Truncation is not an error: a record cut short simply ends the stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Buffer is not a valid WPILOG (bad length, magic or version)")]
    InvalidHeader,

    #[error("Malformed control record: {0}")]
    MalformedControl(String),

    #[error("Unknown control record kind {0}")]
    UnknownControlKind(u8),
}

/// Errors raised while encoding records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    #[error("{what} of {len} bytes does not fit a 32-bit length field")]
    TooLong { what: &'static str, len: usize },
}
