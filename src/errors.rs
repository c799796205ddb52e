//! Error types for format parsing, packing and unpacking.

use thiserror::Error;

use crate::value::Value;

/// Errors produced while interpreting a format string against a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The format string contains a character outside the directive table.
    #[error("unknown format type '{0}'")]
    UnknownDirective(char),
    /// The buffer has fewer remaining bytes than the directive needs.
    #[error(
        "insufficient buffer space for format: {required} bytes needed at offset {offset}, {available} available"
    )]
    InsufficientSpace {
        offset: usize,
        required: usize,
        available: usize,
    },
    /// A Pascal string span must hold the length byte and at most 255 payload bytes.
    #[error("Pascal string space must be between 1 and 256 bytes, got {0}")]
    PascalCapacity(usize),
    /// The argument list ran out before the format did.
    #[error("missing argument #{index} for format type '{directive}'")]
    MissingArgument { index: usize, directive: char },
    /// The argument's tag does not match the directive's type.
    #[error("argument #{index} is {found}, format type '{directive}' expects another type")]
    ArgumentMismatch {
        index: usize,
        directive: char,
        found: &'static str,
    },
    /// Digits at the end of the format with no directive after them.
    #[error("repeat count {0} is not followed by a format type")]
    TrailingCount(usize),
    /// A repeat count does not fit in `usize`.
    #[error("repeat count overflows")]
    CountOverflow,
}

/// An [Error] raised by unpack, carrying the values decoded before the failure.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{error} (after {} decoded values)", .decoded.len())]
pub struct UnpackError {
    pub error: Error,
    pub decoded: Vec<Value>,
}

impl UnpackError {
    pub fn into_parts(self) -> (Error, Vec<Value>) {
        (self.error, self.decoded)
    }
}

impl From<UnpackError> for Error {
    fn from(value: UnpackError) -> Self {
        value.error
    }
}
