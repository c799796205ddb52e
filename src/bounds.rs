//! Span checks run before every directive touches the buffer.

use std::ops::Range;

use crate::errors::Error;

/// Returns the byte range `offset..offset + required` if it fits in a buffer of
/// `len` bytes, or [Error::InsufficientSpace] otherwise.
pub fn require(len: usize, offset: usize, required: usize) -> Result<Range<usize>, Error> {
    let available = len.saturating_sub(offset);
    if required > available {
        return Err(Error::InsufficientSpace {
            offset,
            required,
            available,
        });
    }

    Ok(offset..offset + required)
}

/// Span of `count` items of `width` bytes each. Overflow is reported as a
/// span no buffer can hold.
pub fn span(len: usize, offset: usize, width: usize, count: usize) -> Result<Range<usize>, Error> {
    match width.checked_mul(count) {
        Some(required) => require(len, offset, required),
        None => Err(Error::InsufficientSpace {
            offset,
            required: usize::MAX,
            available: len.saturating_sub(offset),
        }),
    }
}
