//! # structpack
//!
//! Convert between typed values and flat byte buffers using compact format
//! strings, in the spirit of Python's `struct` module.
//!
//! A format string is a sequence of directives such as `"<2hI8s"`: an optional
//! repeat count followed by a type character. Byte order starts as the native
//! order of the platform and can be switched anywhere in the format with `<`
//! (little-endian), `>` or `!` (big-endian) and `=` (native). Whitespace is
//! ignored. See [format] for the full directive table.
//!
//! Arguments are [Value]s, a tagged type with one variant per directive type,
//! so a value that does not match its directive is reported as an error
//! instead of being reinterpreted.
//!
//! ## Example
//!
//! ```
//! use structpack::{pack, unpack, Value};
//!
//! let mut buf = [0u8; 10];
//! let args = [Value::U32(0x04030201), Value::from("Rio")];
//! pack("<I 6s", &mut buf, &args).unwrap();
//! assert_eq!(&buf[..4], &[1, 2, 3, 4]);
//!
//! let values = unpack("<I 6s", &buf).unwrap();
//! assert_eq!(values, args.to_vec());
//! ```
//!
//! Strings longer than their span are truncated silently; unpacking strips NUL
//! bytes from both ends of a fixed-length string.

pub mod bounds;
pub mod codec;
pub mod errors;
pub mod format;
pub mod order;
pub mod scalar;
pub mod strings;
pub mod value;

pub use errors::{Error, UnpackError};
pub use format::{Count, Directive, Format, Kind, Parser, Token};
pub use order::ByteOrder;
pub use value::Value;

/// Packs `args` into `buf` according to `format`, starting at offset 0.
///
/// The format is parsed lazily: directives before an invalid character or an
/// overflowing span have already been written when the error is returned.
pub fn pack(format: &str, buf: &mut [u8], args: &[Value]) -> Result<(), Error> {
    codec::pack(Parser::new(format), buf, args)
}

/// Unpacks the values described by `format` from `buf`.
pub fn unpack(format: &str, buf: &[u8]) -> Result<Vec<Value>, UnpackError> {
    codec::unpack(Parser::new(format), buf)
}

/// Packs `args` into a new buffer sized exactly for them.
pub fn pack_to_vec(format: &str, args: &[Value]) -> Result<Vec<u8>, Error> {
    Format::parse(format)?.pack_to_vec(args)
}
