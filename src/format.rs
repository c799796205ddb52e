//! Format strings: directive kinds, the lazy [Parser] and the compiled [Format].
//!
//! A format string is a sequence of directives. Each directive is an optional
//! decimal repeat count followed by one character:
//!
//! | char   | kind            | width |
//! |--------|-----------------|-------|
//! | `x`    | pad byte        | 1     |
//! | `c`    | char            | 1     |
//! | `b`/`B`| `i8`/`u8`       | 1     |
//! | `?`    | `bool`          | 1     |
//! | `h`/`H`| `i16`/`u16`     | 2     |
//! | `i`/`l`, `I`/`L` | `i32`, `u32` | 4 |
//! | `q`/`Q`| `i64`/`u64`     | 8     |
//! | `f`/`d`| `f32`/`f64`     | 4 / 8 |
//! | `s`    | fixed string    | count |
//! | `p`    | Pascal string   | count |
//!
//! `<`, `>`, `!` and `=` switch the byte order; whitespace is ignored.

use std::{fmt, iter::Peekable, str::CharIndices, str::FromStr};

use crate::{
    codec,
    errors::{Error, UnpackError},
    order::ByteOrder,
    value::Value,
};

/// The type or operation selected by a directive character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Pad,
    Char,
    I8,
    U8,
    Bool,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    /// Zero-padded string spanning exactly `count` bytes.
    FixedString,
    /// Length byte followed by `count - 1` payload bytes.
    PascalString,
}

impl Kind {
    pub fn from_char(c: char) -> Option<Self> {
        let kind = match c {
            'x' => Kind::Pad,
            'c' => Kind::Char,
            'b' => Kind::I8,
            'B' => Kind::U8,
            '?' => Kind::Bool,
            'h' => Kind::I16,
            'H' => Kind::U16,
            'i' | 'l' => Kind::I32,
            'I' | 'L' => Kind::U32,
            'q' => Kind::I64,
            'Q' => Kind::U64,
            'f' => Kind::F32,
            'd' => Kind::F64,
            's' => Kind::FixedString,
            'p' => Kind::PascalString,
            _ => return None,
        };

        Some(kind)
    }

    /// Canonical directive character (`i`/`I` for the 32-bit aliases).
    pub fn as_char(self) -> char {
        match self {
            Kind::Pad => 'x',
            Kind::Char => 'c',
            Kind::I8 => 'b',
            Kind::U8 => 'B',
            Kind::Bool => '?',
            Kind::I16 => 'h',
            Kind::U16 => 'H',
            Kind::I32 => 'i',
            Kind::U32 => 'I',
            Kind::I64 => 'q',
            Kind::U64 => 'Q',
            Kind::F32 => 'f',
            Kind::F64 => 'd',
            Kind::FixedString => 's',
            Kind::PascalString => 'p',
        }
    }

    /// Bytes per repetition. Strings are one byte per count unit.
    pub fn width(self) -> usize {
        match self {
            Kind::Pad | Kind::Char | Kind::I8 | Kind::U8 | Kind::Bool => 1,
            Kind::I16 | Kind::U16 => 2,
            Kind::I32 | Kind::U32 | Kind::F32 => 4,
            Kind::I64 | Kind::U64 | Kind::F64 => 8,
            Kind::FixedString | Kind::PascalString => 1,
        }
    }

    /// Strings consume one argument for the whole count instead of one per repetition.
    pub fn is_block(self) -> bool {
        matches!(self, Kind::FixedString | Kind::PascalString)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Repeat count of a directive as written in the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    Explicit(usize),
    /// No digits. Means 1, except for `p` where the span comes from the data.
    Implicit,
}

/// A data directive: a kind plus its repeat count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    pub kind: Kind,
    pub count: Count,
}

impl Directive {
    /// Count with the default of 1 applied. Implicit `p` counts are resolved
    /// by the codec instead.
    pub fn count_or_default(&self) -> usize {
        match self.count {
            Count::Explicit(n) => n,
            Count::Implicit => 1,
        }
    }
}

/// One element produced by the [Parser].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Order(ByteOrder),
    Data(Directive),
}

/// Lazy tokenizer over a format string.
///
/// Whitespace is skipped, and a repeat count placed before whitespace or an
/// order character is discarded. The iterator stops after the first error.
pub struct Parser<'a> {
    chars: Peekable<CharIndices<'a>>,
    failed: bool,
}

impl<'a> Parser<'a> {
    pub fn new(format: &'a str) -> Self {
        Self {
            chars: format.char_indices().peekable(),
            failed: false,
        }
    }

    fn read_count(&mut self) -> Result<Option<usize>, Error> {
        let mut count: Option<usize> = None;

        while let Some((_, digit)) = self.chars.next_if(|&(_, c)| c.is_ascii_digit()) {
            let digit = (digit as u8 - b'0') as usize;
            let current = count.unwrap_or(0);
            count = Some(
                current
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(digit))
                    .ok_or(Error::CountOverflow)?,
            );
        }

        Ok(count)
    }

    fn fail(&mut self, error: Error) -> Option<Result<Token, Error>> {
        self.failed = true;
        Some(Err(error))
    }
}

impl Iterator for Parser<'_> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let count = match self.read_count() {
                Ok(count) => count,
                Err(error) => return self.fail(error),
            };

            let Some((_, c)) = self.chars.next() else {
                return match count {
                    Some(n) => self.fail(Error::TrailingCount(n)),
                    None => None,
                };
            };

            if matches!(c, ' ' | '\t' | '\r' | '\n') {
                continue;
            }

            if let Some(order) = ByteOrder::from_directive(c) {
                return Some(Ok(Token::Order(order)));
            }

            return match Kind::from_char(c) {
                Some(kind) => Some(Ok(Token::Data(Directive {
                    kind,
                    count: count.map_or(Count::Implicit, Count::Explicit),
                }))),
                None => self.fail(Error::UnknownDirective(c)),
            };
        }
    }
}

/// A format string compiled once into tokens, reusable for many calls.
///
/// ```
/// use structpack::{Format, Value};
///
/// let format = Format::parse("<HI").unwrap();
/// let bytes = format.pack_to_vec(&[Value::U16(1), Value::U32(2)]).unwrap();
/// assert_eq!(bytes, vec![1, 0, 2, 0, 0, 0]);
/// assert_eq!(format.unpack(&bytes).unwrap(), vec![Value::U16(1), Value::U32(2)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    tokens: Vec<Token>,
}

impl Format {
    /// Parses the whole format string. Fails on the first invalid directive.
    pub fn parse(format: &str) -> Result<Self, Error> {
        let tokens = Parser::new(format).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Packs `args` into `buf` starting at offset 0.
    pub fn pack(&self, buf: &mut [u8], args: &[Value]) -> Result<(), Error> {
        codec::pack(self.tokens.iter().copied().map(Ok), buf, args)
    }

    /// Unpacks every directive from `buf`.
    pub fn unpack(&self, buf: &[u8]) -> Result<Vec<Value>, UnpackError> {
        codec::unpack(self.tokens.iter().copied().map(Ok), buf)
    }

    /// Exact number of bytes [Format::pack] writes for `args`.
    pub fn packed_size(&self, args: &[Value]) -> Result<usize, Error> {
        codec::packed_size(self.tokens.iter().copied().map(Ok), args)
    }

    /// Packs into a freshly allocated buffer of exactly [Format::packed_size] bytes.
    pub fn pack_to_vec(&self, args: &[Value]) -> Result<Vec<u8>, Error> {
        let mut buf = vec![0u8; self.packed_size(args)?];
        self.pack(&mut buf, args)?;
        Ok(buf)
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(kind: Kind, count: Count) -> Token {
        Token::Data(Directive { kind, count })
    }

    #[test]
    fn test_parse_counts() {
        let format = Format::parse("2h10sI").unwrap();
        assert_eq!(
            format.tokens(),
            &[
                data(Kind::I16, Count::Explicit(2)),
                data(Kind::FixedString, Count::Explicit(10)),
                data(Kind::U32, Count::Implicit),
            ]
        );
    }

    #[test]
    fn test_parse_order_and_whitespace() {
        let spaced = Format::parse("< h >  H").unwrap();
        let compact = Format::parse("<h>H").unwrap();
        assert_eq!(spaced, compact);
        assert_eq!(
            compact.tokens(),
            &[
                Token::Order(ByteOrder::Little),
                data(Kind::I16, Count::Implicit),
                Token::Order(ByteOrder::Big),
                data(Kind::U16, Count::Implicit),
            ]
        );
    }

    #[test]
    fn test_parse_aliases() {
        let format = Format::parse("lL").unwrap();
        assert_eq!(
            format.tokens(),
            &[
                data(Kind::I32, Count::Implicit),
                data(Kind::U32, Count::Implicit)
            ]
        );
    }

    #[test]
    fn test_count_before_whitespace_is_dropped() {
        let format = Format::parse("3 h").unwrap();
        assert_eq!(format.tokens(), &[data(Kind::I16, Count::Implicit)]);
    }

    #[test]
    fn test_count_before_order_is_dropped() {
        let format = Format::parse("3<h").unwrap();
        assert_eq!(
            format.tokens(),
            &[
                Token::Order(ByteOrder::Little),
                data(Kind::I16, Count::Implicit)
            ]
        );
    }

    #[test]
    fn test_unknown_directive() {
        assert_eq!(Format::parse("3}").unwrap_err(), Error::UnknownDirective('}'));
        assert_eq!("hé".parse::<Format>().unwrap_err(), Error::UnknownDirective('é'));
    }

    #[test]
    fn test_parser_is_lazy_and_fused() {
        let mut parser = Parser::new("B}B");
        assert_eq!(
            parser.next(),
            Some(Ok(data(Kind::U8, Count::Implicit)))
        );
        assert_eq!(parser.next(), Some(Err(Error::UnknownDirective('}'))));
        assert_eq!(parser.next(), None);
    }

    #[test]
    fn test_trailing_count() {
        assert_eq!(Format::parse("h12").unwrap_err(), Error::TrailingCount(12));
    }

    #[test]
    fn test_count_overflow() {
        assert_eq!(
            Format::parse("99999999999999999999999h").unwrap_err(),
            Error::CountOverflow
        );
    }

    #[test]
    fn test_kind_width_and_char() {
        assert_eq!(Kind::F64.width(), 8);
        assert_eq!(Kind::U16.width(), 2);
        assert_eq!(Kind::from_char('L'), Some(Kind::U32));
        assert_eq!(Kind::U32.as_char(), 'I');
        assert_eq!(Kind::PascalString.to_string(), "p");
        assert!(Kind::FixedString.is_block());
        assert!(!Kind::Pad.is_block());
    }
}
