//! The pack/unpack engine.
//!
//! Both directions walk a token stream once, keeping a buffer offset, the
//! active byte order and (for pack) an argument index. Every data directive is
//! bounds-checked before its bytes are touched; on failure the call stops and
//! nothing already written is rolled back.

use tracing::{debug, trace};

use crate::{
    bounds,
    errors::{Error, UnpackError},
    format::{Count, Directive, Kind, Token},
    order::ByteOrder,
    scalar, strings,
    value::Value,
};

/// Packs `args` into `buf` following `tokens`.
pub fn pack<I>(tokens: I, buf: &mut [u8], args: &[Value]) -> Result<(), Error>
where
    I: IntoIterator<Item = Result<Token, Error>>,
{
    let mut writer = Writer::new(buf, args);
    let result = tokens
        .into_iter()
        .try_for_each(|token| writer.apply(token?));

    if let Err(error) = &result {
        debug!(%error, offset = writer.offset, argument = writer.arg, "pack failed");
    }

    result
}

/// Unpacks values from `buf` following `tokens`. On failure the values decoded
/// so far are returned inside the [UnpackError].
pub fn unpack<I>(tokens: I, buf: &[u8]) -> Result<Vec<Value>, UnpackError>
where
    I: IntoIterator<Item = Result<Token, Error>>,
{
    let mut reader = Reader::new(buf);
    let result = tokens
        .into_iter()
        .try_for_each(|token| reader.apply(token?));

    match result {
        Ok(()) => Ok(reader.values),
        Err(error) => {
            debug!(%error, offset = reader.offset, decoded = reader.values.len(), "unpack failed");
            Err(UnpackError {
                error,
                decoded: reader.values,
            })
        }
    }
}

/// Number of bytes `tokens` occupy when packed with `args`.
pub fn packed_size<I>(tokens: I, args: &[Value]) -> Result<usize, Error>
where
    I: IntoIterator<Item = Result<Token, Error>>,
{
    let mut size = 0usize;
    let mut arg = 0usize;

    for token in tokens {
        let Token::Data(directive) = token? else {
            continue;
        };

        let count = pack_count(directive, args, arg)?;
        size = directive
            .kind
            .width()
            .checked_mul(count)
            .and_then(|n| size.checked_add(n))
            .ok_or(Error::CountOverflow)?;

        arg = arg.saturating_add(match directive.kind {
            Kind::Pad => 0,
            kind if kind.is_block() => 1,
            _ => count,
        });
    }

    Ok(size)
}

struct Writer<'a, 'b> {
    buf: &'b mut [u8],
    args: &'a [Value],
    offset: usize,
    arg: usize,
    order: ByteOrder,
}

impl<'a, 'b> Writer<'a, 'b> {
    fn new(buf: &'b mut [u8], args: &'a [Value]) -> Self {
        Self {
            buf,
            args,
            offset: 0,
            arg: 0,
            order: ByteOrder::NATIVE,
        }
    }

    fn apply(&mut self, token: Token) -> Result<(), Error> {
        match token {
            Token::Order(order) => {
                self.order = order;
                Ok(())
            }
            Token::Data(directive) => self.write(directive),
        }
    }

    fn write(&mut self, directive: Directive) -> Result<(), Error> {
        let kind = directive.kind;
        let count = pack_count(directive, self.args, self.arg)?;
        let range = bounds::span(self.buf.len(), self.offset, kind.width(), count)?;

        trace!(directive = %kind, count, offset = self.offset, "pack");

        let dst = &mut self.buf[range.clone()];
        match kind {
            Kind::Pad => dst.fill(0),
            Kind::FixedString => {
                let src = string_arg(self.args, self.arg, kind)?;
                strings::pack_fixed(dst, src);
                self.arg += 1;
            }
            Kind::PascalString => {
                let src = string_arg(self.args, self.arg, kind)?;
                strings::pack_pascal(dst, src)?;
                self.arg += 1;
            }
            _ => {
                for chunk in dst.chunks_exact_mut(kind.width()) {
                    let bits = scalar_arg(self.args, self.arg, kind)?;
                    scalar::put_uint(chunk, bits, self.order);
                    self.arg += 1;
                }
            }
        }

        self.offset = range.end;
        Ok(())
    }
}

struct Reader<'b> {
    buf: &'b [u8],
    offset: usize,
    order: ByteOrder,
    values: Vec<Value>,
}

impl<'b> Reader<'b> {
    fn new(buf: &'b [u8]) -> Self {
        Self {
            buf,
            offset: 0,
            order: ByteOrder::NATIVE,
            values: Vec::new(),
        }
    }

    fn apply(&mut self, token: Token) -> Result<(), Error> {
        match token {
            Token::Order(order) => {
                self.order = order;
                Ok(())
            }
            Token::Data(directive) => self.read(directive),
        }
    }

    fn read(&mut self, directive: Directive) -> Result<(), Error> {
        let kind = directive.kind;

        if kind == Kind::PascalString {
            return self.read_pascal(directive.count);
        }

        let count = directive.count_or_default();
        let range = bounds::span(self.buf.len(), self.offset, kind.width(), count)?;

        trace!(directive = %kind, count, offset = self.offset, "unpack");

        let src = &self.buf[range.clone()];
        match kind {
            Kind::Pad => {}
            Kind::FixedString => self.values.push(Value::Bytes(strings::unpack_fixed(src))),
            _ => {
                for chunk in src.chunks_exact(kind.width()) {
                    let bits = scalar::get_uint(chunk, self.order);
                    // Pad and strings are handled above, so every kind here is a scalar.
                    let value = scalar::from_bits(kind, bits)
                        .ok_or(Error::UnknownDirective(kind.as_char()))?;
                    self.values.push(value);
                }
            }
        }

        self.offset = range.end;
        Ok(())
    }

    /// The span comes from the embedded length byte; an explicit count is only
    /// checked against the remaining space.
    fn read_pascal(&mut self, count: Count) -> Result<(), Error> {
        let len = self.buf.len();
        if let Count::Explicit(n) = count {
            bounds::require(len, self.offset, n)?;
        }

        let prefix = bounds::require(len, self.offset, 1)?;
        let payload_len = self.buf[prefix.start] as usize;
        let range = bounds::require(len, self.offset, 1 + payload_len)?;

        trace!(directive = %Kind::PascalString, payload_len, offset = self.offset, "unpack");

        let payload = &self.buf[prefix.end..range.end];
        self.values.push(Value::Bytes(strings::unpack_pascal(payload)));
        self.offset = range.end;

        Ok(())
    }
}

/// Resolves a directive's count for packing. A bare `p` is sized to hold its
/// string argument plus the length byte.
fn pack_count(directive: Directive, args: &[Value], index: usize) -> Result<usize, Error> {
    match (directive.kind, directive.count) {
        (Kind::PascalString, Count::Implicit) => {
            Ok(string_arg(args, index, directive.kind)?.len() + 1)
        }
        _ => Ok(directive.count_or_default()),
    }
}

fn arg(args: &[Value], index: usize, kind: Kind) -> Result<&Value, Error> {
    args.get(index).ok_or(Error::MissingArgument {
        index,
        directive: kind.as_char(),
    })
}

fn string_arg(args: &[Value], index: usize, kind: Kind) -> Result<&[u8], Error> {
    let value = arg(args, index, kind)?;
    value.as_bytes().ok_or(Error::ArgumentMismatch {
        index,
        directive: kind.as_char(),
        found: value.type_name(),
    })
}

fn scalar_arg(args: &[Value], index: usize, kind: Kind) -> Result<u64, Error> {
    let value = arg(args, index, kind)?;
    scalar::to_bits(kind, value).ok_or(Error::ArgumentMismatch {
        index,
        directive: kind.as_char(),
        found: value.type_name(),
    })
}
