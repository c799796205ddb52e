//! Fixed-width scalar encoding: integers, booleans, chars and IEEE floats.
//!
//! Every scalar is first mapped to the raw bits of an unsigned integer of the
//! same width, then written byte by byte in the requested [ByteOrder]. Floats
//! go through `to_bits`/`from_bits`.

use crate::{format::Kind, order::ByteOrder, value::Value};

/// Writes the low `dst.len()` bytes of `value` into `dst`.
pub fn put_uint(dst: &mut [u8], mut value: u64, order: ByteOrder) {
    let n = dst.len();
    for i in 0..n {
        match order {
            ByteOrder::Little => dst[i] = value as u8,
            ByteOrder::Big => dst[n - i - 1] = value as u8,
        }
        value >>= 8;
    }
}

/// Reads `src.len()` bytes (at most 8) as an unsigned integer.
pub fn get_uint(src: &[u8], order: ByteOrder) -> u64 {
    let n = src.len();
    let mut value = 0u64;
    for i in 0..n {
        value <<= 8;
        value |= match order {
            ByteOrder::Little => src[n - i - 1],
            ByteOrder::Big => src[i],
        } as u64;
    }

    value
}

/// Raw bits of `value` for a scalar `kind`, or `None` if the tag does not match.
pub fn to_bits(kind: Kind, value: &Value) -> Option<u64> {
    let bits = match (kind, value) {
        (Kind::Char, Value::Char(v)) => *v as u64,
        (Kind::I8, Value::I8(v)) => *v as u8 as u64,
        (Kind::U8, Value::U8(v)) => *v as u64,
        (Kind::Bool, Value::Bool(v)) => *v as u64,
        (Kind::I16, Value::I16(v)) => *v as u16 as u64,
        (Kind::U16, Value::U16(v)) => *v as u64,
        (Kind::I32, Value::I32(v)) => *v as u32 as u64,
        (Kind::U32, Value::U32(v)) => *v as u64,
        (Kind::I64, Value::I64(v)) => *v as u64,
        (Kind::U64, Value::U64(v)) => *v,
        (Kind::F32, Value::F32(v)) => v.to_bits() as u64,
        (Kind::F64, Value::F64(v)) => v.to_bits(),
        _ => return None,
    };

    Some(bits)
}

/// Rebuilds a value of scalar `kind` from raw bits. `None` for pad and strings.
pub fn from_bits(kind: Kind, bits: u64) -> Option<Value> {
    let value = match kind {
        Kind::Char => Value::Char(bits as u8),
        Kind::I8 => Value::I8(bits as u8 as i8),
        Kind::U8 => Value::U8(bits as u8),
        Kind::Bool => Value::Bool(bits == 1),
        Kind::I16 => Value::I16(bits as u16 as i16),
        Kind::U16 => Value::U16(bits as u16),
        Kind::I32 => Value::I32(bits as u32 as i32),
        Kind::U32 => Value::U32(bits as u32),
        Kind::I64 => Value::I64(bits as i64),
        Kind::U64 => Value::U64(bits),
        Kind::F32 => Value::F32(f32::from_bits(bits as u32)),
        Kind::F64 => Value::F64(f64::from_bits(bits)),
        Kind::Pad | Kind::FixedString | Kind::PascalString => return None,
    };

    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_uint() {
        let mut buf = [0u8; 4];
        put_uint(&mut buf, 0x04030201, ByteOrder::Little);
        assert_eq!(buf, [1, 2, 3, 4]);

        put_uint(&mut buf, 0x01020304, ByteOrder::Big);
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn test_get_uint() {
        let buf = [1u8, 2, 3, 4];
        assert_eq!(get_uint(&buf, ByteOrder::Little), 0x04030201);
        assert_eq!(get_uint(&buf, ByteOrder::Big), 0x01020304);
    }

    #[test]
    fn test_put_uint_truncates_to_width() {
        let mut buf = [0u8; 2];
        put_uint(&mut buf, 0xAABBCCDD, ByteOrder::Big);
        assert_eq!(buf, [0xCC, 0xDD]);
    }

    #[test]
    fn test_signed_bits() {
        assert_eq!(to_bits(Kind::I16, &Value::I16(-2)), Some(0xFFFE));
        assert_eq!(from_bits(Kind::I16, 0xFFFE), Some(Value::I16(-2)));
        assert_eq!(to_bits(Kind::I8, &Value::I8(-1)), Some(0xFF));
        assert_eq!(from_bits(Kind::I32, 0x8000_0000), Some(Value::I32(i32::MIN)));
    }

    #[test]
    fn test_float_bits() {
        assert_eq!(to_bits(Kind::F32, &Value::F32(1.0)), Some(0x3F80_0000));
        assert_eq!(from_bits(Kind::F64, 0x4000_0000_0000_0000), Some(Value::F64(2.0)));
    }

    #[test]
    fn test_bool_bits() {
        assert_eq!(to_bits(Kind::Bool, &Value::Bool(true)), Some(1));
        assert_eq!(to_bits(Kind::Bool, &Value::Bool(false)), Some(0));
        assert_eq!(from_bits(Kind::Bool, 1), Some(Value::Bool(true)));
        assert_eq!(from_bits(Kind::Bool, 2), Some(Value::Bool(false)));
    }

    #[test]
    fn test_mismatched_tag() {
        assert_eq!(to_bits(Kind::U32, &Value::I32(1)), None);
        assert_eq!(to_bits(Kind::F64, &Value::F32(1.0)), None);
        assert_eq!(to_bits(Kind::Pad, &Value::U8(0)), None);
        assert_eq!(from_bits(Kind::FixedString, 0), None);
    }
}
