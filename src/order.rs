//! Byte order of multi-byte values and the directive characters that switch it.

/// Byte order used when encoding or decoding a multi-byte value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ByteOrder {
    /// Least significant byte first.
    Little,
    /// Most significant byte first (network order).
    Big,
}

impl ByteOrder {
    /// Byte order of the target platform.
    #[cfg(target_endian = "little")]
    pub const NATIVE: ByteOrder = ByteOrder::Little;

    /// Byte order of the target platform.
    #[cfg(target_endian = "big")]
    pub const NATIVE: ByteOrder = ByteOrder::Big;

    /// Maps an order directive (`<`, `>`, `!`, `=`) to the order it selects.
    pub fn from_directive(c: char) -> Option<Self> {
        match c {
            '<' => Some(ByteOrder::Little),
            '>' | '!' => Some(ByteOrder::Big),
            '=' => Some(ByteOrder::NATIVE),
            _ => None,
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        ByteOrder::NATIVE
    }
}
