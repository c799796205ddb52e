//! Fixed-length (`s`) and Pascal (`p`) string encoding.

use crate::errors::Error;

/// Largest span a Pascal string can occupy: one length byte plus 255 payload bytes.
pub const PASCAL_MAX_SPAN: usize = 256;

/// Copies `src` into `dst`, truncating when longer and zero-filling when shorter.
pub fn pack_fixed(dst: &mut [u8], src: &[u8]) {
    let n = src.len().min(dst.len());
    dst[..n].copy_from_slice(&src[..n]);
    dst[n..].fill(0);
}

/// Reads a fixed-length span, stripping NUL bytes from both ends. Other bytes
/// are returned unchanged.
///
/// Leading NULs are stripped too, so a string that starts with NUL does not
/// survive a round trip.
pub fn unpack_fixed(src: &[u8]) -> Vec<u8> {
    trim_nul(src).to_vec()
}

/// Writes a Pascal string into `dst`, whose whole length is the directive span.
/// The length byte records the payload capacity `dst.len() - 1`.
pub fn pack_pascal(dst: &mut [u8], src: &[u8]) -> Result<(), Error> {
    if dst.is_empty() || dst.len() > PASCAL_MAX_SPAN {
        return Err(Error::PascalCapacity(dst.len()));
    }

    dst[0] = (dst.len() - 1) as u8;
    pack_fixed(&mut dst[1..], src);

    Ok(())
}

/// Reads a Pascal payload (the bytes after the length byte).
pub fn unpack_pascal(payload: &[u8]) -> Vec<u8> {
    unpack_fixed(payload)
}

fn trim_nul(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| b != 0).map_or(start, |i| i + 1);
    &bytes[start..end]
}
