//! Low-level primitives shared by the splitter and the LZMA adapter.
//!
//! Each reader consumes exactly the bytes it promises or returns an error -
//! there is no partial-read ambiguity.

#![cfg_attr(not(feature = "compression"), allow(dead_code))]

use std::io::{self, Read};

/// Read one byte.
#[inline]
pub(crate) fn u8<R: Read>(r: &mut R) -> io::Result<u8> {
    let mut b = [0u8; 1];
    r.read_exact(&mut b)?;
    Ok(b[0])
}

/// Read a little-endian `u32`.
#[inline]
pub(crate) fn le_u32<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut b = [0u8; 4];
    r.read_exact(&mut b)?;
    Ok(u32::from_le_bytes(b))
}

/// Read a little-endian `u64`.
#[inline]
pub(crate) fn le_u64<R: Read>(r: &mut R) -> io::Result<u64> {
    let mut b = [0u8; 8];
    r.read_exact(&mut b)?;
    Ok(u64::from_le_bytes(b))
}

/// Find the first occurrence of `needle` in `haystack`.
///
/// With `limit` set, only matches lying entirely within the first `limit`
/// bytes are reported. An empty needle never matches.
pub(crate) fn find(haystack: &[u8], needle: &[u8], limit: Option<usize>) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let end = limit.map_or(haystack.len(), |l| l.min(haystack.len()));
    haystack[..end]
        .windows(needle.len())
        .position(|w| w == needle)
}
