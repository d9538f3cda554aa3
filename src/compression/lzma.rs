//! LZMA1 container adapter (requires the `compression` feature).
//!
//! Track files store their payload as an `LZMA_ALONE` stream with a
//! non-standard preamble: the uncompressed-size field is 4 bytes wide
//! instead of 8. This module converts between the two widths and drives
//! liblzma (through [`xz2`]) on the standard form.
//!
//! ## Preamble
//! ```text
//!              foreign     standard
//! [0x00] Properties        u8          u8
//! [0x01] DictSize          u32 LE      u32 LE
//! [0x05] UncompressedSize  u32 LE      u64 LE
//! [....] Range-coded data  @0x09       @0x0D
//! ```
//!
//! * **Decompress** - [`decompress_foreign`] widens the size field with four
//!   zero bytes and decodes the resulting standard stream.
//! * **Compress** - [`compress_foreign`] encodes with the fixed
//!   [`FILTER_SPEC`] and narrows the size field to the low four bytes of the
//!   plain length.
//!
//! Sizes of 4 GiB and above do not fit the foreign field and are truncated.

#![cfg(feature = "compression")]

use std::io::{self, Read, Write};

use xz2::read::XzDecoder;
use xz2::stream::{LzmaOptions, Stream};
use xz2::write::XzEncoder;

use crate::utils::{le_u32, le_u64, u8};
use crate::{Error, Result};

/// Length of the preamble with a 4-byte size field.
pub const FOREIGN_PREAMBLE_LEN: usize = 9;

/// Length of the `LZMA_ALONE` preamble with an 8-byte size field.
pub const STANDARD_PREAMBLE_LEN: usize = 13;

/// Offset of the uncompressed-size field in both preamble forms.
pub const SIZE_FIELD_OFFSET: usize = 5;

/// Cap on the output buffer reserved from an untrusted declared size.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

/// Encoder configuration for the compress path.
///
/// A single LZMA1 filter. Everything except the dictionary size comes from
/// the liblzma preset (lc=3, lp=0, pb=2 at preset 6), which makes the
/// properties byte `0x5D`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub preset: u32,
    pub dict_size: u32,
}

/// The only filter configuration track files are written with.
pub const FILTER_SPEC: FilterSpec = FilterSpec {
    preset: 6,
    dict_size: 0x0002_0000,
};

impl FilterSpec {
    fn options(&self) -> std::result::Result<LzmaOptions, xz2::stream::Error> {
        let mut options = LzmaOptions::new_preset(self.preset)?;
        options.dict_size(self.dict_size);
        Ok(options)
    }
}

/// Decoded LZMA preamble, independent of the size-field width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preamble {
    pub properties: u8,
    pub dict_size: u32,
    /// `u64::MAX` in a standard preamble means "unknown, end marker present".
    pub uncompressed_size: u64,
}

impl Preamble {
    /// Read a preamble with a 4-byte size field from the start of `payload`.
    pub fn parse_foreign(payload: &[u8]) -> io::Result<Self> {
        let mut r = payload;
        Ok(Self {
            properties: u8(&mut r)?,
            dict_size: le_u32(&mut r)?,
            uncompressed_size: le_u32(&mut r)? as u64,
        })
    }

    /// Read a preamble with an 8-byte size field from the start of `payload`.
    pub fn parse_standard(payload: &[u8]) -> io::Result<Self> {
        let mut r = payload;
        Ok(Self {
            properties: u8(&mut r)?,
            dict_size: le_u32(&mut r)?,
            uncompressed_size: le_u64(&mut r)?,
        })
    }

    /// Encode with a 4-byte size field, keeping the low four bytes only.
    pub fn to_foreign(&self) -> [u8; FOREIGN_PREAMBLE_LEN] {
        let mut b = [0u8; FOREIGN_PREAMBLE_LEN];
        b[0] = self.properties;
        b[1..SIZE_FIELD_OFFSET].copy_from_slice(&self.dict_size.to_le_bytes());
        b[SIZE_FIELD_OFFSET..].copy_from_slice(&(self.uncompressed_size as u32).to_le_bytes());
        b
    }

    /// Encode with an 8-byte size field.
    pub fn to_standard(&self) -> [u8; STANDARD_PREAMBLE_LEN] {
        let mut b = [0u8; STANDARD_PREAMBLE_LEN];
        b[0] = self.properties;
        b[1..SIZE_FIELD_OFFSET].copy_from_slice(&self.dict_size.to_le_bytes());
        b[SIZE_FIELD_OFFSET..].copy_from_slice(&self.uncompressed_size.to_le_bytes());
        b
    }
}

/// Turn a foreign-form payload into a standard `LZMA_ALONE` stream.
///
/// The 4-byte size field is zero-extended to 8 bytes; the rest is copied
/// unchanged. Fails with [`io::ErrorKind::UnexpectedEof`] if `payload` is
/// shorter than the foreign preamble.
pub fn widen(payload: &[u8]) -> io::Result<Vec<u8>> {
    let preamble = Preamble::parse_foreign(payload)?;
    let body = &payload[FOREIGN_PREAMBLE_LEN..];
    let mut out = Vec::with_capacity(STANDARD_PREAMBLE_LEN + body.len());
    out.extend_from_slice(&preamble.to_standard());
    out.extend_from_slice(body);
    Ok(out)
}

/// Turn a standard `LZMA_ALONE` stream into the foreign form, recording
/// `uncompressed_size` in the 4-byte size field.
pub fn narrow(payload: &[u8], uncompressed_size: u32) -> io::Result<Vec<u8>> {
    let preamble = Preamble {
        uncompressed_size: uncompressed_size as u64,
        ..Preamble::parse_standard(payload)?
    };
    let body = &payload[STANDARD_PREAMBLE_LEN..];
    let mut out = Vec::with_capacity(FOREIGN_PREAMBLE_LEN + body.len());
    out.extend_from_slice(&preamble.to_foreign());
    out.extend_from_slice(body);
    Ok(out)
}

/// Decompress a foreign-form payload to its plain bytes.
///
/// Decoding stops at the declared uncompressed size. Returns
/// [`Error::DecompressionFailed`] for a short preamble, corrupt or truncated
/// data, or unsupported properties.
pub fn decompress_foreign(payload: &[u8]) -> Result<Vec<u8>> {
    let size = Preamble::parse_foreign(payload)
        .map_err(Error::DecompressionFailed)?
        .uncompressed_size;
    let standard = widen(payload).map_err(Error::DecompressionFailed)?;
    let stream =
        Stream::new_lzma_decoder(u64::MAX).map_err(|e| Error::DecompressionFailed(e.into()))?;

    let decoder = XzDecoder::new_stream(standard.as_slice(), stream);
    let mut out = Vec::with_capacity(size.min(MAX_PREALLOC) as usize);
    decoder
        .take(size)
        .read_to_end(&mut out)
        .map_err(Error::DecompressionFailed)?;
    Ok(out)
}

/// Compress plain bytes into a foreign-form payload using [`FILTER_SPEC`].
///
/// The result is four bytes shorter than the standard stream liblzma
/// produces.
pub fn compress_foreign(plain: &[u8]) -> Result<Vec<u8>> {
    let options = FILTER_SPEC
        .options()
        .map_err(|e| Error::CompressionFailed(e.into()))?;
    let stream =
        Stream::new_lzma_encoder(&options).map_err(|e| Error::CompressionFailed(e.into()))?;

    let mut encoder = XzEncoder::new_stream(Vec::new(), stream);
    encoder.write_all(plain).map_err(Error::CompressionFailed)?;
    let standard = encoder.finish().map_err(Error::CompressionFailed)?;

    // Truncates past 4 GiB; the foreign field has no room for more.
    narrow(&standard, plain.len() as u32).map_err(Error::CompressionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widen_inserts_zero_high_bytes() {
        let foreign = [
            0x5D, 0x00, 0x00, 0x02, 0x00, 0x05, 0x00, 0x00, 0x00, 0xAB, 0xCD,
        ];
        let standard = widen(&foreign).unwrap();
        assert_eq!(standard.len(), foreign.len() + 4);
        assert_eq!(&standard[..9], &foreign[..9]);
        assert_eq!(&standard[9..13], &[0, 0, 0, 0]);
        assert_eq!(&standard[13..], &[0xAB, 0xCD]);

        let preamble = Preamble::parse_standard(&standard).unwrap();
        assert_eq!(preamble.properties, 0x5D);
        assert_eq!(preamble.dict_size, 0x0002_0000);
        assert_eq!(preamble.uncompressed_size, 5);
    }

    #[test]
    fn widen_rejects_short_preamble() {
        let err = widen(&[0x5D, 0x00, 0x00, 0x02, 0x00, 0x05]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn narrow_keeps_low_four_bytes() {
        let mut standard = vec![0x5D, 0x00, 0x00, 0x02, 0x00];
        standard.extend_from_slice(&u64::MAX.to_le_bytes());
        standard.extend_from_slice(&[1, 2, 3]);

        let foreign = narrow(&standard, 0x1234_5678).unwrap();
        assert_eq!(foreign.len(), standard.len() - 4);
        assert_eq!(&foreign[..5], &standard[..5]);
        assert_eq!(&foreign[5..9], &0x1234_5678u32.to_le_bytes());
        assert_eq!(&foreign[9..], &[1, 2, 3]);
    }

    #[test]
    fn oversized_length_is_truncated() {
        let preamble = Preamble {
            properties: 0x5D,
            dict_size: FILTER_SPEC.dict_size,
            uncompressed_size: 0x1_0000_0007,
        };
        assert_eq!(&preamble.to_foreign()[5..], &[7, 0, 0, 0]);
    }

    #[test]
    fn compressed_preamble_matches_filter_spec() {
        let packed = compress_foreign(b"HELLO").unwrap();
        let preamble = Preamble::parse_foreign(&packed).unwrap();
        assert_eq!(preamble.properties, 0x5D);
        assert_eq!(preamble.dict_size, 0x0002_0000);
        assert_eq!(preamble.uncompressed_size, 5);
        assert_eq!(&packed[..4], &crate::formats::track::COMPRESSED_SIGNATURE);
    }

    #[test]
    fn compressed_bytes_are_stable() {
        // liblzma FORMAT_ALONE output for "HELLO" with the size field narrowed.
        let expected = [
            0x5D, 0x00, 0x00, 0x02, 0x00, 0x05, 0x00, 0x00, 0x00, 0x00, 0x24, 0x11, 0x45, 0xCF,
            0x73, 0x58, 0x21, 0xFF, 0xFF, 0xFF, 0xB9, 0xE0, 0x00, 0x00,
        ];
        assert_eq!(compress_foreign(b"HELLO").unwrap(), expected);
        assert_eq!(decompress_foreign(&expected).unwrap(), b"HELLO");
    }

    #[test]
    fn round_trip() {
        let plain: Vec<u8> = (0..50_000u32)
            .map(|i| (i % 251) as u8 ^ (i >> 7) as u8)
            .collect();
        let packed = compress_foreign(&plain).unwrap();
        assert_eq!(decompress_foreign(&packed).unwrap(), plain);
    }

    #[test]
    fn round_trip_empty() {
        let packed = compress_foreign(&[]).unwrap();
        assert_eq!(&packed[5..9], &[0, 0, 0, 0]);
        assert!(decompress_foreign(&packed).unwrap().is_empty());
    }

    #[test]
    fn truncated_stream_fails() {
        let mut x = 0x2545_F491u32;
        let plain: Vec<u8> = (0..10_000)
            .map(|_| {
                x ^= x << 13;
                x ^= x >> 17;
                x ^= x << 5;
                x as u8
            })
            .collect();
        let packed = compress_foreign(&plain).unwrap();
        let cut = &packed[..packed.len() / 2];
        assert!(matches!(
            decompress_foreign(cut),
            Err(Error::DecompressionFailed(_))
        ));
    }

    #[test]
    fn short_payload_fails() {
        assert!(matches!(
            decompress_foreign(&[0x5D, 0x00, 0x00, 0x02]),
            Err(Error::DecompressionFailed(_))
        ));
    }

    #[test]
    fn bad_properties_fail() {
        // Properties bytes above 224 do not encode a valid lc/lp/pb triple.
        let payload = [
            0xE1, 0x00, 0x00, 0x02, 0x00, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        assert!(matches!(
            decompress_foreign(&payload),
            Err(Error::DecompressionFailed(_))
        ));
    }
}
