//! Whole-file conversion (requires the `compression` feature).
//!
//! Splits the input with a [`Splitter`], runs the payload through the LZMA
//! adapter in the detected direction, and concatenates the header and the
//! converted payload into a fresh buffer. The input is never modified and
//! nothing is returned on failure.

#![cfg(feature = "compression")]

use crate::Result;
use crate::compression::lzma::{compress_foreign, decompress_foreign};
use crate::formats::track::{Direction, Splitter};

/// A converted track file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Which way the input was converted.
    pub direction: Direction,
    /// Complete contents of the converted track file.
    pub data: Vec<u8>,
}

/// Convert one track file using `splitter` to find the header boundary.
///
/// A compressed track comes back decompressed and vice versa.
pub fn convert(buffer: &[u8], splitter: &Splitter) -> Result<Conversion> {
    let split = splitter.split(buffer)?;
    let payload = match split.direction {
        Direction::Decompress => decompress_foreign(split.payload)?,
        Direction::Compress => compress_foreign(split.payload)?,
    };

    let mut data = Vec::with_capacity(split.output_header_len() + payload.len());
    data.extend_from_slice(split.header);
    data.extend_from_slice(split.header_suffix);
    data.extend_from_slice(&payload);

    Ok(Conversion {
        direction: split.direction,
        data,
    })
}

/// [`convert`] with the default [`Splitter`].
pub fn convert_default(buffer: &[u8]) -> Result<Conversion> {
    convert(buffer, &Splitter::default())
}
