//! Track files - an opaque header followed by a raw or LZMA-packed payload.
//!
//! The format carries no header-length field. The boundary between header
//! and payload is found purely by byte-pattern search.
//!
//! ## Compressed layout
//! ```text
//! [0x00]     Header            (opaque, variable length)
//! [i]        Properties 0x5D   (u8)     \
//! [i + 0x01] DictSize 0x20000  (u32 LE)  } foreign LZMA preamble, 9 bytes
//! [i + 0x05] UncompressedSize  (u32 LE) /
//! [i + 0x09] LZMA1 range-coded stream
//! ```
//! The first four preamble bytes `5D 00 00 02` double as the signature that
//! marks a compressed track.
//!
//! ## Decompressed layout
//! ```text
//! [0x00]     Header            (opaque, ends with a terminator token)
//! [j]        Terminator        "HEND\0" or "LZMA"
//! [j + L]    Plain payload
//! ```
//!
//! ## Detection order
//! 1. Signature found at `i` - [`Direction::Decompress`], payload starts at `i`.
//! 2. Otherwise each [`Terminator`] is tried in priority order; the first one
//!    found at `j` gives [`Direction::Compress`], payload starts at `j + L`.
//! 3. Otherwise [`Error::FormatNotRecognized`].
//!
//! The signature always wins, even when a terminator occurs earlier in the
//! buffer.

use crate::utils::find;
use crate::{Error, Result};

/// LZMA1 properties byte `0x5D` followed by the low three bytes of the
/// `0x20000` dictionary size.
pub const COMPRESSED_SIGNATURE: [u8; 4] = [0x5D, 0x00, 0x00, 0x02];

/// Header terminator used by the Evolution generation of track files.
pub const HEND_TOKEN: &[u8] = b"HEND\0";

/// Header terminator used by the Fusion and Rising generations.
pub const LZMA_TOKEN: &[u8] = b"LZMA";

/// Search window used by [`Splitter::legacy`]. Real track headers end well
/// before this offset.
pub const DEFAULT_SEARCH_LIMIT: usize = 200;

/// Which way a buffer is converted, decided from its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The payload is a foreign-form LZMA stream to be unpacked.
    Decompress,
    /// The payload is plain data to be packed.
    Compress,
}

/// How a terminator token relates to the header around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// The token is ordinary header bytes: kept when compressing, nothing
    /// added when decompressing.
    Retained,
    /// The token only exists in the decompressed form: appended to the
    /// header when decompressing and dropped when compressing.
    Synthesized,
}

/// A header terminator token recognized in decompressed tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminator {
    pub token: Vec<u8>,
    pub framing: Framing,
}

impl Terminator {
    pub fn retained(token: impl Into<Vec<u8>>) -> Self {
        Self {
            token: token.into(),
            framing: Framing::Retained,
        }
    }

    pub fn synthesized(token: impl Into<Vec<u8>>) -> Self {
        Self {
            token: token.into(),
            framing: Framing::Synthesized,
        }
    }
}

/// Header/payload boundary detector.
///
/// Holds the recognized terminators (in priority order) and an optional
/// search window. The default configuration keeps both `HEND\0` and `LZMA`
/// as part of the header and searches the whole buffer.
#[derive(Debug, Clone)]
pub struct Splitter {
    terminators: Vec<Terminator>,
    search_limit: Option<usize>,
}

impl Default for Splitter {
    fn default() -> Self {
        Self {
            terminators: vec![
                Terminator::retained(HEND_TOKEN),
                Terminator::retained(LZMA_TOKEN),
            ],
            search_limit: None,
        }
    }
}

impl Splitter {
    /// Behaviour of the Evolution-era track tools: `HEND\0` is added on
    /// decompression and removed on compression, and only the first
    /// [`DEFAULT_SEARCH_LIMIT`] bytes are searched.
    pub fn legacy() -> Self {
        Self {
            terminators: vec![
                Terminator::synthesized(HEND_TOKEN),
                Terminator::retained(LZMA_TOKEN),
            ],
            search_limit: Some(DEFAULT_SEARCH_LIMIT),
        }
    }

    /// Replace the recognized terminators. Earlier entries take priority.
    pub fn with_terminators(mut self, terminators: impl IntoIterator<Item = Terminator>) -> Self {
        self.terminators = terminators.into_iter().collect();
        self
    }

    /// Restrict every pattern search to the first `limit` bytes.
    pub fn with_search_limit(mut self, limit: Option<usize>) -> Self {
        self.search_limit = limit;
        self
    }

    pub fn terminators(&self) -> &[Terminator] {
        &self.terminators
    }

    pub fn search_limit(&self) -> Option<usize> {
        self.search_limit
    }

    /// Split `buffer` into header and payload and decide the direction.
    ///
    /// Returns [`Error::FormatNotRecognized`] if neither the signature nor
    /// any terminator is present.
    pub fn split<'a>(&'a self, buffer: &'a [u8]) -> Result<Split<'a>> {
        if let Some(i) = find(buffer, &COMPRESSED_SIGNATURE, self.search_limit) {
            let header = &buffer[..i];
            return Ok(Split {
                header,
                header_suffix: self.decompressed_suffix(header),
                payload: &buffer[i..],
                direction: Direction::Decompress,
                marker_offset: i,
            });
        }

        for terminator in &self.terminators {
            let Some(j) = find(buffer, &terminator.token, self.search_limit) else {
                continue;
            };
            let data_start = j + terminator.token.len();
            let header_end = match terminator.framing {
                Framing::Retained => data_start,
                Framing::Synthesized => j,
            };
            return Ok(Split {
                header: &buffer[..header_end],
                header_suffix: &[],
                payload: &buffer[data_start..],
                direction: Direction::Compress,
                marker_offset: j,
            });
        }

        Err(Error::FormatNotRecognized)
    }

    /// Token to append after a compressed track's header so the
    /// decompressed track carries a terminator again.
    fn decompressed_suffix<'a>(&'a self, header: &[u8]) -> &'a [u8] {
        let Some(synthesized) = self
            .terminators
            .iter()
            .find(|t| t.framing == Framing::Synthesized)
        else {
            return &[];
        };
        // A header that already ends with a known token needs nothing more.
        if self
            .terminators
            .iter()
            .any(|t| !t.token.is_empty() && header.ends_with(&t.token))
        {
            return &[];
        }
        &synthesized.token
    }
}

/// Result of [`Splitter::split`]: borrowed views into the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// Opaque header bytes, copied verbatim to the output.
    pub header: &'a [u8],
    /// Bytes written right after the header in the output. Empty unless a
    /// [`Framing::Synthesized`] terminator has to be restored.
    pub header_suffix: &'a [u8],
    /// Payload bytes handed to the LZMA adapter.
    pub payload: &'a [u8],
    pub direction: Direction,
    /// Offset of the signature or terminator that decided the split.
    pub marker_offset: usize,
}

impl Split<'_> {
    /// Length of the header as it appears in the converted output.
    pub fn output_header_len(&self) -> usize {
        self.header.len() + self.header_suffix.len()
    }
}
