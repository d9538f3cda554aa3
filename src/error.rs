//! Library-wide error and result types.

use std::fmt;
use std::io;

/// Result alias used throughout trackkit.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the library can produce.
///
/// Every variant is fatal to the conversion that raised it; no output
/// buffer is produced alongside an error.
#[derive(Debug)]
pub enum Error {
    /// Neither the compressed-stream signature nor any configured header
    /// terminator was found in the buffer.
    FormatNotRecognized,
    /// The LZMA stream is malformed, truncated, or inconsistent with its
    /// declared properties.
    DecompressionFailed(io::Error),
    /// The LZMA encoder could not be set up or failed while encoding.
    CompressionFailed(io::Error),
    /// An underlying I/O operation failed.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FormatNotRecognized => write!(f, "track format not recognized"),
            Error::DecompressionFailed(e) => write!(f, "lzma decompression failed: {e}"),
            Error::CompressionFailed(e) => write!(f, "lzma compression failed: {e}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DecompressionFailed(e) | Error::CompressionFailed(e) | Error::Io(e) => Some(e),
            Error::FormatNotRecognized => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
