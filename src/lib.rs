//! **trackkit** - compress and decompress LZMA-packed game track files.
//!
//! A track file is an opaque header followed by a payload that is either
//! plain bytes or an `LZMA_ALONE` stream whose uncompressed-size field is
//! only 4 bytes wide. There is no header-length field; the boundary is
//! found by byte-pattern search.
//!
//! # Modules
//! | Module | Purpose |
//! |--------|---------|
//! | [`formats::track`]     | Header/payload boundary detection |
//! | [`compression::lzma`]  | Size-field widening/narrowing and the LZMA1 codec |
//! | [`convert`]            | Whole-file conversion in the detected direction |
//!
//! # Example
//! ```no_run
//! # #[cfg(feature = "compression")]
//! # fn main() -> trackkit::Result<()> {
//! let input = std::fs::read("track.trk")?;
//! let out = trackkit::convert::convert_default(&input)?;
//! std::fs::write("track_decompressed.trk", &out.data)?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "compression"))]
//! # fn main() {}
//! ```

pub mod compression;
#[cfg(feature = "compression")]
pub mod convert;
pub mod error;
pub mod formats;
pub(crate) mod utils;

pub use error::{Error, Result};
