//! Compression helpers (requires the `compression` feature).
//!
//! Gated behind the `compression` Cargo feature so that the splitter in
//! [`crate::formats::track`] compiles with zero dependencies beyond `std`.
//! The feature is on by default:
//!
//! ```toml
//! [dependencies]
//! trackkit = { version = "0.1", default-features = false }  # splitter only
//! ```
//!
//! ## Submodules
//!
//! | Module | Algorithm | Typical use in trackkit |
//! |--------|-----------|-------------------------|
//! | [`lzma`] | LZMA1 (`LZMA_ALONE`) | Track payloads with a 4-byte size field |
//!
//! Use [`lzma::decompress_foreign`] on the payload returned by
//! [`crate::formats::track::Splitter::split`] for compressed tracks and
//! [`lzma::compress_foreign`] for decompressed ones, or let
//! [`crate::convert::convert`] do both steps.

#[cfg(feature = "compression")]
pub mod lzma;
