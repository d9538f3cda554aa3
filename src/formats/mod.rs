//! Parsers for game binary formats.
//!
//! Parsers only locate structure; they never decompress. Payloads are
//! handed back as borrowed slices of the input and passed through
//! [`crate::compression`] separately.
//!
//! ## Format overview
//!
//! | Module    | Format | Description |
//! |-----------|--------|-------------|
//! | [`track`] | TRK    | Track file: opaque header followed by a raw or LZMA1-packed payload |

pub mod track;
