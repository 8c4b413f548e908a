//! # Hidden markers
//!
//! Encodes binary payloads as runs of invisible Unicode characters so they can
//! ride along inside an ordinary string. A human (or a naive log sink) sees only
//! the surrounding text, while code that knows the alphabet can recover the
//! payload with [`extract`] or render it with [`reveal`].
//!
//! A marker is laid out as:
//! - [`MARKER_START`]
//! - two symbols per payload byte (high nibble first), each from
//!   the variation-selector block `U+FE00..=U+FE0F`
//! - [`MARKER_END`]

pub mod codec;
pub mod error;

pub use codec::{MARKER_END, MARKER_START, contains_marker, decode, encode, extract, reveal, strip};
pub use error::HiddenError;

/// Result type for strict decoding
pub type Result<T> = std::result::Result<T, HiddenError>;
