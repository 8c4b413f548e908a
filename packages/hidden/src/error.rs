//! Decoding errors

use thiserror::Error;

/// Errors produced when a fragment is decoded strictly
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HiddenError {
    /// The fragment does not begin with a marker start symbol
    #[error("hidden marker does not start with the start symbol")]
    MissingStart,

    /// A start symbol was found without a matching end symbol
    #[error("hidden marker is not terminated")]
    Unterminated,

    /// A character outside the marker alphabet appeared inside a marker
    #[error("invalid symbol inside hidden marker: {0:?}")]
    InvalidSymbol(char),

    /// The marker carries an odd number of nibbles
    #[error("hidden marker has an odd number of symbols ({0})")]
    OddLength(usize),
}
