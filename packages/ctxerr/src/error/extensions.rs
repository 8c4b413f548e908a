//! Extension traits for `Result` and `Option`

use super::types::{Error, Result};
use std::error::Error as StdError;
use std::fmt;

/// Convert foreign results into contextual ones
pub trait ResultExt<T> {
    /// Wrap the error with [`Error::wrap`]
    ///
    /// # Errors
    ///
    /// Returns the wrapped error when `self` is `Err`.
    fn wrap_err(self) -> Result<T>;

    /// Wrap the error and label it with an operation
    ///
    /// # Errors
    ///
    /// Returns the wrapped, labelled error when `self` is `Err`.
    fn with_op(self, op: &str) -> Result<T>;

    /// Wrap the error and attach a field
    ///
    /// # Errors
    ///
    /// Returns the wrapped error carrying the field when `self` is `Err`.
    fn with_field(self, key: &str, value: impl Into<serde_json::Value>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    #[inline(never)]
    fn wrap_err(self) -> Result<T> {
        self.map_err(Error::wrap)
    }

    #[inline(never)]
    fn with_op(self, op: &str) -> Result<T> {
        self.map_err(|e| Error::wrap(e).op(op))
    }

    #[inline(never)]
    fn with_field(self, key: &str, value: impl Into<serde_json::Value>) -> Result<T> {
        self.map_err(|e| Error::wrap(e).with(key, value))
    }
}

/// Turn a missing value into an error
pub trait OptionExt<T> {
    /// Create an error with `message` when `self` is `None`
    ///
    /// # Errors
    ///
    /// Returns a new [`Error`] when `self` is `None`.
    fn ok_or_err(self, message: impl fmt::Display) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    #[inline(never)]
    fn ok_or_err(self, message: impl fmt::Display) -> Result<T> {
        self.ok_or_else(|| Error::new(message))
    }
}
