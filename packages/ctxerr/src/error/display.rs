//! Display and trait implementations for Error

use super::types::{Cause, Error};
use crate::registry;
use std::fmt;

/// `{}` renders the message followed by an invisible identity marker, which is
/// what lets [`Error::wrap`] recover this error from text built with it.
/// `{:#}` renders the full multi-line trace instead.
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            let mut printer = self.multi_line_printer();
            while printer.write_line(f)? {
                f.write_str("\n")?;
            }
            return Ok(());
        }
        write!(f, "{}{}", self.inner.message, registry::signature(self.inner.id))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("id", &self.inner.id)
            .field("message", &self.inner.message)
            .field("data", &self.own_data())
            .field("cause", &self.inner.cause)
            .finish_non_exhaustive()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let source: &(dyn std::error::Error + 'static) = match self.inner.cause.as_ref()? {
            Cause::Tracked(error) => error,
            Cause::Opaque(error) => &**error,
        };
        Some(source)
    }
}
