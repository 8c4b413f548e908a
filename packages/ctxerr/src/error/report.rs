//! Serializable snapshot of an error chain

use super::keys;
use super::types::{Cause, Error};
use crate::stack::Frame;
use ctxerr_context::Map;
use serde::Serialize;

/// Owned, serializable view of an error and its causes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    /// Marker-free message
    pub message: String,
    /// Effective operation label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,
    /// Effective fields
    pub data: Map,
    /// Captured frames, innermost first
    pub stack: Vec<Frame>,
    /// Next link in the chain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ErrorReport>>,
}

impl ErrorReport {
    fn opaque(error: &(dyn std::error::Error + 'static)) -> Self {
        Self {
            message: ctxerr_hidden::strip(&error.to_string()),
            op: None,
            data: Map::new(),
            stack: Vec::new(),
            cause: error.source().map(|source| Box::new(Self::opaque(source))),
        }
    }
}

impl Error {
    /// Build a serializable report of this error and its causes
    #[must_use]
    pub fn report(&self) -> ErrorReport {
        let data = self.data();
        let op = data.get(keys::OP).and_then(|op| op.as_str()).map(str::to_string);
        let cause = self.cause_link().map(|cause| match cause {
            Cause::Tracked(error) => Box::new(error.report()),
            Cause::Opaque(error) => Box::new(ErrorReport::opaque(&**error)),
        });
        ErrorReport {
            message: self.message().to_string(),
            op,
            data,
            stack: self.call_stack().frames().to_vec(),
            cause,
        }
    }
}
