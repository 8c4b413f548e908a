//! Core error types and definitions

use crate::stack::CallStack;
use ctxerr_context::Map;
use std::sync::{Arc, RwLock};

/// Error carrying a message, structured fields, ambient context, an optional
/// cause and the call stack of its creation.
///
/// Cloning is cheap and clones share identity: fields added through one clone
/// are visible through all of them.
#[derive(Clone)]
pub struct Error {
    pub(crate) inner: Arc<ErrorInner>,
}

pub(crate) struct ErrorInner {
    /// Process-unique identity, embedded in rendered text
    pub id: u64,
    /// Marker-free message
    pub message: String,
    /// Own fields, keys normalized
    pub data: RwLock<Map>,
    /// Ambient context at creation
    pub context: Map,
    pub cause: Option<Cause>,
    pub call_stack: CallStack,
}

/// What an error was created from
#[derive(Debug, Clone)]
pub enum Cause {
    /// A library error that was still registered when it was wrapped
    Tracked(Error),
    /// Any other error; carries no structured data
    Opaque(Arc<dyn std::error::Error + Send + Sync>),
}

impl Cause {
    /// The structured cause, if this is one
    #[must_use]
    pub fn as_tracked(&self) -> Option<&Error> {
        match self {
            Self::Tracked(error) => Some(error),
            Self::Opaque(_) => None,
        }
    }
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
