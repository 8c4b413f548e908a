//! Error constructors and field decoration

use super::keys::{self, normalize_key};
use super::types::{Cause, Error, ErrorInner};
use crate::config::config;
use crate::registry;
use crate::stack::CallStack;
use ctxerr_context::Map;
use std::error::Error as StdError;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

impl Error {
    /// Create an error from a message.
    ///
    /// Errors interpolated into the message contribute their text only; use
    /// [`Error::wrap`] to keep one as the cause.
    #[inline(never)]
    #[must_use]
    pub fn new(message: impl fmt::Display) -> Self {
        let message = ctxerr_hidden::strip(&message.to_string());
        let call_stack = CallStack::capture(config().max_frames);
        Self::from_parts(message, None, keys::NEW_ERROR_TYPE, call_stack)
    }

    /// Wrap any error value.
    ///
    /// The message is the wrapped value's text. If that text embeds an error
    /// this library created and still tracks, that error becomes the
    /// structured cause; otherwise the wrapped value is kept as an opaque
    /// cause. Wrapping an [`Error`] returns it unchanged.
    #[inline(never)]
    #[must_use]
    pub fn wrap<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        let type_name = std::any::type_name::<E>();
        let boxed: Box<dyn StdError + Send + Sync> = err.into();
        let boxed = match boxed.downcast::<Error>() {
            Ok(error) => return *error,
            Err(other) => other,
        };

        let text = boxed.to_string();
        let cause = match registry::resolve_cause(&text) {
            Some(tracked) => Cause::Tracked(tracked),
            None => Cause::Opaque(Arc::from(boxed)),
        };
        let call_stack = CallStack::capture(config().max_frames);
        Self::from_parts(ctxerr_hidden::strip(&text), Some(cause), type_name, call_stack)
    }

    /// Wrap an optional error; `None` stays `None`
    #[inline(never)]
    #[must_use]
    pub fn wrap_opt<E>(err: Option<E>) -> Option<Self>
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        err.map(Self::wrap)
    }

    pub(crate) fn from_parts(
        message: String,
        cause: Option<Cause>,
        type_name: &str,
        call_stack: CallStack,
    ) -> Self {
        let mut data = Map::new();
        data.insert(keys::MESSAGE.to_string(), message.clone().into());
        data.insert(keys::TYPE.to_string(), type_name.into());
        data.insert(
            keys::LOCATION.to_string(),
            call_stack.innermost().to_string().into(),
        );

        let error = Self {
            inner: Arc::new(ErrorInner {
                id: registry::next_id(),
                message,
                data: RwLock::new(data),
                context: ctxerr_context::current(),
                cause,
                call_stack,
            }),
        };
        registry::register(&error);
        error
    }

    /// Set the operation label, replacing any previous one
    #[must_use]
    pub fn op(self, name: impl Into<String>) -> Self {
        let name: String = name.into();
        self.insert(keys::OP.to_string(), serde_json::Value::String(name));
        self
    }

    /// Attach a field; the key is normalized and an existing value replaced
    #[must_use]
    pub fn with(self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.insert(normalize_key(key), value.into());
        self
    }

    fn insert(&self, key: String, value: serde_json::Value) {
        self.inner
            .data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }

    /// Process-unique identity of this error
    #[must_use]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// The message, free of hidden markers
    #[must_use]
    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// One of this error's own fields, looked up by normalized key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.own_data().get(&normalize_key(key)).cloned()
    }

    /// Copy of this error's own fields
    #[must_use]
    pub fn own_data(&self) -> Map {
        self.inner
            .data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Ambient context captured when the error was created
    #[must_use]
    pub fn context(&self) -> &Map {
        &self.inner.context
    }

    /// Structured cause, when the wrapped error was still tracked
    #[must_use]
    pub fn cause(&self) -> Option<&Error> {
        self.inner.cause.as_ref().and_then(Cause::as_tracked)
    }

    /// Structured or opaque cause
    #[must_use]
    pub fn cause_link(&self) -> Option<&Cause> {
        self.inner.cause.as_ref()
    }

    /// Deepest structured error in the cause chain, possibly `self`
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        while let Some(cause) = current.cause() {
            current = cause;
        }
        current
    }

    /// Frames captured at creation, innermost first
    #[must_use]
    pub fn call_stack(&self) -> &CallStack {
        &self.inner.call_stack
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Error {}
