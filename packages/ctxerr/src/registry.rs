//! Bounded registry of recently created errors.
//!
//! Every [`Error`] is recorded here when it is created. When a plain error is
//! later wrapped, its text is scanned for the hidden identity marker that
//! [`Error`]'s `Display` embeds, and a live entry restores the structured cause.
//!
//! The registry is a fixed-size ring with strict FIFO eviction: once full,
//! each insertion drops the oldest entry, whether or not anyone still needs it.

use crate::config::config;
use crate::error::Error;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

static REGISTRY: Lazy<Mutex<Ring>> =
    Lazy::new(|| Mutex::new(Ring::with_capacity(config().registry_capacity)));

/// Fixed-capacity ring of errors indexed by id
pub(crate) struct Ring {
    slots: Vec<Option<Error>>,
    cursor: usize,
    index: HashMap<u64, usize>,
}

impl Ring {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![None; capacity],
            cursor: 0,
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Insert at the cursor, returning whatever was evicted from that slot
    pub(crate) fn insert(&mut self, error: Error) -> Option<Error> {
        let slot = self.cursor;
        self.cursor = (self.cursor + 1) % self.slots.len();

        let evicted = self.slots[slot].take();
        if let Some(old) = &evicted {
            self.index.remove(&old.id());
        }
        self.index.insert(error.id(), slot);
        self.slots[slot] = Some(error);
        evicted
    }

    pub(crate) fn get(&self, id: u64) -> Option<Error> {
        let slot = *self.index.get(&id)?;
        self.slots[slot].clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }
}

fn lock() -> std::sync::MutexGuard<'static, Ring> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

pub(crate) fn register(error: &Error) {
    let evicted = lock().insert(error.clone());
    if let Some(old) = evicted {
        log::trace!("error {} evicted from cause registry", old.id());
    }
}

/// Encode an error id the way it is embedded in rendered text
pub(crate) fn signature(id: u64) -> String {
    ctxerr_hidden::encode(&id.to_be_bytes())
}

/// Recover a still-registered [`Error`] from rendered text.
///
/// Markers are tried in order of appearance; the first one that names a live
/// entry wins. Text produced by two different errors with identical messages
/// still resolves correctly because the marker carries the identity, not the
/// message.
#[must_use]
pub fn resolve_cause(text: &str) -> Option<Error> {
    let ids: Vec<u64> = ctxerr_hidden::extract(text)
        .into_iter()
        .filter_map(|payload| <[u8; 8]>::try_from(payload.as_slice()).ok())
        .map(u64::from_be_bytes)
        .collect();
    if ids.is_empty() {
        return None;
    }
    let ring = lock();
    ids.into_iter().find_map(|id| ring.get(id))
}

/// Whether `error` can still be recovered as a structured cause
#[must_use]
pub fn is_tracked(error: &Error) -> bool {
    lock().get(error.id()).is_some()
}

/// Number of errors currently tracked
#[must_use]
pub fn len() -> usize {
    lock().len()
}

/// Maximum number of errors tracked at once
#[must_use]
pub fn capacity() -> usize {
    lock().capacity()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::CallStack;

    fn error(message: &str) -> Error {
        Error::from_parts(message.to_string(), None, "test", CallStack::from_frames(Vec::new()))
    }

    #[test]
    fn ring_evicts_oldest_first() {
        let mut ring = Ring::with_capacity(3);
        let errors: Vec<Error> = (0..6).map(|i| error(&format!("e{i}"))).collect();

        for (i, e) in errors.iter().enumerate() {
            let evicted = ring.insert(e.clone());
            if i < 3 {
                assert!(evicted.is_none());
            } else {
                assert_eq!(evicted.as_ref(), Some(&errors[i - 3]));
            }
        }

        assert_eq!(ring.len(), 3);
        assert_eq!(ring.capacity(), 3);
        for e in &errors[..3] {
            assert!(ring.get(e.id()).is_none());
        }
        for e in &errors[3..] {
            assert_eq!(ring.get(e.id()).as_ref(), Some(e));
        }
    }

    #[test]
    fn zero_capacity_still_holds_one() {
        let mut ring = Ring::with_capacity(0);
        let a = error("a");
        let b = error("b");
        ring.insert(a.clone());
        assert_eq!(ring.insert(b.clone()).as_ref(), Some(&a));
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn resolve_ignores_foreign_markers() {
        let text = format!("oops {}", ctxerr_hidden::encode(b"not-an-id"));
        assert!(resolve_cause(&text).is_none());
        assert!(resolve_cause("no markers").is_none());
    }

    #[test]
    fn resolve_finds_live_error_in_text() {
        let e = error("inner");
        let text = format!("outer: {e}");
        assert_eq!(resolve_cause(&text).as_ref(), Some(&e));
    }
}
