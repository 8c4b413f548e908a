//! Thread-local frame stack and its scoped handle

use crate::{DynamicValue, Entry, Map, global, resolve_all};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_FRAME_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static STACK: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

struct Frame {
    id: u64,
    entries: BTreeMap<String, Entry>,
}

/// Handle to one pushed frame.
///
/// Dropping the handle pops the frame, so a frame never outlives the scope
/// that entered it. The handle is tied to the thread that created it.
#[must_use = "the frame is popped as soon as the handle is dropped"]
pub struct Context {
    id: u64,
    exited: bool,
    _thread_bound: PhantomData<*const ()>,
}

/// Push an empty frame onto this thread's stack
pub fn enter() -> Context {
    let id = NEXT_FRAME_ID.fetch_add(1, Ordering::Relaxed);
    STACK.with(|stack| {
        stack.borrow_mut().push(Frame {
            id,
            entries: BTreeMap::new(),
        });
    });
    Context {
        id,
        exited: false,
        _thread_bound: PhantomData,
    }
}

impl Context {
    /// Store `value` under `key` in this handle's frame
    pub fn put(self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.insert(key.into(), Entry::Static(value.into()));
        self
    }

    /// Store a value that is recomputed every time a merged view is taken
    pub fn put_dynamic<F>(self, key: impl Into<String>, compute: F) -> Self
    where
        F: Fn() -> serde_json::Value + Send + Sync + 'static,
    {
        let compute: DynamicValue = Arc::new(compute);
        self.insert(key.into(), Entry::Dynamic(compute));
        self
    }

    /// Pop this handle's frame
    pub fn exit(mut self) {
        self.pop();
    }

    pub(crate) fn put_entries(self, entries: BTreeMap<String, Entry>) -> Self {
        STACK.with(|stack| {
            if let Some(frame) = stack.borrow_mut().iter_mut().rev().find(|f| f.id == self.id) {
                frame.entries.extend(entries);
            }
        });
        self
    }

    fn insert(&self, key: String, entry: Entry) {
        STACK.with(|stack| {
            if let Some(frame) = stack.borrow_mut().iter_mut().rev().find(|f| f.id == self.id) {
                frame.entries.insert(key, entry);
            }
        });
    }

    fn pop(&mut self) {
        if self.exited {
            return;
        }
        self.exited = true;
        let id = self.id;
        // the thread-local may already be gone during thread teardown
        let _ = STACK.try_with(|stack| {
            let mut stack = stack.borrow_mut();
            match stack.iter().rposition(|f| f.id == id) {
                Some(pos) if pos + 1 == stack.len() => {
                    stack.pop();
                }
                Some(pos) => {
                    log::warn!(
                        "context frame {id} exited out of order ({} frames above it)",
                        stack.len() - pos - 1
                    );
                    stack.remove(pos);
                }
                None => log::warn!("context frame {id} exited but is not on the stack"),
            }
        });
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.pop();
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.id)
            .field("exited", &self.exited)
            .finish()
    }
}

pub(crate) fn flatten_entries() -> BTreeMap<String, Entry> {
    STACK.with(|stack| {
        let mut merged = BTreeMap::new();
        for frame in stack.borrow().iter() {
            for (key, entry) in &frame.entries {
                merged.insert(key.clone(), entry.clone());
            }
        }
        merged
    })
}

/// Flatten every active frame on this thread, innermost frame winning per key
#[must_use]
pub fn current() -> Map {
    resolve_all(flatten_entries())
}

/// Like [`current`], with global values underneath the frames
#[must_use]
pub fn current_with_globals() -> Map {
    let mut entries = global::entries();
    entries.extend(flatten_entries());
    resolve_all(entries)
}

/// Number of frames currently on this thread's stack
#[must_use]
pub fn depth() -> usize {
    STACK.with(|stack| stack.borrow().len())
}
