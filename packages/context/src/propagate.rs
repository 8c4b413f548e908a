//! Carrying context from one thread to another

use crate::stack::{Context, enter, flatten_entries};
use crate::{Entry, Map, resolve_all};
use std::collections::BTreeMap;
use std::thread::JoinHandle;

/// Frozen copy of a thread's active frames.
///
/// Dynamic values stay dynamic: they are evaluated wherever the snapshot is
/// entered and viewed.
#[derive(Clone)]
pub struct Snapshot {
    entries: BTreeMap<String, Entry>,
}

/// Capture the calling thread's active frames
#[must_use]
pub fn snapshot() -> Snapshot {
    Snapshot {
        entries: flatten_entries(),
    }
}

impl Snapshot {
    /// Push the captured values as one frame on the current thread
    pub fn enter(&self) -> Context {
        enter().put_entries(self.entries.clone())
    }

    /// Resolve the captured values without pushing them
    #[must_use]
    pub fn to_map(&self) -> Map {
        resolve_all(self.entries.clone())
    }

    /// Whether nothing was captured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Spawn a thread that starts with the caller's context already entered
pub fn spawn<F, T>(f: F) -> JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let snapshot = snapshot();
    std::thread::spawn(move || {
        let _context = snapshot.enter();
        f()
    })
}
