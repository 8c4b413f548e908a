//! Process-wide values that sit underneath every thread's frames

use crate::{DynamicValue, Entry};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

static GLOBALS: Lazy<RwLock<BTreeMap<String, Entry>>> = Lazy::new(|| RwLock::new(BTreeMap::new()));

/// Set a global value, visible from [`crate::current_with_globals`] on every thread
pub fn put_global(key: impl Into<String>, value: impl Into<serde_json::Value>) {
    GLOBALS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key.into(), Entry::Static(value.into()));
}

/// Set a global value that is recomputed on every merged view
pub fn put_global_dynamic<F>(key: impl Into<String>, compute: F)
where
    F: Fn() -> serde_json::Value + Send + Sync + 'static,
{
    let compute: DynamicValue = Arc::new(compute);
    GLOBALS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key.into(), Entry::Dynamic(compute));
}

/// Remove a global value, returning whether it was present
pub fn remove_global(key: &str) -> bool {
    GLOBALS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(key)
        .is_some()
}

pub(crate) fn entries() -> BTreeMap<String, Entry> {
    GLOBALS.read().unwrap_or_else(PoisonError::into_inner).clone()
}
