//! # Ambient context
//!
//! A per-thread stack of key/value frames. Surrounding code pushes a frame
//! with [`enter`], decorates it with [`Context::put`], and the frame is popped
//! again by [`Context::exit`] or when the handle is dropped. Anything that
//! wants to know "where am I" takes a flattened view with [`current`].
//!
//! ```
//! use ctxerr_context::{current, enter};
//!
//! let request = enter().put("request_id", "abc").put("attempt", 1);
//! {
//!     let _retry = enter().put("attempt", 2);
//!     assert_eq!(current()["attempt"], 2);
//! }
//! assert_eq!(current()["attempt"], 1);
//! request.exit();
//! assert!(current().is_empty());
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

pub mod global;
pub mod propagate;
pub mod stack;

pub use global::{put_global, put_global_dynamic, remove_global};
pub use propagate::{Snapshot, snapshot, spawn};
pub use serde_json::Value;
pub use stack::{Context, current, current_with_globals, depth, enter};

/// Flattened key/value view of the context
pub type Map = BTreeMap<String, Value>;

/// Value computed each time a merged view is taken
pub type DynamicValue = Arc<dyn Fn() -> Value + Send + Sync>;

/// A value stored in a frame
#[derive(Clone)]
pub(crate) enum Entry {
    Static(Value),
    Dynamic(DynamicValue),
}

impl Entry {
    pub(crate) fn resolve(&self) -> Value {
        match self {
            Self::Static(value) => value.clone(),
            Self::Dynamic(compute) => compute(),
        }
    }
}

/// Resolve entries once the stack borrow has been released, so dynamic values
/// may themselves consult the context.
pub(crate) fn resolve_all(entries: BTreeMap<String, Entry>) -> Map {
    entries
        .into_iter()
        .map(|(key, entry)| {
            let value = entry.resolve();
            (key, value)
        })
        .collect()
}
