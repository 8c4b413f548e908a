//! Contextual error type
//!
//! Provides the [`Error`] entity with:
//! - ambient context captured at creation
//! - normalized structured fields (`with`, `op`)
//! - structured or opaque causes
//! - call-stack capture and a lazy multi-line printer

pub mod constructors;
pub mod display;
pub mod extensions;
pub mod keys;
pub mod logging;
pub mod macros;
pub mod merge;
pub mod printer;
pub mod report;
pub mod types;

pub use extensions::{OptionExt, ResultExt};
pub use keys::normalize_key;
pub use logging::ErrorLogger;
pub use printer::MultiLinePrinter;
pub use report::ErrorReport;
pub use types::{Cause, Error, Result};
