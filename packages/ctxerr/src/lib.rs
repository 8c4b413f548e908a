//! # ctxerr
//!
//! Errors that carry more than a message:
//! - ambient context pushed by surrounding code ([`context`])
//! - structured fields attached at the call site ([`Error::with`], [`Error::op`])
//! - a cause, recovered structurally even when the error travelled as plain text
//! - the call stack of their creation, printable line by line
//!
//! ```
//! use ctxerr::{context, Error};
//!
//! let request = context::enter().put("request_id", "r-17");
//! let cause = Error::new("connection refused").op("dial").with("Port", 5432);
//! request.exit();
//!
//! // somewhere else the error only survives as text
//! let plain = std::io::Error::other(format!("query failed: {cause}"));
//! let outer = Error::wrap(plain).with("table", "users");
//!
//! assert_eq!(outer.cause(), Some(&cause));
//! let data = outer.data();
//! assert_eq!(data["request_id"], "r-17");
//! assert_eq!(data["port"], 5432);
//! assert_eq!(data["table"], "users");
//! assert_eq!(outer.operation().as_deref(), Some("dial"));
//! ```

pub mod config;
pub mod error;
pub mod registry;
pub mod stack;

pub use ctxerr_context as context;
pub use ctxerr_hidden as hidden;

pub use config::{ConfigError, ErrorConfig, config, configure};
pub use error::{
    Cause, Error, ErrorLogger, ErrorReport, MultiLinePrinter, OptionExt, Result, ResultExt, keys,
    normalize_key,
};
pub use stack::{CallStack, Frame};
