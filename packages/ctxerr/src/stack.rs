//! Call-stack capture

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// One symbolic stack frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Demangled function name, without the trailing hash
    pub symbol: String,
    /// Source file, when debug info is available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Source line, when debug info is available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Frame {
    /// Build a frame from its parts
    pub fn new(symbol: impl Into<String>, file: Option<String>, line: Option<u32>) -> Self {
        Self {
            symbol: symbol.into(),
            file,
            line,
        }
    }

    fn unknown() -> Self {
        Self::new("<unknown>", None, None)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{} ({file}:{line})", self.symbol),
            (Some(file), None) => write!(f, "{} ({file})", self.symbol),
            _ => write!(f, "{}", self.symbol),
        }
    }
}

/// Frames captured when an error was created, innermost call first.
///
/// Never empty: when no symbol information is available a single
/// `<unknown>` frame stands in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallStack {
    frames: Arc<[Frame]>,
}

impl CallStack {
    /// Capture the caller's stack, dropping the frames of this library itself
    #[inline(never)]
    #[must_use]
    pub fn capture(max_frames: usize) -> Self {
        let backtrace = backtrace::Backtrace::new();
        let frames = backtrace
            .frames()
            .iter()
            .flat_map(|frame| frame.symbols())
            .map(|symbol| {
                let name = symbol
                    .name()
                    .map_or_else(|| "<unknown>".to_string(), |name| format!("{name:#}"));
                Frame::new(
                    name,
                    symbol.filename().map(|path| path.display().to_string()),
                    symbol.lineno(),
                )
            })
            .skip_while(is_internal)
            .take(max_frames.max(1))
            .collect();
        Self::from_frames(frames)
    }

    /// Wrap already-known frames
    #[must_use]
    pub fn from_frames(mut frames: Vec<Frame>) -> Self {
        if frames.is_empty() {
            frames.push(Frame::unknown());
        }
        Self {
            frames: frames.into(),
        }
    }

    /// The frames, innermost first
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The frame closest to where the error was created
    #[must_use]
    pub fn innermost(&self) -> &Frame {
        // from_frames guarantees at least one frame
        &self.frames[0]
    }

    /// Number of frames
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`, present for API symmetry with [`CallStack::len`]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

fn is_internal(frame: &Frame) -> bool {
    let symbol = frame.symbol.as_str();
    if symbol.contains("::tests::") {
        return false;
    }
    // leading frames only: core adapters such as map_err sit between the
    // extension traits and the caller
    symbol.starts_with("backtrace::")
        || symbol.starts_with("ctxerr::")
        || symbol.starts_with("<ctxerr::")
        || symbol.contains(" as ctxerr::")
        || symbol.starts_with("core::")
        || symbol.starts_with("<T as core::")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_capture_falls_back_to_unknown_frame() {
        let stack = CallStack::from_frames(Vec::new());
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.innermost().symbol, "<unknown>");
        assert!(!stack.is_empty());
    }

    #[test]
    fn frame_display_includes_location_when_known() {
        let frame = Frame::new("app::handler", Some("src/app.rs".into()), Some(12));
        assert_eq!(frame.to_string(), "app::handler (src/app.rs:12)");
        assert_eq!(Frame::new("app::handler", None, None).to_string(), "app::handler");
    }

    #[test]
    fn capture_respects_frame_limit() {
        let stack = CallStack::capture(2);
        assert!(stack.len() <= 2);
        assert!(!stack.frames().is_empty());
    }

    #[test]
    fn library_frames_are_skipped() {
        assert!(is_internal(&Frame::new("ctxerr::error::constructors::build", None, None)));
        assert!(is_internal(&Frame::new("backtrace::backtrace::trace", None, None)));
        assert!(!is_internal(&Frame::new("ctxerr::stack::tests::capture", None, None)));
        assert!(!is_internal(&Frame::new("my_service::handle", None, None)));
    }
}
