//! Lazy, line-at-a-time rendering of an error and its causes

use super::types::{Cause, Error};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Stateful printer returned by [`Error::multi_line_printer`].
///
/// Each [`print_line`](Self::print_line) call writes exactly one line, without
/// a line terminator:
///
/// ```text
/// <message>
///   at <frame>            (one per frame, innermost first)
/// Caused by: <message>
///   at <frame>
/// ...
/// ```
///
/// and reports whether more lines remain, leaving separators to the caller.
pub struct MultiLinePrinter {
    state: State,
}

enum State {
    Header { link: Link, first: bool },
    Frames { error: Error, next: usize },
    Done,
}

enum Link {
    Tracked(Error),
    /// Opaque errors are walked through `source()`; `depth` counts hops from `root`
    Opaque {
        root: Arc<dyn StdError + Send + Sync>,
        depth: usize,
    },
}

impl Link {
    fn message(&self) -> String {
        match self {
            Self::Tracked(error) => error.message().to_string(),
            Self::Opaque { root, depth } => source_at(&**root, *depth)
                .map(|error| ctxerr_hidden::strip(&error.to_string()))
                .unwrap_or_default(),
        }
    }
}

fn source_at<'a>(
    root: &'a (dyn StdError + 'static),
    depth: usize,
) -> Option<&'a (dyn StdError + 'static)> {
    let mut current = root;
    for _ in 0..depth {
        current = current.source()?;
    }
    Some(current)
}

fn after_frames(error: &Error) -> State {
    match error.cause_link() {
        Some(Cause::Tracked(cause)) => State::Header {
            link: Link::Tracked(cause.clone()),
            first: false,
        },
        Some(Cause::Opaque(root)) => State::Header {
            link: Link::Opaque {
                root: Arc::clone(root),
                depth: 0,
            },
            first: false,
        },
        None => State::Done,
    }
}

impl MultiLinePrinter {
    fn new(error: &Error) -> Self {
        Self {
            state: State::Header {
                link: Link::Tracked(error.clone()),
                first: true,
            },
        }
    }

    /// Write the next line into `buf`; returns `false` once the last line has
    /// been written, and on every call after that without writing anything.
    ///
    /// A failed write also returns `false` but leaves the printer where it
    /// was, so the same line is written again by the next call.
    pub fn print_line<W: fmt::Write + ?Sized>(&mut self, buf: &mut W) -> bool {
        self.write_line(buf).unwrap_or(false)
    }

    pub(crate) fn write_line<W: fmt::Write + ?Sized>(
        &mut self,
        buf: &mut W,
    ) -> Result<bool, fmt::Error> {
        match &self.state {
            State::Done => return Ok(false),
            State::Header { link, first } => {
                let message = link.message();
                if *first {
                    buf.write_str(&message)?;
                } else {
                    write!(buf, "Caused by: {message}")?;
                }
            }
            State::Frames { error, next } => {
                if let Some(frame) = error.call_stack().frames().get(*next) {
                    write!(buf, "  at {frame}")?;
                }
            }
        }
        let state = std::mem::replace(&mut self.state, State::Done);
        self.state = advance(state);
        Ok(!matches!(self.state, State::Done))
    }
}

fn advance(state: State) -> State {
    match state {
        State::Done => State::Done,
        State::Header {
            link: Link::Tracked(error),
            ..
        } => State::Frames { error, next: 0 },
        State::Header {
            link: Link::Opaque { root, depth },
            ..
        } => {
            if source_at(&*root, depth + 1).is_some() {
                State::Header {
                    link: Link::Opaque {
                        root,
                        depth: depth + 1,
                    },
                    first: false,
                }
            } else {
                State::Done
            }
        }
        State::Frames { error, next } => {
            if next + 1 < error.call_stack().len() {
                State::Frames {
                    error,
                    next: next + 1,
                }
            } else {
                after_frames(&error)
            }
        }
    }
}

impl Iterator for MultiLinePrinter {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.state, State::Done) {
            return None;
        }
        let mut line = String::new();
        self.print_line(&mut line);
        Some(line)
    }
}

impl Error {
    /// Printer over this error's message, frames and cause chain
    #[must_use]
    pub fn multi_line_printer(&self) -> MultiLinePrinter {
        MultiLinePrinter::new(self)
    }

    /// Full trace as one newline-separated string
    #[must_use]
    pub fn stack_trace(&self) -> String {
        self.multi_line_printer().collect::<Vec<_>>().join("\n")
    }
}
