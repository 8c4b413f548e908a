//! Marker encoding, stripping and recovery

use crate::error::HiddenError;

/// Opens a marker (`U+2061 FUNCTION APPLICATION`, renders as nothing)
pub const MARKER_START: char = '\u{2061}';

/// Closes a marker (`U+2064 INVISIBLE PLUS`, renders as nothing)
pub const MARKER_END: char = '\u{2064}';

const SYMBOLS: [char; 16] = [
    '\u{FE00}', '\u{FE01}', '\u{FE02}', '\u{FE03}', '\u{FE04}', '\u{FE05}', '\u{FE06}', '\u{FE07}',
    '\u{FE08}', '\u{FE09}', '\u{FE0A}', '\u{FE0B}', '\u{FE0C}', '\u{FE0D}', '\u{FE0E}', '\u{FE0F}',
];

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

fn symbol_for_digit(digit: u8) -> Option<char> {
    let nibble = HEX_DIGITS.iter().position(|d| *d == digit)?;
    SYMBOLS.get(nibble).copied()
}

fn digit_for_symbol(symbol: char) -> Option<char> {
    let nibble = (symbol as u32).checked_sub(SYMBOLS[0] as u32)?;
    HEX_DIGITS.get(nibble as usize).map(|d| char::from(*d))
}

/// Encode `data` as an invisible marker fragment
#[must_use]
pub fn encode(data: &[u8]) -> String {
    let digits = hex::encode(data);
    let mut out = String::with_capacity(digits.len() * 3 + 6);
    out.push(MARKER_START);
    out.extend(digits.bytes().filter_map(symbol_for_digit));
    out.push(MARKER_END);
    out
}

/// Whether `text` carries at least one marker start symbol
#[must_use]
pub fn contains_marker(text: &str) -> bool {
    text.contains(MARKER_START)
}

enum Event<'a> {
    Text(char),
    Marker { digits: &'a str, terminated: bool },
}

/// A single pass over `text` that separates visible characters from markers.
///
/// Markers are reported with their hex digits and whether they were properly
/// terminated.
fn scan(text: &str, mut on_event: impl FnMut(Event<'_>)) {
    let mut digits = String::new();
    let mut in_marker = false;

    for c in text.chars() {
        if c == MARKER_START {
            if in_marker {
                on_event(Event::Marker { digits: &digits, terminated: false });
            }
            digits.clear();
            in_marker = true;
            continue;
        }
        if !in_marker {
            if c != MARKER_END {
                on_event(Event::Text(c));
            }
            continue;
        }
        if c == MARKER_END {
            on_event(Event::Marker { digits: &digits, terminated: true });
            in_marker = false;
        } else if let Some(digit) = digit_for_symbol(c) {
            digits.push(digit);
        } else {
            // malformed marker, the visible text resumes here
            on_event(Event::Marker { digits: &digits, terminated: false });
            in_marker = false;
            on_event(Event::Text(c));
        }
    }

    if in_marker {
        on_event(Event::Marker { digits: &digits, terminated: false });
    }
}

/// Remove every marker from `text`, leaving only the visible characters
#[must_use]
pub fn strip(text: &str) -> String {
    if !contains_marker(text) && !text.contains(MARKER_END) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    scan(text, |event| {
        if let Event::Text(c) = event {
            out.push(c);
        }
    });
    out
}

/// Render every marker as visible `[hex]` content
#[must_use]
pub fn reveal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    scan(text, |event| match event {
        Event::Text(c) => out.push(c),
        Event::Marker { digits, .. } => {
            out.push('[');
            out.push_str(digits);
            out.push(']');
        }
    });
    out
}

/// Decode every well-formed marker found in `text`, in order of appearance.
///
/// Malformed markers are skipped.
#[must_use]
pub fn extract(text: &str) -> Vec<Vec<u8>> {
    let mut payloads = Vec::new();
    if !contains_marker(text) {
        return payloads;
    }
    scan(text, |event| {
        if let Event::Marker { digits, terminated: true } = event {
            if let Ok(bytes) = hex::decode(digits) {
                payloads.push(bytes);
            }
        }
    });
    payloads
}

/// Strictly decode a fragment that consists of exactly one marker
///
/// # Errors
///
/// Returns a [`HiddenError`] describing the first structural problem found.
pub fn decode(fragment: &str) -> Result<Vec<u8>, HiddenError> {
    let mut chars = fragment.chars();
    if chars.next() != Some(MARKER_START) {
        return Err(HiddenError::MissingStart);
    }

    let mut digits = String::new();
    while let Some(c) = chars.next() {
        if c == MARKER_END {
            if let Some(extra) = chars.next() {
                return Err(HiddenError::InvalidSymbol(extra));
            }
            if digits.len() % 2 != 0 {
                return Err(HiddenError::OddLength(digits.len()));
            }
            return hex::decode(&digits).map_err(|_| HiddenError::OddLength(digits.len()));
        }
        match digit_for_symbol(c) {
            Some(digit) => digits.push(digit),
            None => return Err(HiddenError::InvalidSymbol(c)),
        }
    }
    Err(HiddenError::Unterminated)
}
