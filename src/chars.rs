//! Byte classes of the INI dialect.
//!
//! Every metacharacter is 7-bit ASCII, so UTF-8 continuation bytes never
//! match any of these predicates and multi-byte text passes through untouched.

use std::ops::Range;

pub const LF: u8 = b'\n';
pub const CR: u8 = b'\r';
pub const QUOTE: u8 = b'"';

/// Space, tab, carriage return or line feed.
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | CR | LF)
}

/// Whitespace that never ends a line.
#[inline]
pub fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t')
}

#[inline]
pub fn is_line_break(b: u8) -> bool {
    b == LF
}

#[inline]
pub fn is_comment_start(b: u8) -> bool {
    matches!(b, b';' | b'#')
}

#[inline]
pub fn is_section_open(b: u8) -> bool {
    b == b'['
}

#[inline]
pub fn is_section_close(b: u8) -> bool {
    b == b']'
}

#[inline]
pub fn is_assignment(b: u8) -> bool {
    b == b'='
}

#[inline]
pub fn is_quote(b: u8) -> bool {
    b == QUOTE
}

/// Bytes that force a written value into quotes.
#[inline]
pub fn needs_quoting(b: u8) -> bool {
    is_whitespace(b)
        || is_comment_start(b)
        || is_assignment(b)
        || is_quote(b)
        || is_section_open(b)
        || is_section_close(b)
}

/// Strip leading and trailing whitespace (including line breaks).
pub fn trim(bytes: &[u8]) -> &[u8] {
    &bytes[trim_span(bytes, 0..bytes.len())]
}

/// Narrow `span` of `bytes` to exclude leading and trailing whitespace.
pub fn trim_span(bytes: &[u8], span: Range<usize>) -> Range<usize> {
    let inner = &bytes[span.clone()];
    let start = inner
        .iter()
        .position(|&b| !is_whitespace(b))
        .unwrap_or(inner.len());
    let end = inner
        .iter()
        .rposition(|&b| !is_whitespace(b))
        .map_or(start, |i| i + 1);
    span.start + start..span.start + end
}
