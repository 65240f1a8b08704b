//! INI parser: splits a byte buffer into lines and classifies each one.
//!
//! Parsing never fails. Anything that does not fit the dialect becomes a
//! [`LineKind::Malformed`] line and is carried through verbatim. The output
//! is a flat list of byte ranges into the input plus the style hints the
//! document needs when it synthesizes new lines later on.
//!
//! # Dialect
//!
//! - `[name]` opens a section. A second `[` or a stray `]` is malformed.
//! - `name = value` declares a property. Names and values are either bare
//!   (inner whitespace kept, outer whitespace trimmed) or double-quoted
//!   (kept exactly). Inside quotes `""` stands for one literal quote.
//! - An unquoted `;` or `#` starts a comment that runs to the end of the line.
//! - `[Section] name = value` on one line is split into a header line and a
//!   property line at the closing bracket.

use std::ops::Range;

use crate::chars;
use crate::line::LineKind;

/// Line terminator convention of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Newline {
    Lf,
    CrLf,
}

impl Newline {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Newline::Lf => b"\n",
            Newline::CrLf => b"\r\n",
        }
    }

    /// CR-LF on Windows hosts, LF everywhere else.
    pub fn platform() -> Self {
        if cfg!(windows) {
            Newline::CrLf
        } else {
            Newline::Lf
        }
    }
}

/// One classified line, as a range into the parsed buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub kind: LineKind,
    pub range: Range<usize>,
}

/// Result of parsing a buffer.
#[derive(Debug, Default)]
pub struct Parsed {
    pub lines: Vec<ParsedLine>,
    /// Terminator of the first line break, if there was one.
    pub newline: Option<Newline>,
    /// Whether the first property puts whitespace around its `=`.
    pub spaced_assignment: Option<bool>,
    /// Whether section headers are preceded by a blank line.
    pub blank_before_sections: Option<bool>,
}

/// Parse a whole buffer.
pub fn parse(bytes: &[u8]) -> Parsed {
    let mut parsed = Parsed {
        newline: detect_newline(bytes),
        ..Parsed::default()
    };

    let mut start = 0;
    while start < bytes.len() {
        let end = bytes[start..]
            .iter()
            .position(|&b| chars::is_line_break(b))
            .map_or(bytes.len(), |i| start + i + 1);
        emit(&mut parsed, bytes, start..end);
        start = end;
    }

    tracing::trace!(
        lines = parsed.lines.len(),
        bytes = bytes.len(),
        "parsed INI buffer"
    );
    parsed
}

fn detect_newline(bytes: &[u8]) -> Option<Newline> {
    let lf = bytes.iter().position(|&b| chars::is_line_break(b))?;
    if lf > 0 && bytes[lf - 1] == chars::CR {
        Some(Newline::CrLf)
    } else {
        Some(Newline::Lf)
    }
}

fn emit(parsed: &mut Parsed, bytes: &[u8], range: Range<usize>) {
    let line = &bytes[range.clone()];
    match classify(line) {
        Classified::Line(kind) => push(parsed, bytes, kind, range),
        Classified::SectionAndProperty { split, section, property } => {
            let split = range.start + split;
            push(parsed, bytes, section, range.start..split);
            push(parsed, bytes, property, split..range.end);
        }
    }
}

fn push(parsed: &mut Parsed, bytes: &[u8], kind: LineKind, range: Range<usize>) {
    let line = &bytes[range.clone()];
    match &kind {
        LineKind::Malformed => {
            let text = String::from_utf8_lossy(line);
            tracing::trace!(
                line = parsed.lines.len() + 1,
                text = %text.trim_end(),
                "malformed INI line kept verbatim"
            );
        }
        LineKind::Section { .. } => {
            if let Some(prev) = parsed.lines.last() {
                let blank = matches!(prev.kind, LineKind::Blank)
                    && chars::trim(&bytes[prev.range.clone()]).is_empty();
                let hint = parsed.blank_before_sections.get_or_insert(blank);
                *hint |= blank;
            }
        }
        LineKind::Property {
            name,
            quoted_name,
            value,
            ..
        } => {
            if parsed.spaced_assignment.is_none() {
                let after_name = name.end + usize::from(*quoted_name);
                let gap = &line[after_name..value.start];
                parsed.spaced_assignment = Some(gap.iter().any(|&b| chars::is_blank(b)));
            }
        }
        LineKind::Blank => {}
    }
    parsed.lines.push(ParsedLine { kind, range });
}

#[derive(Debug, PartialEq, Eq)]
enum Classified {
    Line(LineKind),
    /// `[Section] name = value`, split after the closing bracket.
    /// Property spans are relative to `split`.
    SectionAndProperty {
        split: usize,
        section: LineKind,
        property: LineKind,
    },
}

/// Span being collected for a name or value token.
#[derive(Debug, Default)]
struct Token {
    /// Outer span: includes the quotes of a quoted token.
    span: Option<Range<usize>>,
    quoted: bool,
    quote_open: bool,
}

impl Token {
    fn is_started(&self) -> bool {
        self.span.is_some()
    }

    fn open_quote(&mut self, at: usize) {
        self.span = Some(at..at + 1);
        self.quoted = true;
        self.quote_open = true;
    }

    fn close_quote(&mut self, at: usize) {
        if let Some(span) = self.span.as_mut() {
            span.end = at + 1;
        }
        self.quote_open = false;
    }

    /// Extend a bare token to cover `at`. Whitespace is never fed here, so
    /// trailing whitespace stays outside the span.
    fn extend_bare(&mut self, at: usize) {
        match self.span.as_mut() {
            Some(span) => span.end = at + 1,
            None => self.span = Some(at..at + 1),
        }
    }

    /// Span without surrounding quotes.
    fn inner(&self) -> Option<Range<usize>> {
        let span = self.span.clone()?;
        if self.quoted {
            Some(span.start + 1..span.end - 1)
        } else {
            Some(span)
        }
    }
}

/// Per-line parser state.
#[derive(Debug, Default)]
struct LineState {
    name: Token,
    value: Token,
    /// Position of the `[` of a header that has not been closed yet.
    section_open: Option<usize>,
    /// Trimmed header name and the index just past the closing `]`.
    section: Option<(Range<usize>, usize)>,
    equals: Option<usize>,
    malformed: bool,
}

fn classify(line: &[u8]) -> Classified {
    let mut st = LineState::default();

    let mut i = 0;
    while i < line.len() && !st.malformed {
        let b = line[i];

        // Inside quotes everything is literal until the closing quote.
        let token = if st.equals.is_some() {
            &mut st.value
        } else {
            &mut st.name
        };
        if token.quote_open {
            if chars::is_quote(b) {
                if line.get(i + 1).copied().is_some_and(chars::is_quote) {
                    i += 2;
                    continue;
                }
                token.close_quote(i);
            } else if chars::is_line_break(b) {
                break;
            }
            i += 1;
            continue;
        }

        if let Some(open) = st.section_open {
            if chars::is_section_close(b) {
                st.section = Some((chars::trim_span(line, open + 1..i), i + 1));
                st.section_open = None;
            } else if chars::is_section_open(b) || chars::is_line_break(b) {
                st.malformed = true;
            }
            i += 1;
            continue;
        }

        if chars::is_whitespace(b) {
            i += 1;
            continue;
        }
        if chars::is_comment_start(b) {
            break;
        }

        if st.equals.is_none() {
            feed_name(&mut st, b, i);
        } else {
            feed_value(&mut st, b, i);
        }
        i += 1;
    }

    if st.name.quote_open || st.value.quote_open || st.section_open.is_some() {
        st.malformed = true;
    }
    if st.malformed {
        return Classified::Line(LineKind::Malformed);
    }

    let property = property_kind(line, &st);
    match (st.section.clone(), property) {
        (Some((name, _)), _) if name.is_empty() => Classified::Line(LineKind::Malformed),
        (Some((name, split)), Some(property)) => Classified::SectionAndProperty {
            split,
            section: LineKind::Section { name },
            property: shift(property, split),
        },
        (Some((name, _)), None) => Classified::Line(LineKind::Section { name }),
        (None, Some(property)) => Classified::Line(property),
        (None, None) => Classified::Line(LineKind::Blank),
    }
}

fn feed_name(st: &mut LineState, b: u8, at: usize) {
    if chars::is_section_open(b) {
        if st.name.is_started() || st.section.is_some() {
            st.malformed = true;
        } else {
            st.section_open = Some(at);
        }
    } else if chars::is_section_close(b) {
        st.malformed = true;
    } else if chars::is_assignment(b) {
        st.equals = Some(at);
    } else if chars::is_quote(b) {
        if st.name.is_started() {
            st.malformed = true;
        } else {
            st.name.open_quote(at);
        }
    } else if st.name.quoted {
        // Text after a closing quote.
        st.malformed = true;
    } else {
        st.name.extend_bare(at);
    }
}

fn feed_value(st: &mut LineState, b: u8, at: usize) {
    if chars::is_assignment(b) {
        st.malformed = true;
    } else if chars::is_quote(b) {
        if st.value.is_started() {
            st.malformed = true;
        } else {
            st.value.open_quote(at);
        }
    } else if st.value.quoted {
        st.malformed = true;
    } else {
        st.value.extend_bare(at);
    }
}

fn property_kind(line: &[u8], st: &LineState) -> Option<LineKind> {
    let equals = st.equals?;
    let name = st.name.inner().filter(|n| !n.is_empty())?;
    let value = st.value.span.clone().unwrap_or_else(|| {
        // Empty value: anchor it after the blanks that follow `=`.
        let mut at = equals + 1;
        while at < line.len() && chars::is_blank(line[at]) {
            at += 1;
        }
        at..at
    });
    Some(LineKind::Property {
        name,
        quoted_name: st.name.quoted,
        value,
        quoted_value: st.value.quoted,
    })
}

fn shift(kind: LineKind, by: usize) -> LineKind {
    match kind {
        LineKind::Property {
            name,
            quoted_name,
            value,
            quoted_value,
        } => LineKind::Property {
            name: name.start - by..name.end - by,
            quoted_name,
            value: value.start - by..value.end - by,
            quoted_value,
        },
        other => other,
    }
}
