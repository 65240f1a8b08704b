//! Line storage: an arena of line slots linked into document order.
//!
//! The arena is the sole owner of every line. Links between lines and all
//! references held by the section index are plain [`LineId`] handles, so a
//! removed line can never be reached again once its handle is dropped from
//! the index. Freed slots are recycled by later allocations.

use std::ops::Range;

use crate::error::IniError;

/// Stable handle to a line inside a [`LineStore`].
pub type LineId = usize;

/// What a line means to the document model.
///
/// Spans are byte ranges into the line's own contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Whitespace, comments, or anything else without meaning to the model.
    Blank,
    /// Text the parser could not classify. Kept verbatim, never rewritten.
    Malformed,
    /// `[name]`. `name` excludes the brackets and surrounding whitespace.
    Section { name: Range<usize> },
    /// `name = value`.
    ///
    /// `name` excludes quotes. `value` includes the quotes when
    /// `quoted_value` is set, so replacing it swaps the whole token.
    Property {
        name: Range<usize>,
        quoted_name: bool,
        value: Range<usize>,
        quoted_value: bool,
    },
}

#[derive(Debug, Clone)]
pub struct Line {
    pub kind: LineKind,
    pub contents: Vec<u8>,
    prev: Option<LineId>,
    next: Option<LineId>,
}

impl Line {
    /// Whether the contents end in a line feed.
    pub fn is_terminated(&self) -> bool {
        self.contents.last() == Some(&crate::chars::LF)
    }

    pub fn slice(&self, range: &Range<usize>) -> &[u8] {
        &self.contents[range.clone()]
    }
}

#[derive(Debug, Default, Clone)]
pub struct LineStore {
    slots: Vec<Option<Line>>,
    free: Vec<LineId>,
    head: Option<LineId>,
    tail: Option<LineId>,
    len: usize,
}

/// Copy `bytes` into a fresh buffer, reporting allocation failure instead of aborting.
pub fn copy_bytes(bytes: &[u8]) -> Result<Vec<u8>, IniError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes.len())?;
    buf.extend_from_slice(bytes);
    Ok(buf)
}

impl LineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn tail(&self) -> Option<LineId> {
        self.tail
    }

    pub fn get(&self, id: LineId) -> Option<&Line> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.get(id).and_then(|line| line.next)
    }

    pub fn prev(&self, id: LineId) -> Option<LineId> {
        self.get(id).and_then(|line| line.prev)
    }

    /// Make sure `additional` more lines can be created without the slot table
    /// reallocating.
    pub fn reserve(&mut self, additional: usize) -> Result<(), IniError> {
        let spare = self.free.len() + (self.slots.capacity() - self.slots.len());
        if spare < additional {
            self.slots.try_reserve(additional - spare)?;
        }
        Ok(())
    }

    /// Create an unlinked line carrying a copy of `bytes`.
    ///
    /// The line does not appear in iteration until it is linked with
    /// [`link_after`](Self::link_after) or [`push_back`](Self::push_back).
    pub fn allocate(&mut self, kind: LineKind, bytes: &[u8]) -> Result<LineId, IniError> {
        let contents = copy_bytes(bytes)?;
        self.reserve(1)?;
        Ok(self.insert(kind, contents))
    }

    /// Create an unlinked line that takes ownership of `contents`.
    /// Infallible once [`reserve`](Self::reserve) has succeeded.
    pub fn insert(&mut self, kind: LineKind, contents: Vec<u8>) -> LineId {
        let line = Line {
            kind,
            contents,
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(line);
                id
            }
            None => {
                self.slots.push(Some(line));
                self.slots.len() - 1
            }
        }
    }

    /// Link an allocated line after `anchor`, or at the head when `anchor` is `None`.
    pub fn link_after(&mut self, anchor: Option<LineId>, id: LineId) {
        let next = match anchor {
            Some(a) => self.next(a),
            None => self.head,
        };

        if let Some(line) = self.slots[id].as_mut() {
            line.prev = anchor;
            line.next = next;
        }
        match anchor {
            Some(a) => self.set_next(a, Some(id)),
            None => self.head = Some(id),
        }
        match next {
            Some(n) => self.set_prev(n, Some(id)),
            None => self.tail = Some(id),
        }
        self.len += 1;
    }

    pub fn push_back(&mut self, id: LineId) {
        self.link_after(self.tail, id);
    }

    /// Swap a line's kind and payload in one step.
    ///
    /// Callers build the new payload up front, so by the time this runs
    /// nothing can fail and the line is never left half-edited.
    pub fn replace(&mut self, id: LineId, kind: LineKind, contents: Vec<u8>) {
        if let Some(line) = self.slots.get_mut(id).and_then(Option::as_mut) {
            line.kind = kind;
            line.contents = contents;
        }
    }

    /// Make room for [`terminate`](Self::terminate) so it cannot fail.
    pub fn reserve_terminator(&mut self, id: LineId, newline: &[u8]) -> Result<(), IniError> {
        if let Some(line) = self.slots.get_mut(id).and_then(Option::as_mut)
            && !line.is_terminated()
        {
            line.contents.try_reserve_exact(newline.len())?;
        }
        Ok(())
    }

    /// Append `newline` to a line that lacks a terminator.
    pub fn terminate(&mut self, id: LineId, newline: &[u8]) -> Result<(), IniError> {
        if let Some(line) = self.slots.get_mut(id).and_then(Option::as_mut)
            && !line.is_terminated()
        {
            line.contents.try_reserve_exact(newline.len())?;
            line.contents.extend_from_slice(newline);
        }
        Ok(())
    }

    /// Unlink and free a line, returning it.
    pub fn remove(&mut self, id: LineId) -> Option<Line> {
        let line = self.slots.get_mut(id)?.take()?;
        match line.prev {
            Some(p) => self.set_next(p, line.next),
            None => self.head = line.next,
        }
        match line.next {
            Some(n) => self.set_prev(n, line.prev),
            None => self.tail = line.prev,
        }
        self.free.push(id);
        self.len -= 1;
        Some(line)
    }

    /// Lines in document order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            store: self,
            cursor: self.head,
        }
    }

    /// Total payload size of all linked lines.
    pub fn byte_len(&self) -> usize {
        self.iter().map(|(_, line)| line.contents.len()).sum()
    }

    fn set_next(&mut self, id: LineId, next: Option<LineId>) {
        if let Some(line) = self.slots[id].as_mut() {
            line.next = next;
        }
    }

    fn set_prev(&mut self, id: LineId, prev: Option<LineId>) {
        if let Some(line) = self.slots[id].as_mut() {
            line.prev = prev;
        }
    }
}

pub struct Iter<'a> {
    store: &'a LineStore,
    cursor: Option<LineId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (LineId, &'a Line);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let line = self.store.get(id)?;
        self.cursor = line.next;
        Some((id, line))
    }
}
