//! The INI document model.
//!
//! An [`IniDocument`] keeps every line of the file it was parsed from, in
//! order, byte for byte. On top of the lines sits an index from section name
//! to property name to the line declaring it. Reads go through the index;
//! writes splice the smallest possible change into the line list:
//!
//! - **Update**: only the value token of the existing line is replaced. The
//!   name, the whitespace around `=`, and any trailing comment stay as they
//!   were.
//! - **Insert**: a new line is placed right after the last property of its
//!   section, formatted like the rest of the file (spacing around `=`,
//!   newline convention). Missing sections are appended at the end.
//! - **Delete**: the property's line (or a section's header and property
//!   lines) is unlinked; comments and unrelated lines are left alone.
//!
//! Serializing an untouched document reproduces its input exactly.
//!
//! Names are bytes, like everything else in the file. `&str` and `&[u8]`
//! both work as arguments; two names are the same only if their bytes are.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::io;

use crate::chars;
use crate::error::IniError;
use crate::line::{self, Line, LineId, LineKind, LineStore};
use crate::parse::{self, Newline};
use crate::value;

/// Index entry for one logical section.
///
/// A section may be declared by several headers; their properties are merged.
#[derive(Debug, Default, Clone)]
struct Section {
    headers: Vec<LineId>,
    /// Lines declaring each property, in document order. The last one wins.
    properties: HashMap<Vec<u8>, Vec<LineId>>,
    /// Property names in order of first appearance.
    order: Vec<Vec<u8>>,
}

/// A formatting-preserving, in-memory INI document.
#[derive(Debug, Clone)]
pub struct IniDocument {
    lines: LineStore,
    sections: HashMap<Vec<u8>, Section>,
    /// Section names in order of first appearance. The root section `""` is
    /// always first.
    order: Vec<Vec<u8>>,
    newline: Newline,
    spaced_assignment: bool,
    blank_before_sections: bool,
    modified: bool,
}

impl Default for IniDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl IniDocument {
    /// An empty document using the platform newline and spaced assignments.
    pub fn new() -> Self {
        let mut sections = HashMap::new();
        sections.insert(Vec::new(), Section::default());
        Self {
            lines: LineStore::new(),
            sections,
            order: vec![Vec::new()],
            newline: Newline::platform(),
            spaced_assignment: true,
            blank_before_sections: true,
            modified: false,
        }
    }

    /// Parse a buffer into a document. Malformed lines are kept, not rejected.
    pub fn parse(bytes: &[u8]) -> Result<Self, IniError> {
        let parsed = parse::parse(bytes);

        let mut doc = Self::new();
        doc.newline = parsed.newline.unwrap_or(doc.newline);
        doc.spaced_assignment = parsed.spaced_assignment.unwrap_or(doc.spaced_assignment);
        doc.blank_before_sections = parsed
            .blank_before_sections
            .unwrap_or(doc.blank_before_sections);

        doc.lines.reserve(parsed.lines.len())?;
        let mut current = Vec::new();
        for parsed_line in parsed.lines {
            let id = doc.lines.allocate(parsed_line.kind, &bytes[parsed_line.range])?;
            doc.lines.push_back(id);

            let Some(line) = doc.lines.get(id) else {
                continue;
            };
            let header = section_name(line).map(<[u8]>::to_vec);
            let key = property_name(line).map(Cow::into_owned);
            if let Some(name) = header {
                doc.section_entry(&name).headers.push(id);
                current = name;
            } else if let Some(key) = key {
                doc.index_property(&current, key, id);
            }
        }

        tracing::debug!(
            lines = doc.lines.len(),
            sections = doc.order.len() - 1,
            newline = ?doc.newline,
            "loaded INI document"
        );
        Ok(doc)
    }

    /// Newline sequence used for synthesized lines.
    pub fn newline(&self) -> Newline {
        self.newline
    }

    /// Whether any mutation succeeded since the document was created or parsed.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Section names in document order.
    ///
    /// The root section `""` is listed first, and only if it has properties.
    pub fn sections(&self) -> Vec<&[u8]> {
        self.order
            .iter()
            .filter(|name| {
                !name.is_empty()
                    || self
                        .sections
                        .get(name.as_slice())
                        .is_some_and(|s| !s.order.is_empty())
            })
            .map(Vec::as_slice)
            .collect()
    }

    pub fn has_section(&self, section: impl AsRef<[u8]>) -> bool {
        self.sections.contains_key(section.as_ref())
    }

    /// Property names of `section` in document order, unescaped. Unknown
    /// sections give an empty list.
    pub fn properties(&self, section: impl AsRef<[u8]>) -> Vec<&[u8]> {
        self.sections
            .get(section.as_ref())
            .map(|s| s.order.iter().map(Vec::as_slice).collect())
            .unwrap_or_default()
    }

    /// Logical value of a property: unquoted, with doubled quotes collapsed.
    pub fn get_value(
        &self,
        section: impl AsRef<[u8]>,
        key: impl AsRef<[u8]>,
    ) -> Option<Cow<'_, [u8]>> {
        let id = *self
            .sections
            .get(section.as_ref())?
            .properties
            .get(key.as_ref())?
            .last()?;
        property_value(self.lines.get(id)?)
    }

    /// Set a property, updating its line in place or inserting a new one.
    ///
    /// Creates the section when it does not exist yet.
    ///
    /// # Errors
    ///
    /// [`IniError::BadName`] for keys containing `=` or line breaks, and for
    /// section names containing brackets or line breaks.
    /// [`IniError::BadValue`] for values spanning several lines.
    /// [`IniError::OutOfMemory`] if the new line could not be allocated.
    /// On error the document is unchanged.
    pub fn set_value(
        &mut self,
        section: impl AsRef<[u8]>,
        key: impl AsRef<[u8]>,
        value: &[u8],
    ) -> Result<(), IniError> {
        let (section, key) = (section.as_ref(), key.as_ref());
        validate_section_name(section)?;
        validate_key(key)?;
        validate_value(value)?;

        let existing = self
            .sections
            .get(section)
            .and_then(|s| s.properties.get(key))
            .and_then(|ids| ids.last().copied());

        match existing {
            Some(id) => self.update_property(id, value)?,
            None => self.insert_property(section, key, value)?,
        }
        self.modified = true;
        Ok(())
    }

    /// Remove every line declaring `key` in `section`.
    ///
    /// Returns whether the property existed.
    pub fn delete_property(
        &mut self,
        section: impl AsRef<[u8]>,
        key: impl AsRef<[u8]>,
    ) -> Result<bool, IniError> {
        let (section, key) = (section.as_ref(), key.as_ref());
        let Some(ids) = self
            .sections
            .get(section)
            .and_then(|s| s.properties.get(key))
            .cloned()
        else {
            return Ok(false);
        };

        self.remove_lines(&ids)?;
        if let Some(sec) = self.sections.get_mut(section) {
            sec.properties.remove(key);
            sec.order.retain(|k| k != key);
        }
        self.modified = true;
        tracing::trace!(section = %lossy(section), key = %lossy(key), "deleted property");
        Ok(true)
    }

    /// Remove all headers and property lines of `section`.
    ///
    /// The root section cannot disappear; deleting it clears its properties.
    /// Returns whether there was anything to delete.
    pub fn delete_section(&mut self, section: impl AsRef<[u8]>) -> Result<bool, IniError> {
        let section = section.as_ref();
        let Some(sec) = self.sections.get(section) else {
            return Ok(false);
        };
        if section.is_empty() && sec.order.is_empty() {
            return Ok(false);
        }

        let mut ids: Vec<LineId> = sec
            .order
            .iter()
            .filter_map(|key| sec.properties.get(key))
            .flatten()
            .copied()
            .collect();
        ids.extend(&sec.headers);
        self.remove_lines(&ids)?;

        if section.is_empty() {
            self.sections.insert(Vec::new(), Section::default());
        } else {
            self.sections.remove(section);
            self.order.retain(|name| name != section);
        }
        self.modified = true;
        tracing::debug!(section = %lossy(section), lines = ids.len(), "deleted section");
        Ok(true)
    }

    /// Concatenate all lines into one buffer.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.lines.byte_len());
        for (_, line) in self.lines.iter() {
            out.extend_from_slice(&line.contents);
        }
        out
    }

    /// Stream all lines into `writer`.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        for (_, line) in self.lines.iter() {
            writer.write_all(&line.contents)?;
        }
        Ok(())
    }

    fn section_entry(&mut self, name: &[u8]) -> &mut Section {
        if !self.sections.contains_key(name) {
            self.order.push(name.to_vec());
        }
        self.sections.entry(name.to_vec()).or_default()
    }

    fn index_property(&mut self, section: &[u8], key: Vec<u8>, id: LineId) {
        let sec = self.section_entry(section);
        match sec.properties.get_mut(&key) {
            Some(ids) => ids.push(id),
            None => {
                sec.order.push(key.clone());
                sec.properties.insert(key, vec![id]);
            }
        }
    }

    fn update_property(&mut self, id: LineId, value: &[u8]) -> Result<(), IniError> {
        let Some(line) = self.lines.get(id) else {
            return Ok(());
        };
        let LineKind::Property {
            name,
            quoted_name,
            value: span,
            quoted_value,
        } = line.kind.clone()
        else {
            return Ok(());
        };

        let quoted = quoted_value || value::needs_quotes(value);
        let encoded = encode_value(value, quoted)?;
        // `key =` with nothing after it gets a space in spaced documents.
        let pad: &[u8] = if span.is_empty()
            && self.spaced_assignment
            && span.start > 0
            && chars::is_assignment(line.contents[span.start - 1])
        {
            b" "
        } else {
            b""
        };

        let mut contents = Vec::new();
        contents.try_reserve_exact(line.contents.len() - span.len() + pad.len() + encoded.len())?;
        contents.extend_from_slice(&line.contents[..span.start]);
        contents.extend_from_slice(pad);
        let start = contents.len();
        contents.extend_from_slice(&encoded);
        let end = contents.len();
        contents.extend_from_slice(&line.contents[span.end..]);

        let kind = LineKind::Property {
            name,
            quoted_name,
            value: start..end,
            quoted_value: quoted,
        };
        self.lines.replace(id, kind, contents);
        tracing::trace!(line = id, "updated property value in place");
        Ok(())
    }

    fn insert_property(
        &mut self,
        section: &[u8],
        key: &[u8],
        value: &[u8],
    ) -> Result<(), IniError> {
        // Everything that can fail happens before the first link changes.
        let (kind, contents) = self.property_line(key, value)?;
        let key = line::copy_bytes(key)?;

        let needs_header = !section.is_empty()
            && !self
                .sections
                .get(section)
                .is_some_and(|s| !s.headers.is_empty());
        let mut header = None;
        let mut spacer = None;
        if needs_header {
            header = Some(self.header_line(section)?);
            if self.blank_before_sections && !self.lines.is_empty() && !self.ends_with_blank_line()
            {
                spacer = Some(line::copy_bytes(self.newline.as_bytes())?);
            }
        }

        let anchor = if needs_header {
            self.lines.tail()
        } else {
            self.insertion_anchor(section)
        };
        self.lines.reserve(3)?;
        self.sections.try_reserve(1)?;
        if let Some(anchor) = anchor {
            self.lines.terminate(anchor, self.newline.as_bytes())?;
        }

        let anchor = match header {
            Some((header_kind, header_contents)) => {
                if let Some(blank) = spacer {
                    let id = self.lines.insert(LineKind::Blank, blank);
                    self.lines.push_back(id);
                }
                let id = self.lines.insert(header_kind, header_contents);
                self.lines.push_back(id);
                self.section_entry(section).headers.push(id);
                tracing::debug!(section = %lossy(section), "appended new section");
                Some(id)
            }
            None => anchor,
        };

        let id = self.lines.insert(kind, contents);
        self.lines.link_after(anchor, id);
        tracing::trace!(
            section = %lossy(section),
            key = %lossy(&key),
            line = id,
            "inserted property"
        );
        self.index_property(section, key, id);
        Ok(())
    }

    /// Line after which a new property of an existing section goes: the
    /// section's last property, else its last header. `None` means the head
    /// of the document, which is where the root section starts.
    fn insertion_anchor(&self, section: &[u8]) -> Option<LineId> {
        let mut in_target = section.is_empty();
        let mut last_property = None;
        let mut last_header = None;
        for (id, line) in self.lines.iter() {
            match &line.kind {
                LineKind::Section { name } => {
                    in_target = line.slice(name) == section;
                    if in_target {
                        last_header = Some(id);
                    }
                }
                LineKind::Property { .. } if in_target => last_property = Some(id),
                _ => {}
            }
        }
        last_property.or(last_header)
    }

    fn ends_with_blank_line(&self) -> bool {
        self.lines
            .tail()
            .and_then(|id| self.lines.get(id))
            .is_some_and(|line| {
                line.kind == LineKind::Blank && chars::trim(&line.contents).is_empty()
            })
    }

    /// Unlink `ids`. A surviving line that loses its terminated successor gets
    /// a newline of its own, so it does not run into whatever follows.
    fn remove_lines(&mut self, ids: &[LineId]) -> Result<(), IniError> {
        let doomed: HashSet<LineId> = ids.iter().copied().collect();
        let mut survivors = Vec::new();
        for &id in ids {
            if !self.lines.get(id).is_some_and(Line::is_terminated) {
                continue;
            }
            let mut prev = self.lines.prev(id);
            while let Some(p) = prev.filter(|p| doomed.contains(p)) {
                prev = self.lines.prev(p);
            }
            if let Some(p) = prev.filter(|p| !survivors.contains(p)) {
                survivors.try_reserve(1)?;
                survivors.push(p);
            }
        }

        let newline = self.newline.as_bytes();
        for &id in &survivors {
            self.lines.reserve_terminator(id, newline)?;
        }
        for &id in &survivors {
            self.lines.terminate(id, newline)?;
        }
        for &id in ids {
            self.lines.remove(id);
        }
        Ok(())
    }

    fn property_line(&self, key: &[u8], value: &[u8]) -> Result<(LineKind, Vec<u8>), IniError> {
        let quoted_name = name_needs_quotes(key);
        let name_token = encode_value(key, quoted_name)?;
        let quoted_value = value::needs_quotes(value);
        let value_token = encode_value(value, quoted_value)?;
        let assignment: &[u8] = if self.spaced_assignment { b" = " } else { b"=" };
        let newline = self.newline.as_bytes();

        let mut contents = Vec::new();
        contents.try_reserve_exact(
            name_token.len() + assignment.len() + value_token.len() + newline.len(),
        )?;
        contents.extend_from_slice(&name_token);
        let name = if quoted_name {
            1..name_token.len() - 1
        } else {
            0..name_token.len()
        };
        contents.extend_from_slice(assignment);
        let start = contents.len();
        contents.extend_from_slice(&value_token);
        let end = contents.len();
        contents.extend_from_slice(newline);

        let kind = LineKind::Property {
            name,
            quoted_name,
            value: start..end,
            quoted_value,
        };
        Ok((kind, contents))
    }

    fn header_line(&self, section: &[u8]) -> Result<(LineKind, Vec<u8>), IniError> {
        let newline = self.newline.as_bytes();
        let mut contents = Vec::new();
        contents.try_reserve_exact(section.len() + 2 + newline.len())?;
        contents.push(b'[');
        contents.extend_from_slice(section);
        contents.push(b']');
        contents.extend_from_slice(newline);
        let kind = LineKind::Section {
            name: 1..1 + section.len(),
        };
        Ok((kind, contents))
    }
}

fn section_name(line: &Line) -> Option<&[u8]> {
    match &line.kind {
        LineKind::Section { name } => Some(line.slice(name)),
        _ => None,
    }
}

fn property_name(line: &Line) -> Option<Cow<'_, [u8]>> {
    match &line.kind {
        LineKind::Property {
            name, quoted_name, ..
        } => {
            let raw = line.slice(name);
            Some(if *quoted_name {
                value::unescape(raw)
            } else {
                Cow::Borrowed(raw)
            })
        }
        _ => None,
    }
}

/// Names for log fields and error messages.
fn lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

fn property_value(line: &Line) -> Option<Cow<'_, [u8]>> {
    match &line.kind {
        LineKind::Property {
            value,
            quoted_value: true,
            ..
        } => Some(value::unescape(&line.contents[value.start + 1..value.end - 1])),
        LineKind::Property { value, .. } => Some(Cow::Borrowed(line.slice(value))),
        _ => None,
    }
}

fn encode_value(bytes: &[u8], quoted: bool) -> Result<Vec<u8>, IniError> {
    if quoted {
        value::quote(bytes)
    } else {
        line::copy_bytes(bytes)
    }
}

/// Bare names may hold inner whitespace, but not anything the parser would
/// read as structure.
fn name_needs_quotes(name: &[u8]) -> bool {
    let padded = name.first().copied().is_some_and(chars::is_whitespace)
        || name.last().copied().is_some_and(chars::is_whitespace);
    padded
        || name.iter().any(|&b| {
            chars::is_comment_start(b)
                || chars::is_quote(b)
                || chars::is_section_open(b)
                || chars::is_section_close(b)
        })
}

fn bad_name(name: &[u8], reason: &'static str) -> IniError {
    IniError::BadName {
        name: lossy(name).into_owned(),
        reason,
    }
}

fn has_line_break(bytes: &[u8]) -> bool {
    bytes.iter().any(|&b| b == chars::LF || b == chars::CR)
}

fn validate_key(key: &[u8]) -> Result<(), IniError> {
    if key.is_empty() {
        return Err(bad_name(key, "property names cannot be empty"));
    }
    if key.iter().copied().any(chars::is_assignment) {
        return Err(bad_name(key, "property names cannot contain '='"));
    }
    if has_line_break(key) {
        return Err(bad_name(key, "names cannot contain line breaks"));
    }
    Ok(())
}

fn validate_section_name(section: &[u8]) -> Result<(), IniError> {
    if section
        .iter()
        .any(|&b| chars::is_section_open(b) || chars::is_section_close(b))
    {
        return Err(bad_name(section, "section names cannot contain brackets"));
    }
    if has_line_break(section) {
        return Err(bad_name(section, "names cannot contain line breaks"));
    }
    if chars::trim(section).len() != section.len() {
        return Err(bad_name(
            section,
            "section names cannot start or end with whitespace",
        ));
    }
    Ok(())
}

fn validate_value(value: &[u8]) -> Result<(), IniError> {
    if has_line_break(value) {
        return Err(IniError::BadValue {
            value: lossy(value).into_owned(),
            expected: "a single-line value",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{MESSY, SAMPLE};

    fn doc(text: &str) -> IniDocument {
        IniDocument::parse(text.as_bytes()).unwrap()
    }

    fn text(doc: &IniDocument) -> String {
        String::from_utf8(doc.serialize()).unwrap()
    }

    fn value(doc: &IniDocument, section: &str, key: &str) -> Option<String> {
        doc.get_value(section, key)
            .map(|v| String::from_utf8(v.into_owned()).unwrap())
    }

    fn names(list: Vec<&[u8]>) -> Vec<&str> {
        list.into_iter()
            .map(|name| std::str::from_utf8(name).unwrap())
            .collect()
    }

    fn nl() -> &'static str {
        std::str::from_utf8(Newline::platform().as_bytes()).unwrap()
    }

    #[test]
    fn sample_is_indexed() {
        let doc = doc(SAMPLE);
        assert_eq!(names(doc.sections()), vec!["", "ImportantStuff"]);
        assert_eq!(value(&doc, "", "GlobalProperty").as_deref(), Some("1"));
        assert_eq!(value(&doc, "ImportantStuff", "Normal").as_deref(), Some("42"));
        assert_eq!(value(&doc, "ImportantStuff", "CommentedOut"), None);
        assert_eq!(names(doc.properties("ImportantStuff")), vec!["Normal"]);
    }

    #[test]
    fn untouched_documents_round_trip() {
        for input in [SAMPLE, MESSY, "", "\n", "no newline at all", "A=1\r\nB=2"] {
            assert_eq!(text(&doc(input)), input);
        }
    }

    #[test]
    fn update_replaces_only_the_value() {
        let mut doc = doc(SAMPLE);
        doc.set_value("ImportantStuff", "Normal", b"99").unwrap();
        assert_eq!(text(&doc), SAMPLE.replace("42", "99"));
        assert_eq!(value(&doc, "ImportantStuff", "Normal").as_deref(), Some("99"));
    }

    #[test]
    fn update_keeps_trailing_comment_and_spacing() {
        let mut doc = doc("Port   =   8080 ; default\n");
        doc.set_value("", "Port", b"9090").unwrap();
        assert_eq!(text(&doc), "Port   =   9090 ; default\n");
    }

    #[test]
    fn update_keeps_quotes() {
        let mut doc = doc("Quoted = \"World\"\n");
        doc.set_value("", "Quoted", b"Earth").unwrap();
        assert_eq!(text(&doc), "Quoted = \"Earth\"\n");
        assert_eq!(value(&doc, "", "Quoted").as_deref(), Some("Earth"));
    }

    #[test]
    fn update_fills_empty_value() {
        let mut doc = doc("Empty =\nOther = 1\n");
        doc.set_value("", "Empty", b"x").unwrap();
        assert_eq!(text(&doc), "Empty = x\nOther = 1\n");
    }

    #[test]
    fn insert_into_empty_document() {
        let mut doc = IniDocument::new();
        doc.set_value("", "NumericBoolean", b"1").unwrap();
        assert_eq!(text(&doc), format!("NumericBoolean = 1{}", nl()));
    }

    #[test]
    fn insert_after_last_property_of_section() {
        let mut doc = doc(SAMPLE);
        doc.set_value("ImportantStuff", "Added", b"7").unwrap();
        assert_eq!(
            text(&doc),
            "GlobalProperty=1\n\n[ImportantStuff]\n;CommentedOut=5000\nNormal=42\nAdded=7\n\n"
        );
    }

    #[test]
    fn insert_into_root_goes_after_root_properties() {
        let mut doc = doc(SAMPLE);
        doc.set_value("", "Second", b"2").unwrap();
        assert!(text(&doc).starts_with("GlobalProperty=1\nSecond=2\n\n[ImportantStuff]"));
    }

    #[test]
    fn insert_into_empty_root_goes_to_head() {
        let mut doc = doc("[S]\nx=1\n");
        doc.set_value("", "g", b"1").unwrap();
        assert_eq!(text(&doc), "g=1\n[S]\nx=1\n");
        assert_eq!(names(doc.sections()), vec!["", "S"]);
    }

    #[test]
    fn new_section_is_appended_with_spacing() {
        let mut doc = doc("A = 1\n");
        doc.set_value("Sec", "B", b"2").unwrap();
        assert_eq!(text(&doc), "A = 1\n\n[Sec]\nB = 2\n");
        assert_eq!(names(doc.sections()), vec!["", "Sec"]);
    }

    #[test]
    fn new_section_follows_compact_style() {
        let mut doc = doc("A=1\n[S]\nB=2\n");
        doc.set_value("T", "C", b"3").unwrap();
        doc.set_value("S", "D", b"4").unwrap();
        assert_eq!(text(&doc), "A=1\n[S]\nB=2\nD=4\n[T]\nC=3\n");
    }

    #[test]
    fn crlf_documents_get_crlf_lines() {
        let mut doc = doc("A = 1\r\n");
        assert_eq!(doc.newline(), Newline::CrLf);
        doc.set_value("", "B", b"2").unwrap();
        assert_eq!(text(&doc), "A = 1\r\nB = 2\r\n");
    }

    #[test]
    fn unterminated_last_line_is_terminated_before_insert() {
        let mut doc = doc("A = 1");
        doc.set_value("", "B", b"2").unwrap();
        assert_eq!(text(&doc), format!("A = 1{0}B = 2{0}", nl()));
    }

    #[test]
    fn values_needing_quotes_are_quoted() {
        let mut doc = IniDocument::new();
        doc.set_value("", "Greeting", b"Hello World").unwrap();
        doc.set_value("", "Empty", b"").unwrap();
        doc.set_value("", "Quote", b"say \"hi\"").unwrap();
        let expected = format!(
            "Greeting = \"Hello World\"{0}Empty = \"\"{0}Quote = \"say \"\"hi\"\"\"{0}",
            nl()
        );
        assert_eq!(text(&doc), expected);

        let reparsed = IniDocument::parse(&doc.serialize()).unwrap();
        assert_eq!(value(&reparsed, "", "Greeting").as_deref(), Some("Hello World"));
        assert_eq!(value(&reparsed, "", "Empty").as_deref(), Some(""));
        assert_eq!(value(&reparsed, "", "Quote").as_deref(), Some("say \"hi\""));
    }

    #[test]
    fn odd_names_are_quoted() {
        let mut doc = IniDocument::new();
        doc.set_value("", " padded ", b"1").unwrap();
        doc.set_value("", "semi;colon", b"2").unwrap();
        let reparsed = IniDocument::parse(&doc.serialize()).unwrap();
        assert_eq!(names(reparsed.properties("")), vec![" padded ", "semi;colon"]);
        assert_eq!(value(&reparsed, "", " padded ").as_deref(), Some("1"));
    }

    #[test]
    fn bad_names_leave_document_unchanged() {
        let mut doc = doc(SAMPLE);
        assert!(matches!(
            doc.set_value("", "a=b", b"1"),
            Err(IniError::BadName { .. })
        ));
        assert!(matches!(
            doc.set_value("", "", b"1"),
            Err(IniError::BadName { .. })
        ));
        assert!(matches!(
            doc.set_value("", "line\nbreak", b"1"),
            Err(IniError::BadName { .. })
        ));
        assert!(matches!(
            doc.set_value("[x", "k", b"1"),
            Err(IniError::BadName { .. })
        ));
        assert!(matches!(
            doc.set_value(" x", "k", b"1"),
            Err(IniError::BadName { .. })
        ));
        assert!(matches!(
            doc.set_value("", "k", b"two\nlines"),
            Err(IniError::BadValue { .. })
        ));
        assert_eq!(text(&doc), SAMPLE);
        assert!(!doc.is_modified());
    }

    #[test]
    fn delete_property_removes_line() {
        let mut doc = doc(SAMPLE);
        assert!(doc.delete_property("ImportantStuff", "Normal").unwrap());
        assert_eq!(value(&doc, "ImportantStuff", "Normal"), None);
        assert!(doc.properties("ImportantStuff").is_empty());
        assert_eq!(
            text(&doc),
            "GlobalProperty=1\n\n[ImportantStuff]\n;CommentedOut=5000\n\n"
        );
        assert!(!doc.delete_property("ImportantStuff", "Normal").unwrap());
        assert!(!doc.delete_property("Nowhere", "Normal").unwrap());
    }

    #[test]
    fn delete_section_removes_all_headers() {
        let mut doc = doc("[A]\nx=1\n[B]\ny=2\n[A]\nz=3\n");
        assert_eq!(names(doc.sections()), vec!["A", "B"]);
        assert_eq!(names(doc.properties("A")), vec!["x", "z"]);

        assert!(doc.delete_section("A").unwrap());
        assert_eq!(text(&doc), "[B]\ny=2\n");
        assert_eq!(names(doc.sections()), vec!["B"]);
        assert!(!doc.has_section("A"));
        assert!(!doc.delete_section("A").unwrap());
    }

    #[test]
    fn duplicate_headers_merge() {
        let mut doc = doc("[A]\nx=1\n[B]\ny=2\n[A]\nz=3\n");
        doc.set_value("A", "w", b"4").unwrap();
        assert_eq!(text(&doc), "[A]\nx=1\n[B]\ny=2\n[A]\nz=3\nw=4\n");
    }

    #[test]
    fn delete_root_section_keeps_root() {
        let mut doc = doc(SAMPLE);
        assert!(doc.delete_section("").unwrap());
        assert_eq!(names(doc.sections()), vec!["ImportantStuff"]);
        assert!(doc.has_section(""));
        assert!(!doc.delete_section("").unwrap());
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let mut doc = doc("k=1\nk=2\n");
        assert_eq!(value(&doc, "", "k").as_deref(), Some("2"));
        assert_eq!(names(doc.properties("")), vec!["k"]);

        doc.set_value("", "k", b"3").unwrap();
        assert_eq!(text(&doc), "k=1\nk=3\n");

        assert!(doc.delete_property("", "k").unwrap());
        assert_eq!(text(&doc), "");
    }

    #[test]
    fn section_and_property_on_one_line() {
        let input = "[Foo] Bar = Baz\nNext = 1\n";
        let mut doc = doc(input);
        assert_eq!(names(doc.sections()), vec!["Foo"]);
        assert_eq!(names(doc.properties("Foo")), vec!["Bar", "Next"]);
        assert_eq!(value(&doc, "Foo", "Bar").as_deref(), Some("Baz"));
        assert_eq!(text(&doc), input);

        doc.delete_property("Foo", "Bar").unwrap();
        assert_eq!(text(&doc), "[Foo]\nNext = 1\n");
    }

    #[test]
    fn malformed_lines_are_not_indexed() {
        let doc = doc(MESSY);
        for section in doc.sections() {
            for key in doc.properties(section) {
                assert!(doc.get_value(section, key).is_some(), "{section:?}/{key:?}");
            }
        }
        assert!(!doc.properties("").contains(&b"Broken".as_slice()));
    }

    #[test]
    fn untouched_lines_survive_edits() {
        let mut doc = doc(MESSY);
        doc.set_value("Paths", "Home", b"/root").unwrap();
        doc.delete_property("Paths", "Temp").unwrap();
        let out = text(&doc);
        for line in MESSY.lines().filter(|l| !l.contains("Home") && !l.contains("Temp")) {
            assert!(out.contains(line), "lost line {line:?}");
        }
    }

    #[test]
    fn modified_flag() {
        let mut doc = doc(SAMPLE);
        assert!(!doc.is_modified());
        doc.get_value("", "GlobalProperty");
        assert!(!doc.is_modified());
        doc.delete_property("", "Missing").unwrap();
        assert!(!doc.is_modified());
        doc.set_value("", "GlobalProperty", b"1").unwrap();
        assert!(doc.is_modified());
        doc.get_value("", "GlobalProperty");
        assert!(doc.is_modified());
    }

    #[test]
    fn latin1_section_receives_its_own_inserts() {
        let mut doc = IniDocument::parse(b"[Gr\xf6\xdfe]\nA=1\n").unwrap();
        let section = doc.sections()[0].to_vec();
        assert_eq!(section, b"Gr\xf6\xdfe");

        doc.set_value(&section, "B", b"2").unwrap();
        assert_eq!(doc.serialize(), b"[Gr\xf6\xdfe]\nA=1\nB=2\n");

        let reparsed = IniDocument::parse(&doc.serialize()).unwrap();
        assert!(reparsed.properties("").is_empty());
        assert_eq!(names(reparsed.properties(&section)), vec!["A", "B"]);
        assert!(!reparsed.has_section("Gr\u{fffd}\u{fffd}e"));
    }

    #[test]
    fn byte_distinct_names_stay_distinct() {
        let mut doc = IniDocument::parse(b"k\xff=1\nk\xfe=2\n").unwrap();
        assert_eq!(
            doc.properties(""),
            vec![b"k\xff".as_slice(), b"k\xfe".as_slice()]
        );
        assert_eq!(doc.get_value("", b"k\xff").as_deref(), Some(b"1".as_slice()));
        assert_eq!(doc.get_value("", "k\u{fffd}"), None);

        assert!(doc.delete_property("", b"k\xff").unwrap());
        assert_eq!(doc.serialize(), b"k\xfe=2\n");
    }

    #[test]
    fn delete_terminates_every_surviving_header() {
        let mut doc = doc("[A] k = 1\n[B] y = 2\n[A] k = 3\n");
        assert_eq!(value(&doc, "A", "k").as_deref(), Some("3"));
        assert!(doc.delete_property("A", "k").unwrap());
        assert_eq!(text(&doc), "[A]\n[B] y = 2\n[A]\n");
        assert_eq!(value(&doc, "B", "y").as_deref(), Some("2"));
    }

    #[test]
    fn write_to_matches_serialize() {
        let doc = doc(MESSY);
        let mut out = Vec::new();
        doc.write_to(&mut out).unwrap();
        assert_eq!(out, doc.serialize());
    }
}
