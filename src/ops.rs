//! Settings operations: listing, lookup, edits, and result types.
//!
//! Provides the logic behind `list`, `sections`, `get`, `set`, `unset` and
//! `remove-section`, and the `IniResult` enum that callers use to display
//! results.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use crate::error::IniError;
use crate::store::IniSettingsStore;
use crate::types::IniAction;

/// One property in a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub section: String,
    pub key: String,
    pub value: String,
}

/// Result of a settings operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum IniResult {
    /// Properties in document order, grouped by section.
    Listing { entries: Vec<Entry> },
    SectionList { sections: Vec<String> },
    KeyValue {
        section: String,
        key: String,
        value: String,
    },
    /// Confirmation that a value was written.
    ValueSet {
        section: String,
        key: String,
        value: String,
    },
    /// Confirmation that a value was removed.
    ValueUnset { section: String, key: String },
    SectionRemoved { section: String },
    /// The section (or the key inside it) does not exist.
    NotFound { section: String, key: Option<String> },
}

impl IniResult {
    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, IniError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// `key` for the root section, `[section] key` otherwise.
fn qualified(section: &str, key: &str) -> String {
    if section.is_empty() {
        key.to_string()
    } else {
        format!("[{section}] {key}")
    }
}

impl fmt::Display for IniResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IniResult::Listing { entries } => {
                let mut current: Option<&str> = None;
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    if current != Some(entry.section.as_str()) {
                        if !entry.section.is_empty() {
                            writeln!(f, "[{}]", entry.section)?;
                        }
                        current = Some(entry.section.as_str());
                    }
                    write!(f, "{} = {}", entry.key, entry.value)?;
                }
                Ok(())
            }
            IniResult::SectionList { sections } => {
                for (i, section) in sections.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    if section.is_empty() {
                        write!(f, "(root)")?;
                    } else {
                        write!(f, "[{section}]")?;
                    }
                }
                Ok(())
            }
            IniResult::KeyValue { key, value, .. } => write!(f, "{key} = {value}"),
            IniResult::ValueSet {
                section,
                key,
                value,
            } => write!(f, "Set {} = {value}", qualified(section, key)),
            IniResult::ValueUnset { section, key } => {
                write!(f, "Unset {}", qualified(section, key))
            }
            IniResult::SectionRemoved { section } => write!(f, "Removed section [{section}]"),
            IniResult::NotFound { section, key } => match key {
                Some(key) => write!(f, "Not found: {}", qualified(section, key)),
                None => write!(f, "Not found: [{section}]"),
            },
        }
    }
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// List every property of `section`, or of all sections.
pub fn list_values(store: &IniSettingsStore, section: Option<&str>) -> IniResult {
    let doc = store.document();
    let sections = match section {
        Some(s) => vec![s.as_bytes()],
        None => doc.sections(),
    };
    let entries = sections
        .into_iter()
        .flat_map(move |section| {
            doc.properties(section).into_iter().filter_map(move |key| {
                let value = doc.get_value(section, key)?;
                Some(Entry {
                    section: text(section),
                    key: text(key),
                    value: text(&value),
                })
            })
        })
        .collect();
    IniResult::Listing { entries }
}

/// Look up one property.
pub fn get_value(store: &IniSettingsStore, section: &str, key: &str) -> IniResult {
    match store.document().get_value(section, key) {
        Some(value) => IniResult::KeyValue {
            section: section.into(),
            key: key.into(),
            value: text(&value),
        },
        None => IniResult::NotFound {
            section: section.into(),
            key: Some(key.into()),
        },
    }
}

/// Run one action against a store.
pub fn execute(store: &mut IniSettingsStore, action: &IniAction) -> Result<IniResult, IniError> {
    let result = match action {
        IniAction::List { section } => list_values(store, section.as_deref()),
        IniAction::Sections => IniResult::SectionList {
            sections: store.sections().into_iter().map(Cow::into_owned).collect(),
        },
        IniAction::Get { section, key } => get_value(store, section, key),
        IniAction::Set {
            section,
            key,
            value,
        } => {
            store.store(section, key, value.as_str())?;
            IniResult::ValueSet {
                section: section.clone(),
                key: key.clone(),
                value: value.clone(),
            }
        }
        IniAction::Unset { section, key } => {
            if store.delete_property(section, key)? {
                IniResult::ValueUnset {
                    section: section.clone(),
                    key: key.clone(),
                }
            } else {
                IniResult::NotFound {
                    section: section.clone(),
                    key: Some(key.clone()),
                }
            }
        }
        IniAction::RemoveSection { section } => {
            if store.delete_section(section)? {
                IniResult::SectionRemoved {
                    section: section.clone(),
                }
            } else {
                IniResult::NotFound {
                    section: section.clone(),
                    key: None,
                }
            }
        }
    };
    Ok(result)
}
