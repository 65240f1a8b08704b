//! Typed settings store on top of [`IniDocument`].
//!
//! The store adds conversion to and from native types and a file layer. Reads
//! never fail: a missing key and a value of the wrong shape both come back as
//! `None`.

use std::borrow::Cow;
use std::path::Path;

use serde_json::{Map, Value};

use crate::document::IniDocument;
use crate::error::IniError;
use crate::value::{FromIniValue, ToIniValue};

/// Settings backed by a formatting-preserving INI document.
#[derive(Debug, Clone, Default)]
pub struct IniSettingsStore {
    document: IniDocument,
}

impl IniSettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a byte buffer.
    pub fn load(bytes: &[u8]) -> Result<Self, IniError> {
        Ok(Self {
            document: IniDocument::parse(bytes)?,
        })
    }

    /// Serialize the settings, untouched lines byte for byte.
    pub fn save(&self) -> Vec<u8> {
        self.document.serialize()
    }

    /// Read settings from `path`. A missing file gives an empty store.
    pub fn load_file(path: &Path) -> Result<Self, IniError> {
        match crate::persist::read_file(path)? {
            Some(bytes) => {
                let store = Self::load(&bytes)?;
                tracing::debug!(path = %path.display(), bytes = bytes.len(), "loaded settings file");
                Ok(store)
            }
            None => {
                tracing::debug!(path = %path.display(), "settings file missing, starting empty");
                Ok(Self::new())
            }
        }
    }

    /// Write settings to `path`, creating parent directories as needed.
    pub fn save_file(&self, path: &Path) -> Result<(), IniError> {
        crate::persist::write_file(path, &self.save())
    }

    /// Decode a property, or `None` if it is missing or does not decode as `T`.
    pub fn retrieve<T: FromIniValue>(&self, section: &str, key: &str) -> Option<T> {
        self.try_retrieve(section, key).ok().flatten()
    }

    /// Decode a property, falling back to `default`.
    pub fn retrieve_or<T: FromIniValue>(&self, section: &str, key: &str, default: T) -> T {
        self.retrieve(section, key).unwrap_or(default)
    }

    /// Like [`retrieve`](Self::retrieve), but reports why a present value
    /// did not decode.
    pub fn try_retrieve<T: FromIniValue>(
        &self,
        section: &str,
        key: &str,
    ) -> Result<Option<T>, IniError> {
        self.document
            .get_value(section, key)
            .map(|raw| T::from_ini_value(&raw))
            .transpose()
    }

    /// Encode and write a property.
    pub fn store<V: ToIniValue + ?Sized>(
        &mut self,
        section: &str,
        key: &str,
        value: &V,
    ) -> Result<(), IniError> {
        self.document.set_value(section, key, &value.to_ini_value())
    }

    pub fn delete_property(&mut self, section: &str, key: &str) -> Result<bool, IniError> {
        self.document.delete_property(section, key)
    }

    pub fn delete_section(&mut self, section: &str) -> Result<bool, IniError> {
        self.document.delete_section(section)
    }

    /// Section names as text. Bytes that are not UTF-8 are replaced; use
    /// [`document()`](Self::document) to address such names exactly.
    pub fn sections(&self) -> Vec<Cow<'_, str>> {
        self.document
            .sections()
            .into_iter()
            .map(String::from_utf8_lossy)
            .collect()
    }

    pub fn properties(&self, section: &str) -> Vec<Cow<'_, str>> {
        self.document
            .properties(section)
            .into_iter()
            .map(String::from_utf8_lossy)
            .collect()
    }

    /// Whether any mutation succeeded since construction or load.
    pub fn has_changed_since_load(&self) -> bool {
        self.document.is_modified()
    }

    pub fn document(&self) -> &IniDocument {
        &self.document
    }

    pub fn into_document(self) -> IniDocument {
        self.document
    }

    /// All settings as `{ section: { key: value } }` with string values.
    ///
    /// Root properties live under `""`. Non-UTF-8 bytes are replaced.
    pub fn to_json_value(&self) -> Value {
        let mut sections = Map::new();
        for section in self.document.sections() {
            let mut properties = Map::new();
            for key in self.document.properties(section) {
                if let Some(raw) = self.document.get_value(section, key) {
                    let text = String::from_utf8_lossy(&raw).into_owned();
                    let key = String::from_utf8_lossy(key).into_owned();
                    properties.insert(key, Value::String(text));
                }
            }
            let section = String::from_utf8_lossy(section).into_owned();
            sections.insert(section, Value::Object(properties));
        }
        Value::Object(sections)
    }
}

impl From<IniDocument> for IniSettingsStore {
    fn from(document: IniDocument) -> Self {
        Self { document }
    }
}
