use std::path::PathBuf;

use crate::error::IniError;
use crate::file;
use crate::ops::{self, IniResult};
use crate::store::IniSettingsStore;
use crate::types::{IniAction, SearchPath};

/// Entry point for opening an application's settings file.
pub struct IniSettings;

impl IniSettings {
    pub fn builder() -> IniSettingsBuilder {
        IniSettingsBuilder::new()
    }
}

/// Builder that locates a settings file and runs [`IniAction`]s against it.
///
/// The file is `{location}/{file_name}`. Only [`app_name()`](Self::app_name)
/// is required; everything else derives from it.
#[derive(Debug, Default)]
pub struct IniSettingsBuilder {
    app_name: Option<String>,
    file_name: Option<String>,
    location: Option<SearchPath>,
}

impl IniSettingsBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Set the application name. This derives sensible defaults:
    /// - `file_name` → `"{app_name}.ini"`
    /// - `location` → [`SearchPath::Platform`]
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Override the settings file name (default: `"{app_name}.ini"`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Directory holding the settings file (default: [`SearchPath::Platform`]).
    pub fn location(mut self, location: SearchPath) -> Self {
        self.location = Some(location);
        self
    }

    /// Resolve the effective app name, or error if not set.
    fn effective_app_name(&self) -> Result<&str, IniError> {
        self.app_name.as_deref().ok_or(IniError::AppNameRequired)
    }

    fn effective_file_name(&self) -> Result<String, IniError> {
        if let Some(name) = &self.file_name {
            return Ok(name.clone());
        }
        let app = self.effective_app_name()?;
        Ok(format!("{app}.ini"))
    }

    fn effective_location(&self) -> SearchPath {
        self.location.clone().unwrap_or_default()
    }

    /// Full path of the settings file.
    pub fn path(&self) -> Result<PathBuf, IniError> {
        let app_name = self.effective_app_name()?;
        let file_name = self.effective_file_name()?;
        file::settings_path(&self.effective_location(), &file_name, app_name)
    }

    /// Load the settings file. A missing file gives an empty store.
    pub fn open(&self) -> Result<IniSettingsStore, IniError> {
        IniSettingsStore::load_file(&self.path()?)
    }

    /// Handle an `IniAction` and print the result to stdout.
    pub fn handle_and_print(self, action: &IniAction) -> Result<(), IniError> {
        let result = self.handle(action)?;
        println!("{result}");
        Ok(())
    }

    /// Handle an `IniAction` (list / sections / get / set / unset / remove-section).
    ///
    /// The file is written back only if the action changed it.
    pub fn handle(self, action: &IniAction) -> Result<IniResult, IniError> {
        let path = self.path()?;
        let mut store = IniSettingsStore::load_file(&path)?;
        let result = ops::execute(&mut store, action)?;
        if store.has_changed_since_load() {
            store.save_file(&path)?;
        } else if action.is_mutation() {
            tracing::debug!(path = %path.display(), "nothing changed, file left untouched");
        }
        Ok(result)
    }
}
