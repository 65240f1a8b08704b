use std::path::PathBuf;

/// Where the settings file lives.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchPath {
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    #[default]
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".myapp")`.
    Home(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit directory.
    Path(PathBuf),
}

/// An operation on a settings file, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
///
/// `section` is `""` for properties above the first header.
#[derive(Debug, Clone, PartialEq)]
pub enum IniAction {
    /// Properties of one section, or of every section when `None`.
    List { section: Option<String> },
    Sections,
    Get { section: String, key: String },
    Set {
        section: String,
        key: String,
        value: String,
    },
    Unset { section: String, key: String },
    RemoveSection { section: String },
}

impl IniAction {
    /// Whether running the action can change the file.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            IniAction::Set { .. } | IniAction::Unset { .. } | IniAction::RemoveSection { .. }
        )
    }
}
