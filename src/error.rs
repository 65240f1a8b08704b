use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IniError {
    #[error("Out of memory while editing the INI document")]
    OutOfMemory,

    #[error("Invalid name '{name}': {reason}")]
    BadName { name: String, reason: &'static str },

    #[error("Invalid value '{value}': expected {expected}")]
    BadValue {
        value: String,
        expected: &'static str,
    },

    #[error("Failed to read or write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No settings file location could be resolved; call .location() on the builder")]
    NoLocation,

    #[error("App name is required; call .app_name() on the builder")]
    AppNameRequired,

    #[error("Failed to render result as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<std::collections::TryReserveError> for IniError {
    fn from(_: std::collections::TryReserveError) -> Self {
        IniError::OutOfMemory
    }
}
