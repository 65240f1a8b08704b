//! Settings file location.
//!
//! A [`SearchPath`] names a directory; the settings file is
//! `{dir}/{file_name}` inside it. Only single directories are supported,
//! since the same path is both read and written.

use std::path::PathBuf;

use crate::error::IniError;
use crate::types::SearchPath;

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// `app_name` is used by `SearchPath::Platform` to construct the platform-specific
/// config directory (e.g. `~/.config/{app_name}/` on Linux).
///
/// Returns `None` if the path cannot be resolved (e.g. no home directory found).
pub fn resolve_location(sp: &SearchPath, app_name: &str) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Full path of the settings file for `location`.
pub fn settings_path(
    location: &SearchPath,
    file_name: &str,
    app_name: &str,
) -> Result<PathBuf, IniError> {
    let path = resolve_location(location, app_name)
        .map(|dir| dir.join(file_name))
        .ok_or(IniError::NoLocation)?;
    tracing::trace!(path = %path.display(), ?location, "resolved settings path");
    Ok(path)
}
