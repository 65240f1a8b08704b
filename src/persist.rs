//! Settings persistence: read and write whole INI files.
//!
//! Edits happen in memory on an [`IniDocument`](crate::IniDocument), so the
//! file layer only moves bytes. A missing file reads as `None`; writing
//! creates parent directories as needed.

use std::path::Path;

use crate::error::IniError;

/// Read a settings file. Returns `None` if it does not exist.
pub fn read_file(path: &Path) -> Result<Option<Vec<u8>>, IniError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(IniError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Write a settings file, creating parent directories if needed.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), IniError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| IniError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, bytes).map_err(|e| IniError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote settings file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn read_missing_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_file(&dir.path().join("absent.ini")).unwrap().is_none());
    }

    #[test]
    fn read_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.ini");
        fs::write(&path, "a = 1\r\n").unwrap();
        assert_eq!(read_file(&path).unwrap().unwrap(), b"a = 1\r\n");
    }

    #[test]
    fn read_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = read_file(dir.path()).unwrap_err();
        assert!(matches!(err, IniError::Io { .. }));
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("dir").join("app.ini");
        write_file(&path, b"[S]\nk = v\n").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"[S]\nk = v\n");
    }

    #[test]
    fn write_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.ini");
        fs::write(&path, "old = 1\n").unwrap();
        write_file(&path, b"new = 2\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new = 2\n");
    }
}
