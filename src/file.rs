// src/file.rs

use std::{
    fs,
    path::Path,
};

use crate::error::{Error, Result};

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::Io(std::io::Error::other(format!(
            "Path exists but is not a directory: {}",
            dir.display()
        ))));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

/// Whole-file write: parent dirs first, then truncate + write.
pub fn write_whole(path: &Path, contents: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Missing file reads as `None`; any other I/O failure is an error.
pub fn read_if_exists(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
