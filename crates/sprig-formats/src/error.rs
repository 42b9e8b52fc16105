use std::fmt;
use std::path::{Path, PathBuf};

/// Failure to read a source file from disk.
///
/// Parsing itself never fails; only getting the text in can.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The path does not exist or is not a regular file.
    NotFound { path: PathBuf },
    /// The file exists but could not be read as UTF-8 text.
    Io { path: PathBuf, message: String },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotFound { path } | LoadError::Io { path, .. } => path,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound { path } => write!(f, "file not found: {}", path.display()),
            LoadError::Io { path, message } => {
                write!(f, "failed to read {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for LoadError {}

pub(crate) fn read_source(path: &Path) -> Result<String, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound { path: path.to_path_buf() });
    }
    std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
