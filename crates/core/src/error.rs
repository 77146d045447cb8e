//! Error types for filesystem operations

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from filesystem helpers and directory walks.
#[derive(Error, Debug)]
pub enum FsError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Invalid name pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl FsError {
    /// Wrap an `io::Error` with the path it occurred at
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        FsError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// The path this error refers to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            FsError::Io { path, .. } | FsError::NotADirectory(path) => Some(path),
            FsError::InvalidPattern { .. } => None,
        }
    }
}

/// Extension for attaching a path to `io::Result`s
pub(crate) trait IoResultExt<T> {
    fn at(self, path: &Path) -> Result<T, FsError>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T, FsError> {
        self.map_err(|e| FsError::io(path, e))
    }
}
