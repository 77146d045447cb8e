//! Directory listing capability
//!
//! Anything that scans the filesystem takes a `DirLister` instead of
//! calling std::fs directly, so tests can swap in an in-memory fake.

use crate::info::FileInfo;
use std::fs;
use std::io;
use std::path::Path;

/// Lists directories and stats single paths
pub trait DirLister {
    /// List the direct children of `path`, in no particular order
    fn list_dir(&self, path: &Path) -> io::Result<Vec<FileInfo>>;

    /// Stat a single path (following symlinks)
    fn stat(&self, path: &Path) -> io::Result<FileInfo>;
}

/// `DirLister` backed by std::fs
///
/// Child entries are not followed through symlinks, so a link to a
/// directory lists as `FileKind::Other`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsLister;

impl DirLister for OsLister {
    fn list_dir(&self, path: &Path) -> io::Result<Vec<FileInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let info = match entry.metadata() {
                Ok(meta) => FileInfo::from_metadata(name, &meta),
                // Entry vanished between readdir and stat
                Err(_) => FileInfo::unknown(name),
            };
            entries.push(info);
        }
        Ok(entries)
    }

    fn stat(&self, path: &Path) -> io::Result<FileInfo> {
        let meta = fs::metadata(path)?;
        Ok(FileInfo::from_metadata(base_name(path), &meta))
    }
}

/// Base name of a path, falling back to the whole path for roots like `/`
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
