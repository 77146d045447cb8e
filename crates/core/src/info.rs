//! File metadata snapshots

use serde::{Deserialize, Serialize};
use std::fs::Metadata;
use std::time::{SystemTime, UNIX_EPOCH};

/// Kind of filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Directory
    Dir,
    /// Regular file
    File,
    /// Anything else (symlink, socket, device, or unknown)
    Other,
}

/// Point-in-time snapshot of a directory entry
///
/// Modification times are Unix nanoseconds; `0` means "unknown".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Base name of the entry
    pub name: String,
    /// Entry kind
    pub kind: FileKind,
    /// Size in bytes
    pub len: u64,
    /// Last modification time (Unix nanoseconds)
    pub mod_time: i64,
}

impl FileInfo {
    /// Build a snapshot from std metadata
    pub fn from_metadata(name: impl Into<String>, meta: &Metadata) -> Self {
        let file_type = meta.file_type();
        let kind = if file_type.is_dir() {
            FileKind::Dir
        } else if file_type.is_file() {
            FileKind::File
        } else {
            FileKind::Other
        };

        Self {
            name: name.into(),
            kind,
            len: meta.len(),
            mod_time: meta.modified().map(unix_nanos).unwrap_or(0),
        }
    }

    /// Snapshot for an entry whose metadata could not be read
    pub fn unknown(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FileKind::Other,
            len: 0,
            mod_time: 0,
        }
    }

    /// Create a directory snapshot
    pub fn dir(name: impl Into<String>, mod_time: i64) -> Self {
        Self {
            name: name.into(),
            kind: FileKind::Dir,
            len: 0,
            mod_time,
        }
    }

    /// Create a regular file snapshot
    pub fn file(name: impl Into<String>, len: u64, mod_time: i64) -> Self {
        Self {
            name: name.into(),
            kind: FileKind::File,
            len,
            mod_time,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }
}

/// Convert a `SystemTime` to Unix nanoseconds
///
/// Times before the epoch come out negative; times past `i64::MAX`
/// nanoseconds saturate.
pub fn unix_nanos(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_nanos()).unwrap_or(i64::MAX),
        Err(e) => i64::try_from(e.duration().as_nanos())
            .map(|n| -n)
            .unwrap_or(i64::MIN),
    }
}

/// Current wall-clock time in Unix nanoseconds
pub fn now_nanos() -> i64 {
    unix_nanos(SystemTime::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_unix_nanos() {
        assert_eq!(unix_nanos(UNIX_EPOCH), 0);
        assert_eq!(unix_nanos(UNIX_EPOCH + Duration::from_secs(2)), 2_000_000_000);
        assert_eq!(unix_nanos(UNIX_EPOCH - Duration::from_nanos(5)), -5);
    }

    #[test]
    fn test_from_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.txt");
        std::fs::write(&file, b"hello").unwrap();

        let info = FileInfo::from_metadata("a.txt", &std::fs::metadata(&file).unwrap());
        assert!(info.is_file());
        assert_eq!(info.len, 5);
        assert!(info.mod_time > 0);

        let dir_info = FileInfo::from_metadata("d", &std::fs::metadata(temp_dir.path()).unwrap());
        assert!(dir_info.is_dir());
    }

    #[test]
    fn test_unknown_has_zero_mod_time() {
        let info = FileInfo::unknown("gone");
        assert_eq!(info.kind, FileKind::Other);
        assert_eq!(info.mod_time, 0);
    }
}
