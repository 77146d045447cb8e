//! Common utilities for integration tests

pub mod cli;

use std::path::Path;
use std::time::{Duration, SystemTime};

/// Write `contents` to `root/rel`, creating parent directories
pub fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// Set the modification time of `root/rel` to `age` in the past
pub fn backdate(root: &Path, rel: &str, age: Duration) {
    let mtime = filetime::FileTime::from_system_time(SystemTime::now() - age);
    filetime::set_file_mtime(root.join(rel), mtime).unwrap();
}
