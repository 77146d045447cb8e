//! Freshness check: is anything in a directory newer than a set of outputs?

use pollwatch_core::fs::is_any_file_in_dir_newer_than_oldest_of;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `true` when some file under `dir` is newer than the oldest of `files`
pub fn run(dir: &Path, files: &[PathBuf]) -> bool {
    let newer = is_any_file_in_dir_newer_than_oldest_of(dir, files);
    debug!("{} newer than {} file(s): {}", dir.display(), files.len(), newer);
    println!("{}", if newer { "newer" } else { "up to date" });
    newer
}
