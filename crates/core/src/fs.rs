//! Stateless filesystem helpers
//!
//! Thin wrappers over std::fs for the operations pollwatch users keep
//! rewriting: existence checks, recursive copy/clear, nearest-ancestor
//! lookup, freshness comparisons, and text/binary read-write.

use crate::error::{FsError, IoResultExt};
use crate::info::{unix_nanos, FileInfo};
use crate::lister::{DirLister, OsLister};
use crate::pattern::NamePattern;
use crate::Result;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Whether a directory (not a file) exists at `path`
pub fn is_dir(path: &Path) -> bool {
    !path.as_os_str().is_empty() && fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Whether a regular file (not a directory) exists at `path`
pub fn is_file(path: &Path) -> bool {
    !path.as_os_str().is_empty() && fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Create `dir` and any missing parents
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).at(dir)
}

/// Remove `path` and everything below it; missing paths are not an error
pub fn remove_all(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).at(path),
        Ok(_) => fs::remove_file(path).at(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FsError::io(path, e)),
    }
}

/// Unsorted listing of `dir`
pub fn dir(dir: &Path) -> Result<Vec<FileInfo>> {
    OsLister.list_dir(dir).at(dir)
}

/// Copy everything from `src` into a newly created (or truncated) `dst`
pub fn save_to(src: &mut impl Read, dst: &Path) -> Result<u64> {
    let mut file = File::create(dst).at(dst)?;
    io::copy(src, &mut file).at(dst)
}

/// Copy the file at `src` to `dst`
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64> {
    let mut file = File::open(src).at(src)?;
    save_to(&mut file, dst)
}

/// Recursively copy the contents of `src_dir` into `dst_dir`
///
/// Sub-directories named in `skip_dir_names` are skipped, and so are files
/// whose path ends in `skip_file_suffix` (when non-empty). The first
/// failure aborts the copy.
pub fn copy_all_files_and_sub_dirs(
    src_dir: &Path,
    dst_dir: &Path,
    skip_file_suffix: &str,
    skip_dir_names: &[&str],
) -> Result<()> {
    let entries = dir(src_dir)?;
    ensure_dir(dst_dir)?;

    for entry in entries {
        let src_path = src_dir.join(&entry.name);
        let dst_path = dst_dir.join(&entry.name);

        if entry.is_dir() {
            if !skip_dir_names.contains(&entry.name.as_str()) {
                copy_all_files_and_sub_dirs(&src_path, &dst_path, skip_file_suffix, skip_dir_names)?;
            }
        } else if skip_file_suffix.is_empty()
            || !src_path.to_string_lossy().ends_with(skip_file_suffix)
        {
            copy_file(&src_path, &dst_path)?;
        }
    }

    Ok(())
}

/// Remove everything inside `dir_path` except direct children named in
/// `keep_names`. Does nothing if `dir_path` is not a directory.
pub fn clear_dir(dir_path: &Path, keep_names: &[&str]) -> Result<()> {
    if !is_dir(dir_path) {
        return Ok(());
    }

    for entry in dir(dir_path)? {
        if !keep_names.contains(&entry.name.as_str()) {
            remove_all(&dir_path.join(&entry.name))?;
        }
    }
    Ok(())
}

/// Find the file named `file_name` nearest to `cur_path`
///
/// Checks `cur_path` itself, then each ancestor in turn.
pub fn locate(cur_path: &Path, file_name: &str) -> Option<PathBuf> {
    cur_path
        .ancestors()
        .map(|dir| dir.join(file_name))
        .find(|candidate| is_file(candidate))
}

/// Full paths of all files directly or indirectly under `dir_path`
///
/// Files under `ignore_sub_path` are left out; a relative `ignore_sub_path`
/// is taken relative to `dir_path`. When `name_pattern` is given, only
/// files whose base name matches it are returned.
pub fn all_file_paths_in(
    dir_path: &Path,
    ignore_sub_path: Option<&Path>,
    name_pattern: Option<&NamePattern>,
) -> Vec<PathBuf> {
    let ignore = ignore_sub_path.map(|sub| {
        if sub.starts_with(dir_path) {
            sub.to_path_buf()
        } else {
            dir_path.join(sub)
        }
    });

    WalkDir::new(dir_path)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| ignore.as_ref().map_or(true, |ig| !e.path().starts_with(ig)))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            name_pattern.map_or(true, |pat| pat.matches(&entry.file_name().to_string_lossy()))
        })
        .map(|entry| entry.into_path())
        .collect()
}

/// Whether any file under `dir_path` is newer than the oldest of `file_paths`
///
/// A missing or non-directory `dir_path` has nothing newer. Otherwise errs
/// on the side of "newer": returns `true` when `file_paths` is empty,
/// when any of them cannot be stat'ed, or when the walk itself fails.
/// Files in `file_paths` are not compared against themselves.
pub fn is_any_file_in_dir_newer_than_oldest_of(dir_path: &Path, file_paths: &[PathBuf]) -> bool {
    if file_paths.is_empty() {
        return true;
    }
    if !is_dir(dir_path) {
        return false;
    }

    let mut oldest = 0i64;
    for path in file_paths {
        match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(modified) => {
                let mod_time = unix_nanos(modified);
                if mod_time > 0 && (oldest == 0 || mod_time < oldest) {
                    oldest = mod_time;
                }
            }
            Err(_) => return true,
        }
    }

    for entry in WalkDir::new(dir_path).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => return true,
        };
        if !entry.file_type().is_file() || file_paths.iter().any(|p| p == entry.path()) {
            continue;
        }
        match entry.metadata().ok().and_then(|m| m.modified().ok()) {
            Some(modified) if unix_nanos(modified) <= oldest => {}
            _ => return true,
        }
    }

    false
}

/// Whether `path` was last modified after `unix_nanos_time`
///
/// Always `true` for non-positive times.
pub fn is_newer_than_time(path: &Path, unix_nanos_time: i64) -> Result<bool> {
    if unix_nanos_time <= 0 {
        return Ok(true);
    }
    let modified = fs::metadata(path).and_then(|m| m.modified()).at(path)?;
    Ok(unix_nanos(modified) > unix_nanos_time)
}

/// Read a UTF-8 text file
pub fn read_text_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).at(path)
}

/// Read a UTF-8 text file, returning `fallback` on any failure
pub fn read_text_file_or(path: &Path, fallback: &str) -> String {
    read_text_file(path).unwrap_or_else(|e| {
        tracing::debug!("Falling back for {}: {}", path.display(), e);
        fallback.to_string()
    })
}

/// Write `contents` to `path`, creating parent directories first
pub fn write_binary_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).at(path)
}

/// Write `contents` to `path` as text, creating parent directories first
pub fn write_text_file(path: &Path, contents: &str) -> Result<()> {
    write_binary_file(path, contents.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{set_file_mtime, FileTime};
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn backdate(path: &Path, secs: u64) {
        let t = SystemTime::now() - Duration::from_secs(secs);
        set_file_mtime(path, FileTime::from_system_time(t)).unwrap();
    }

    #[test]
    fn test_is_dir_and_is_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("f.txt");
        fs::write(&file, b"x").unwrap();

        assert!(is_dir(temp_dir.path()));
        assert!(!is_dir(&file));
        assert!(is_file(&file));
        assert!(!is_file(temp_dir.path()));
        assert!(!is_dir(Path::new("")));
        assert!(!is_file(&temp_dir.path().join("missing")));
    }

    #[test]
    fn test_write_creates_parents_and_reads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a/b/c.txt");

        write_text_file(&path, "hello").unwrap();
        assert_eq!(read_text_file(&path).unwrap(), "hello");
        assert_eq!(read_text_file_or(&temp_dir.path().join("nope"), "dflt"), "dflt");
    }

    #[test]
    fn test_copy_all_skips_suffix_and_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        write_text_file(&src.join("keep.rs"), "k").unwrap();
        write_text_file(&src.join("skip.tmp"), "s").unwrap();
        write_text_file(&src.join("nested/inner.rs"), "i").unwrap();
        write_text_file(&src.join("target/out.rs"), "o").unwrap();

        copy_all_files_and_sub_dirs(&src, &dst, ".tmp", &["target"]).unwrap();

        assert!(is_file(&dst.join("keep.rs")));
        assert!(is_file(&dst.join("nested/inner.rs")));
        assert!(!dst.join("skip.tmp").exists());
        assert!(!dst.join("target").exists());
        assert_eq!(read_text_file(&dst.join("nested/inner.rs")).unwrap(), "i");
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = copy_all_files_and_sub_dirs(
            &temp_dir.path().join("missing"),
            &temp_dir.path().join("dst"),
            "",
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, FsError::Io { .. }));
    }

    #[test]
    fn test_clear_dir_keeps_names() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_text_file(&root.join("keep.txt"), "k").unwrap();
        write_text_file(&root.join("drop.txt"), "d").unwrap();
        write_text_file(&root.join("sub/keep.txt"), "nested").unwrap();

        clear_dir(root, &["keep.txt"]).unwrap();

        assert!(is_file(&root.join("keep.txt")));
        assert!(!root.join("drop.txt").exists());
        // keep_names only applies to direct children
        assert!(!root.join("sub").exists());

        // Not a directory: no-op
        clear_dir(&root.join("keep.txt"), &[]).unwrap();
        assert!(is_file(&root.join("keep.txt")));
    }

    #[test]
    fn test_locate_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_text_file(&root.join("Marker.toml"), "").unwrap();
        ensure_dir(&root.join("a/b/c")).unwrap();

        assert_eq!(locate(&root.join("a/b/c"), "Marker.toml"), Some(root.join("Marker.toml")));
        assert_eq!(locate(&root.join("a/b/c"), "NoSuchFile.toml"), None);
    }

    #[test]
    fn test_all_file_paths_in() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_text_file(&root.join("a.rs"), "").unwrap();
        write_text_file(&root.join("b.txt"), "").unwrap();
        write_text_file(&root.join("src/c.rs"), "").unwrap();
        write_text_file(&root.join("vendor/d.rs"), "").unwrap();

        let mut all = all_file_paths_in(root, None, None);
        all.sort();
        assert_eq!(all.len(), 4);

        let pattern = NamePattern::new("*.rs").unwrap();
        let mut rs = all_file_paths_in(root, Some(Path::new("vendor")), Some(&pattern));
        rs.sort();
        assert_eq!(rs, vec![root.join("a.rs"), root.join("src/c.rs")]);
    }

    #[test]
    fn test_is_any_file_newer() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let src = root.join("src");
        let out = root.join("out.bin");
        write_text_file(&src.join("a.rs"), "a").unwrap();
        write_text_file(&out, "o").unwrap();

        backdate(&src.join("a.rs"), 600);
        backdate(&out, 60);
        assert!(!is_any_file_in_dir_newer_than_oldest_of(&src, &[out.clone()]));

        // Source touched after the output
        backdate(&src.join("a.rs"), 10);
        assert!(is_any_file_in_dir_newer_than_oldest_of(&src, &[out.clone()]));

        assert!(is_any_file_in_dir_newer_than_oldest_of(&src, &[]));
        assert!(is_any_file_in_dir_newer_than_oldest_of(&src, &[root.join("missing")]));
    }

    #[test]
    fn test_missing_dir_has_nothing_newer() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let out = root.join("out.bin");
        write_text_file(&out, "o").unwrap();

        assert!(!is_any_file_in_dir_newer_than_oldest_of(&root.join("missing"), &[out.clone()]));
        // A file where the directory should be
        assert!(!is_any_file_in_dir_newer_than_oldest_of(&out, &[out.clone()]));
    }

    #[test]
    fn test_is_newer_than_time() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("f");
        write_text_file(&file, "x").unwrap();
        backdate(&file, 100);

        let fifty_ago = unix_nanos(SystemTime::now() - Duration::from_secs(50));
        let hour_ago = unix_nanos(SystemTime::now() - Duration::from_secs(3600));
        assert!(!is_newer_than_time(&file, fifty_ago).unwrap());
        assert!(is_newer_than_time(&file, hour_ago).unwrap());
        assert!(is_newer_than_time(&file, 0).unwrap());
        assert!(is_newer_than_time(&temp_dir.path().join("missing"), 1).is_err());
    }

    #[test]
    fn test_remove_all_and_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_text_file(&root.join("x/y.txt"), "y").unwrap();

        let listing = dir(root).unwrap();
        assert_eq!(listing.len(), 1);
        assert!(listing[0].is_dir());

        remove_all(&root.join("x")).unwrap();
        remove_all(&root.join("x")).unwrap();
        assert!(dir(root).unwrap().is_empty());
    }

    #[test]
    fn test_copy_file() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("s.bin");
        write_binary_file(&src, &[1, 2, 3]).unwrap();
        let n = copy_file(&src, &temp_dir.path().join("d.bin")).unwrap();
        assert_eq!(n, 3);
        assert_eq!(fs::read(temp_dir.path().join("d.bin")).unwrap(), vec![1, 2, 3]);
    }
}
