//! Per-cycle scan context
//!
//! Gathers `path -> FileInfo` for one cycle. Recursive roots are walked
//! through direct listings so directory admission can prune whole
//! subtrees; other paths go through the shared non-recursive `Walk`.

use pollwatch_core::lister::base_name;
use pollwatch_core::{DirLister, FileInfo, Walk};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory admission predicate: `(full_path, name) -> admit?`
pub type AdmitFn = dyn Fn(&Path, &str) -> bool + Send + Sync;

pub(crate) struct ScanContext<'a> {
    lister: &'a dyn DirLister,
    suffix: Option<&'a str>,
    admit: Option<&'a AdmitFn>,
    gathered: HashMap<PathBuf, FileInfo>,
    newest: i64,
}

impl<'a> ScanContext<'a> {
    pub(crate) fn new(
        lister: &'a dyn DirLister,
        suffix: Option<&'a str>,
        admit: Option<&'a AdmitFn>,
        capacity: usize,
    ) -> Self {
        Self {
            lister,
            suffix: suffix.filter(|s| !s.is_empty()),
            admit,
            gathered: HashMap::with_capacity(capacity),
            newest: 0,
        }
    }

    fn admits_dir(&self, path: &Path, name: &str) -> bool {
        self.admit.map_or(true, |admit| admit(path, name))
    }

    fn accepts_file(&self, path: &Path) -> bool {
        self.suffix
            .map_or(true, |suffix| path.to_string_lossy().ends_with(suffix))
    }

    fn record(&mut self, path: PathBuf, info: FileInfo) {
        self.newest = self.newest.max(info.mod_time);
        self.gathered.insert(path, info);
    }

    /// Walk `root` and its whole admitted subtree
    ///
    /// Does nothing unless `root` is a directory. A directory that cannot
    /// be listed is still recorded but contributes no children.
    pub(crate) fn scan_recursive_root(&mut self, root: &Path) {
        let info = match self.lister.stat(root) {
            Ok(info) if info.is_dir() => info,
            Ok(_) => {
                debug!("Recursive root is not a directory: {}", root.display());
                return;
            }
            Err(e) => {
                debug!("Cannot stat recursive root {}: {}", root.display(), e);
                return;
            }
        };

        let mut pending = vec![(root.to_path_buf(), info)];
        while let Some((dir, info)) = pending.pop() {
            if !self.admits_dir(&dir, &info.name) {
                continue;
            }

            let children = self.lister.list_dir(&dir);
            self.record(dir.clone(), info);

            let children = match children {
                Ok(children) => children,
                Err(e) => {
                    debug!("Skipping unreadable directory {}: {}", dir.display(), e);
                    continue;
                }
            };

            for child in children {
                let path = dir.join(&child.name);
                if child.is_dir() {
                    pending.push((path, child));
                } else if child.is_file() && self.accepts_file(&path) {
                    self.record(path, child);
                }
            }
        }
    }

    /// Scan one non-recursive path: the entry itself plus, for directories,
    /// its direct children
    ///
    /// The entry itself is always recorded. If it cannot be stat'ed it is
    /// recorded with an unknown (zero) modification time.
    pub(crate) fn scan_other_path(&mut self, path: &Path) {
        let walk = Walk::new(self.lister, path)
            .include_root(true)
            .recursive(false)
            .ignore_errors(true);

        for entry in walk {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Walk of {} stopped: {}", path.display(), e);
                    break;
                }
            };

            if entry.info.is_dir() {
                if self.admits_dir(&entry.path, &entry.info.name) {
                    self.record(entry.path, entry.info);
                } else if entry.depth == 0 {
                    // Rejected root: stop pulling, its children are out too
                    break;
                }
            } else if self.accepts_file(&entry.path) {
                self.record(entry.path, entry.info);
            }
        }

        if !self.gathered.contains_key(path) {
            let info = self.lister.stat(path).unwrap_or_else(|e| {
                debug!("Cannot stat {}: {}", path.display(), e);
                FileInfo::unknown(base_name(path))
            });
            self.record(path.to_path_buf(), info);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.gathered.len()
    }

    /// Consume the context, returning the gathered paths and the newest
    /// modification time among them
    pub(crate) fn finish(self) -> (HashMap<PathBuf, FileInfo>, i64) {
        (self.gathered, self.newest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeFs, SEC};
    use std::collections::BTreeSet;

    fn paths(gathered: &HashMap<PathBuf, FileInfo>) -> BTreeSet<String> {
        gathered
            .keys()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }

    fn tree() -> FakeFs {
        let fs = FakeFs::new();
        fs.dir("/r", SEC)
            .file("/r/a.txt", 2 * SEC)
            .file("/r/a.log", 3 * SEC)
            .dir("/r/sub", 4 * SEC)
            .file("/r/sub/b.txt", 9 * SEC)
            .dir("/r/skip", SEC)
            .file("/r/skip/c.txt", SEC);
        fs
    }

    #[test]
    fn test_recursive_root_with_suffix() {
        let fs = tree();
        let mut ctx = ScanContext::new(&fs, Some(".txt"), None, 0);
        ctx.scan_recursive_root(Path::new("/r"));
        let (gathered, newest) = ctx.finish();

        assert_eq!(
            paths(&gathered),
            BTreeSet::from([
                "/r".to_string(),
                "/r/a.txt".to_string(),
                "/r/skip".to_string(),
                "/r/skip/c.txt".to_string(),
                "/r/sub".to_string(),
                "/r/sub/b.txt".to_string(),
            ])
        );
        assert_eq!(newest, 9 * SEC);
    }

    #[test]
    fn test_admission_prunes_subtree() {
        let fs = tree();
        let admit = |_: &Path, name: &str| name != "skip";
        let mut ctx = ScanContext::new(&fs, None, Some(&admit), 0);
        ctx.scan_recursive_root(Path::new("/r"));
        let (gathered, _) = ctx.finish();

        assert!(!gathered.contains_key(Path::new("/r/skip")));
        assert!(!gathered.contains_key(Path::new("/r/skip/c.txt")));
        assert!(gathered.contains_key(Path::new("/r/a.log")));
    }

    #[test]
    fn test_admission_sees_full_path() {
        let fs = tree();
        let admit = |path: &Path, _: &str| path != Path::new("/r/sub");
        let mut ctx = ScanContext::new(&fs, None, Some(&admit), 0);
        ctx.scan_recursive_root(Path::new("/r"));
        let (gathered, _) = ctx.finish();
        assert!(!gathered.contains_key(Path::new("/r/sub/b.txt")));
    }

    #[test]
    fn test_unreadable_directory_is_isolated() {
        let fs = tree();
        fs.fail_listing("/r/sub");
        let mut ctx = ScanContext::new(&fs, None, None, 0);
        ctx.scan_recursive_root(Path::new("/r"));
        let (gathered, _) = ctx.finish();

        assert!(gathered.contains_key(Path::new("/r/sub")));
        assert!(!gathered.contains_key(Path::new("/r/sub/b.txt")));
        assert!(gathered.contains_key(Path::new("/r/skip/c.txt")));
    }

    #[test]
    fn test_missing_or_file_root_contributes_nothing() {
        let fs = tree();
        let mut ctx = ScanContext::new(&fs, None, None, 0);
        ctx.scan_recursive_root(Path::new("/missing"));
        ctx.scan_recursive_root(Path::new("/r/a.txt"));
        assert_eq!(ctx.len(), 0);
    }

    #[test]
    fn test_other_path_is_not_recursive() {
        let fs = tree();
        let mut ctx = ScanContext::new(&fs, None, None, 0);
        ctx.scan_other_path(Path::new("/r"));
        let (gathered, _) = ctx.finish();

        assert!(gathered.contains_key(Path::new("/r")));
        assert!(gathered.contains_key(Path::new("/r/sub")));
        assert!(gathered.contains_key(Path::new("/r/a.log")));
        assert!(!gathered.contains_key(Path::new("/r/sub/b.txt")));
    }

    #[test]
    fn test_other_path_itself_recorded_unconditionally() {
        let fs = tree();
        let mut ctx = ScanContext::new(&fs, Some(".txt"), None, 0);
        // A file not matching the suffix
        ctx.scan_other_path(Path::new("/r/a.log"));
        // A path that does not exist
        ctx.scan_other_path(Path::new("/gone"));
        let (gathered, _) = ctx.finish();

        assert_eq!(gathered[Path::new("/r/a.log")].mod_time, 3 * SEC);
        assert_eq!(gathered[Path::new("/gone")].mod_time, 0);
    }

    #[test]
    fn test_rejected_other_path_keeps_only_itself() {
        let fs = tree();
        let admit = |_: &Path, name: &str| name != "sub";
        let mut ctx = ScanContext::new(&fs, None, Some(&admit), 0);
        ctx.scan_other_path(Path::new("/r/sub"));
        let (gathered, _) = ctx.finish();

        assert_eq!(paths(&gathered), BTreeSet::from(["/r/sub".to_string()]));
    }

    #[test]
    fn test_rejected_child_of_other_path_is_skipped() {
        let fs = tree();
        let admit = |_: &Path, name: &str| name != "sub";
        let mut ctx = ScanContext::new(&fs, None, Some(&admit), 0);
        ctx.scan_other_path(Path::new("/r"));
        let (gathered, _) = ctx.finish();

        assert!(gathered.contains_key(Path::new("/r")));
        assert!(!gathered.contains_key(Path::new("/r/sub")));
        assert!(gathered.contains_key(Path::new("/r/a.log")));
        assert!(gathered.contains_key(Path::new("/r/skip")));
    }
}
