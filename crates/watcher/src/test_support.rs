//! In-memory `DirLister` for watcher tests

use parking_lot::Mutex;
use pollwatch_core::lister::base_name;
use pollwatch_core::{now_nanos, DirLister, FileInfo};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub(crate) const SEC: i64 = 1_000_000_000;

/// Unix nanoseconds `ago` before now
pub(crate) fn ago(ago: Duration) -> i64 {
    now_nanos() - ago.as_nanos() as i64
}

#[derive(Default)]
struct FakeState {
    entries: BTreeMap<PathBuf, FileInfo>,
    failing: HashSet<PathBuf>,
    list_calls: usize,
}

/// Shared, mutable fake filesystem
///
/// Clones share state, so a test can keep one handle and give another to
/// the watcher.
#[derive(Clone, Default)]
pub(crate) struct FakeFs {
    state: Arc<Mutex<FakeState>>,
}

impl FakeFs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn dir(&self, path: &str, mod_time: i64) -> &Self {
        let path = PathBuf::from(path);
        let info = FileInfo::dir(base_name(&path), mod_time);
        self.state.lock().entries.insert(path, info);
        self
    }

    pub(crate) fn file(&self, path: &str, mod_time: i64) -> &Self {
        let path = PathBuf::from(path);
        let info = FileInfo::file(base_name(&path), 1, mod_time);
        self.state.lock().entries.insert(path, info);
        self
    }

    pub(crate) fn touch(&self, path: &str, mod_time: i64) {
        if let Some(info) = self.state.lock().entries.get_mut(Path::new(path)) {
            info.mod_time = mod_time;
        }
    }

    pub(crate) fn fail_listing(&self, path: &str) {
        self.state.lock().failing.insert(PathBuf::from(path));
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.state.lock().list_calls
    }
}

impl DirLister for FakeFs {
    fn list_dir(&self, path: &Path) -> io::Result<Vec<FileInfo>> {
        let mut state = self.state.lock();
        state.list_calls += 1;

        if state.failing.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        }
        match state.entries.get(path) {
            Some(info) if info.is_dir() => {}
            _ => return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory")),
        }

        Ok(state
            .entries
            .iter()
            .filter(|(p, _)| p.parent() == Some(path))
            .map(|(_, info)| info.clone())
            .collect())
    }

    fn stat(&self, path: &Path) -> io::Result<FileInfo> {
        self.state
            .lock()
            .entries
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such path"))
    }
}
