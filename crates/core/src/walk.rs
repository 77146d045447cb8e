//! Lazy depth-first directory walk
//!
//! `Walk` is a finite, single-pass iterator over a `DirLister`. Entries
//! come out in pre-order: a directory is yielded before its children.
//! Stopping early is just dropping the iterator.

use crate::error::FsError;
use crate::info::FileInfo;
use crate::lister::DirLister;
use std::path::{Path, PathBuf};
use std::vec;

/// An entry produced by `Walk`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Full path (root joined with the relative path)
    pub path: PathBuf,
    /// Metadata snapshot from the listing
    pub info: FileInfo,
    /// Depth below the root (the root itself is 0)
    pub depth: usize,
}

struct Frame {
    dir: PathBuf,
    depth: usize,
    entries: vec::IntoIter<FileInfo>,
}

enum State {
    Start,
    Running,
    Done,
}

/// Depth-first walk over directories and regular files
///
/// Only directories and regular files are yielded; symlinks and other
/// special entries are skipped. A listing failure is yielded once as an
/// `Err` and ends the walk, unless `ignore_errors` is set, in which case
/// the unreadable directory simply contributes nothing.
pub struct Walk<'a> {
    lister: &'a dyn DirLister,
    root: PathBuf,
    include_root: bool,
    recursive: bool,
    dirs: bool,
    files: bool,
    ignore_errors: bool,
    state: State,
    stack: Vec<Frame>,
    descend: Option<(PathBuf, usize)>,
}

impl<'a> Walk<'a> {
    /// Walk everything below `root` recursively (root itself excluded)
    pub fn new(lister: &'a dyn DirLister, root: impl Into<PathBuf>) -> Self {
        Self {
            lister,
            root: root.into(),
            include_root: false,
            recursive: true,
            dirs: true,
            files: true,
            ignore_errors: false,
            state: State::Start,
            stack: Vec::new(),
            descend: None,
        }
    }

    /// Every regular file below `root`, recursively
    pub fn all_files(lister: &'a dyn DirLister, root: impl Into<PathBuf>) -> Self {
        Self::new(lister, root).dirs(false)
    }

    /// Direct sub-directories of `root`
    pub fn dirs_in(lister: &'a dyn DirLister, root: impl Into<PathBuf>) -> Self {
        Self::new(lister, root).recursive(false).files(false)
    }

    /// Direct regular files of `root`
    pub fn files_in(lister: &'a dyn DirLister, root: impl Into<PathBuf>) -> Self {
        Self::new(lister, root).recursive(false).dirs(false)
    }

    /// Yield the root directory itself first
    pub fn include_root(mut self, yes: bool) -> Self {
        self.include_root = yes;
        self
    }

    /// Descend into sub-directories
    pub fn recursive(mut self, yes: bool) -> Self {
        self.recursive = yes;
        self
    }

    /// Yield directory entries (traversal still happens when off)
    pub fn dirs(mut self, yes: bool) -> Self {
        self.dirs = yes;
        self
    }

    /// Yield regular file entries
    pub fn files(mut self, yes: bool) -> Self {
        self.files = yes;
        self
    }

    /// Swallow listing failures instead of ending the walk
    pub fn ignore_errors(mut self, yes: bool) -> Self {
        self.ignore_errors = yes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List `dir` and push it as a new frame.
    /// Returns the error to yield, if any.
    fn push_listing(&mut self, dir: PathBuf, depth: usize) -> Option<FsError> {
        match self.lister.list_dir(&dir) {
            Ok(entries) => {
                self.stack.push(Frame {
                    dir,
                    depth,
                    entries: entries.into_iter(),
                });
                None
            }
            Err(e) if self.ignore_errors => {
                tracing::debug!("Skipping unreadable directory {}: {}", dir.display(), e);
                None
            }
            Err(e) => Some(FsError::io(dir, e)),
        }
    }

    fn start(&mut self) -> Option<crate::Result<WalkEntry>> {
        self.state = State::Running;

        let info = match self.lister.stat(&self.root) {
            Ok(info) if info.is_dir() => info,
            // Nothing to walk unless the root is a directory
            _ => {
                self.state = State::Done;
                return None;
            }
        };

        if self.include_root && self.dirs {
            self.descend = Some((self.root.clone(), 1));
            return Some(Ok(WalkEntry {
                path: self.root.clone(),
                info,
                depth: 0,
            }));
        }

        let root = self.root.clone();
        self.push_listing(root, 1).map(|e| {
            self.state = State::Done;
            Err(e)
        })
    }
}

impl Iterator for Walk<'_> {
    type Item = crate::Result<WalkEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            State::Done => return None,
            State::Start => {
                if let Some(item) = self.start() {
                    return Some(item);
                }
                if matches!(self.state, State::Done) {
                    return None;
                }
            }
            State::Running => {}
        }

        loop {
            if let Some((dir, depth)) = self.descend.take() {
                if let Some(err) = self.push_listing(dir, depth) {
                    self.state = State::Done;
                    self.stack.clear();
                    return Some(Err(err));
                }
            }

            let frame = match self.stack.last_mut() {
                Some(frame) => frame,
                None => {
                    self.state = State::Done;
                    return None;
                }
            };

            let info = match frame.entries.next() {
                Some(info) => info,
                None => {
                    self.stack.pop();
                    continue;
                }
            };

            let path = frame.dir.join(&info.name);
            let depth = frame.depth;

            if info.is_dir() {
                if self.recursive {
                    self.descend = Some((path.clone(), depth + 1));
                }
                if self.dirs {
                    return Some(Ok(WalkEntry { path, info, depth }));
                }
            } else if info.is_file() && self.files {
                return Some(Ok(WalkEntry { path, info, depth }));
            }
        }
    }
}
