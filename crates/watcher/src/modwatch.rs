//! Polling modification watcher
//!
//! A `ModWatcher` re-scans its roots each time `run_cycle` is called,
//! compares modification times against when each path was last raised,
//! and hands the changed set to a callback. Scheduling belongs to the
//! caller (or to `Poller`).

use crate::debounce::{HoldOff, RaiseHistory};
use crate::scan::{AdmitFn, ScanContext};
use parking_lot::{Mutex, MutexGuard};
use pollwatch_core::{now_nanos, DirLister, FileInfo, OsLister};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Produces the non-recursive paths to scan, called once per cycle
pub type OtherPathsFn = dyn FnMut() -> Vec<PathBuf> + Send;

/// Receives each cycle's raise
pub type OnRaiseFn = dyn FnMut(Raise) + Send;

/// When the raise callback fires
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotifyPolicy {
    /// After every cycle, even when nothing changed or the cycle was held off
    #[default]
    EveryCycle,
    /// Only when at least one path was raised
    OnChange,
}

/// The outcome of one cycle, as delivered to the callback
#[derive(Debug, Clone, Serialize)]
pub struct Raise {
    /// Paths raised this cycle, with their snapshot from the scan
    pub changed: HashMap<PathBuf, FileInfo>,
    /// When the cycle started (Unix nanoseconds)
    pub cycle_start: i64,
    /// Whether this was the watcher's first cycle
    pub first_run: bool,
    /// Whether raising was suppressed because something changed too recently
    pub held_off: bool,
}

impl Raise {
    pub fn len(&self) -> usize {
        self.changed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    /// Raised paths in sorted order
    pub fn sorted_paths(&self) -> Vec<&Path> {
        let mut paths: Vec<&Path> = self.changed.keys().map(PathBuf::as_path).collect();
        paths.sort();
        paths
    }
}

/// Configures a `ModWatcher`
///
/// Nothing touches the filesystem until the first `run_cycle`.
pub struct ModWatcherBuilder {
    recursive_roots: Vec<PathBuf>,
    other_paths: Option<Box<OtherPathsFn>>,
    suffix: Option<String>,
    admit: Option<Box<AdmitFn>>,
    hold_off: HoldOff,
    notify: NotifyPolicy,
    lister: Arc<dyn DirLister + Send + Sync>,
}

impl Default for ModWatcherBuilder {
    fn default() -> Self {
        Self {
            recursive_roots: Vec::new(),
            other_paths: None,
            suffix: None,
            admit: None,
            hold_off: HoldOff::disabled(),
            notify: NotifyPolicy::default(),
            lister: Arc::new(OsLister),
        }
    }
}

impl ModWatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory to walk fully recursively
    pub fn recursive_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.recursive_roots.push(root.into());
        self
    }

    pub fn recursive_roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.recursive_roots.extend(roots.into_iter().map(Into::into));
        self
    }

    /// Paths (files or directories) scanned non-recursively
    ///
    /// `provider` runs at the start of every cycle, so the set may change
    /// between cycles.
    pub fn other_paths(mut self, provider: impl FnMut() -> Vec<PathBuf> + Send + 'static) -> Self {
        self.other_paths = Some(Box::new(provider));
        self
    }

    /// Only track files whose path ends with `suffix` (directories are
    /// always tracked). An empty suffix tracks everything.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        self.suffix = (!suffix.is_empty()).then_some(suffix);
        self
    }

    /// Directory admission predicate, called with `(full_path, name)`
    ///
    /// A rejected directory is excluded along with its whole subtree.
    pub fn admit_dirs(
        mut self,
        admit: impl Fn(&Path, &str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.admit = Some(Box::new(admit));
        self
    }

    /// Hold off raising while the newest change is younger than `window`
    ///
    /// `Duration::ZERO` disables the hold-off.
    pub fn hold_off(mut self, window: Duration) -> Self {
        self.hold_off = HoldOff::new(window);
        self
    }

    pub fn notify(mut self, policy: NotifyPolicy) -> Self {
        self.notify = policy;
        self
    }

    /// Replace the filesystem access used for scanning
    pub fn lister(mut self, lister: Arc<dyn DirLister + Send + Sync>) -> Self {
        self.lister = lister;
        self
    }

    /// Finish configuration; `on_raise` receives each cycle's result
    pub fn build(self, on_raise: impl FnMut(Raise) + Send + 'static) -> ModWatcher {
        ModWatcher {
            recursive_roots: self.recursive_roots,
            other_paths: self.other_paths,
            suffix: self.suffix,
            admit: self.admit,
            hold_off: self.hold_off,
            notify: self.notify,
            lister: self.lister,
            on_raise: Box::new(on_raise),
            history: RaiseHistory::new(),
            scan_capacity: 64,
            cycles: 0,
        }
    }
}

/// Stateful polling watcher
///
/// `run_cycle` takes `&mut self`: cycles on one watcher cannot overlap.
/// Use `SharedWatcher` to trigger cycles from several threads.
pub struct ModWatcher {
    recursive_roots: Vec<PathBuf>,
    other_paths: Option<Box<OtherPathsFn>>,
    suffix: Option<String>,
    admit: Option<Box<AdmitFn>>,
    hold_off: HoldOff,
    notify: NotifyPolicy,
    lister: Arc<dyn DirLister + Send + Sync>,
    on_raise: Box<OnRaiseFn>,
    history: RaiseHistory,
    scan_capacity: usize,
    cycles: u64,
}

impl ModWatcher {
    pub fn builder() -> ModWatcherBuilder {
        ModWatcherBuilder::new()
    }

    /// Scan all roots once, raise what changed, and return the raise count
    ///
    /// Never fails: unreadable directories and unstat-able paths are
    /// skipped or recorded with an unknown modification time.
    pub fn run_cycle(&mut self) -> usize {
        let cycle_start = now_nanos();
        let first_run = self.cycles == 0;
        self.cycles += 1;

        let mut ctx = ScanContext::new(
            self.lister.as_ref(),
            self.suffix.as_deref(),
            self.admit.as_deref(),
            self.scan_capacity,
        );
        for root in &self.recursive_roots {
            ctx.scan_recursive_root(root);
        }
        if let Some(provider) = self.other_paths.as_mut() {
            for path in provider() {
                ctx.scan_other_path(&path);
            }
        }

        self.scan_capacity = ctx.len();
        let (gathered, newest) = ctx.finish();

        let held_off = !self.hold_off.allows_raise(first_run, cycle_start, newest);
        let mut changed = HashMap::new();
        if !held_off {
            for (path, info) in gathered {
                if self.history.should_raise(&path, info.mod_time) {
                    self.history.mark(path.clone(), cycle_start);
                    changed.insert(path, info);
                }
            }
        }

        let raised = changed.len();
        trace!(
            "Cycle {}: scanned {}, raised {}{}",
            self.cycles,
            self.scan_capacity,
            raised,
            if held_off { " (held off)" } else { "" }
        );

        if raised > 0 || self.notify == NotifyPolicy::EveryCycle {
            (self.on_raise)(Raise {
                changed,
                cycle_start,
                first_run,
                held_off,
            });
        }

        raised
    }

    /// Number of cycles run so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Number of distinct paths ever raised
    pub fn tracked_paths(&self) -> usize {
        self.history.len()
    }

    /// When `path` was last raised (cycle start, Unix nanoseconds)
    pub fn last_raised(&self, path: &Path) -> Option<i64> {
        self.history.last_raised(path)
    }

    pub fn hold_off(&self) -> Duration {
        self.hold_off.as_duration()
    }

    pub fn recursive_roots(&self) -> &[PathBuf] {
        &self.recursive_roots
    }
}

impl fmt::Debug for ModWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModWatcher")
            .field("recursive_roots", &self.recursive_roots)
            .field("suffix", &self.suffix)
            .field("hold_off", &self.hold_off)
            .field("notify", &self.notify)
            .field("cycles", &self.cycles)
            .field("tracked_paths", &self.history.len())
            .finish_non_exhaustive()
    }
}

/// A `ModWatcher` behind a mutex, for triggering cycles from any thread
#[derive(Clone, Debug)]
pub struct SharedWatcher(Arc<Mutex<ModWatcher>>);

impl SharedWatcher {
    pub fn new(watcher: ModWatcher) -> Self {
        Self(Arc::new(Mutex::new(watcher)))
    }

    /// Run one cycle, waiting for any cycle already in progress
    pub fn run_cycle(&self) -> usize {
        self.0.lock().run_cycle()
    }

    pub fn lock(&self) -> MutexGuard<'_, ModWatcher> {
        self.0.lock()
    }
}

impl From<ModWatcher> for SharedWatcher {
    fn from(watcher: ModWatcher) -> Self {
        Self::new(watcher)
    }
}
