//! Hold-off and raise-history policy
//!
//! Decides whether a cycle may raise at all (hold-off against files still
//! being written) and which paths pass the "changed since last raised"
//! test.

use ahash::AHashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Quiescence window required before any raise
///
/// If the newest modification seen in a scan is closer to the cycle start
/// than this, the whole cycle is held off. Zero disables the check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoldOff {
    nanos: i64,
}

impl HoldOff {
    pub fn new(window: Duration) -> Self {
        Self {
            nanos: i64::try_from(window.as_nanos()).unwrap_or(i64::MAX),
        }
    }

    /// No debouncing: every cycle may raise
    pub fn disabled() -> Self {
        Self { nanos: 0 }
    }

    pub fn is_disabled(&self) -> bool {
        self.nanos <= 0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_nanos(self.nanos.max(0) as u64)
    }

    /// Whether a cycle that started at `cycle_start` may raise, given the
    /// newest modification time it observed
    ///
    /// The first cycle always raises.
    pub fn allows_raise(&self, first_run: bool, cycle_start: i64, newest_mod_time: i64) -> bool {
        first_run
            || self.is_disabled()
            || cycle_start.saturating_sub(newest_mod_time) > self.nanos
    }
}

/// Per-path timestamp of the last cycle that raised it
///
/// Keys are never removed: once seen, a path is remembered for the
/// watcher's lifetime.
#[derive(Debug, Default)]
pub struct RaiseHistory {
    last_raised: AHashMap<PathBuf, i64>,
}

impl RaiseHistory {
    pub fn new() -> Self {
        Self {
            last_raised: AHashMap::with_capacity(128),
        }
    }

    /// Whether `path`, observed with `mod_time`, belongs in this cycle's raise
    ///
    /// True if the path was never raised, its modification time is unknown
    /// (`0`), or it was modified at or after the last raise.
    pub fn should_raise(&self, path: &Path, mod_time: i64) -> bool {
        match self.last_raised.get(path) {
            None => true,
            Some(&raised_at) => mod_time == 0 || raised_at <= mod_time,
        }
    }

    /// Record that `path` was raised at `at`
    pub fn mark(&mut self, path: PathBuf, at: i64) {
        self.last_raised.insert(path, at);
    }

    pub fn last_raised(&self, path: &Path) -> Option<i64> {
        self.last_raised.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.last_raised.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_raised.is_empty()
    }
}
