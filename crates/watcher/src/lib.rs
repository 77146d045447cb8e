//! Polling modification watcher for pollwatch
//!
//! This crate provides a pure polling design (no inotify/FSEvents) with:
//! - Per-path raise history (no re-raise without a newer modification)
//! - Hold-off against files that are still being written
//! - Directory admission (name lists, .gitignore rules)
//! - Mixed recursive / non-recursive roots
//! - An interval poller for callers that don't run their own loop

pub mod admission;
pub mod config;
pub mod debounce;
pub mod error;
pub mod modwatch;
pub mod poller;
mod scan;

#[cfg(test)]
mod test_support;

// Re-exports
pub use admission::{skip_dir_names, IgnoreConfig, IgnoreRules};
pub use config::WatchConfig;
pub use debounce::{HoldOff, RaiseHistory};
pub use error::{Result, WatchError};
pub use modwatch::{ModWatcher, ModWatcherBuilder, NotifyPolicy, Raise, SharedWatcher};
pub use poller::{Poller, PollerHandle};
pub use scan::AdmitFn;
