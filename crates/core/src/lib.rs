//! Filesystem primitives for pollwatch
//!
//! This crate provides:
//! - `FileInfo` snapshots with nanosecond modification times
//! - The `DirLister` capability (and its std::fs implementation)
//! - A lazy, single-pass directory `Walk`
//! - Stateless helpers: copy, clear, locate, read/write, freshness checks

pub mod error;
pub mod fs;
pub mod info;
pub mod lister;
pub mod pattern;
pub mod walk;

// Re-exports
pub use error::FsError;
pub use info::{now_nanos, unix_nanos, FileInfo, FileKind};
pub use lister::{DirLister, OsLister};
pub use pattern::NamePattern;
pub use walk::{Walk, WalkEntry};

/// Result type for filesystem operations
pub type Result<T> = std::result::Result<T, FsError>;
