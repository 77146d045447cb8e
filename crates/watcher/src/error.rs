//! Error types for watcher construction and polling.
//!
//! Scan cycles themselves never fail; these cover configuration,
//! ignore-rule loading and the poller.

use pollwatch_core::FsError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from watcher setup and poller operations.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to load ignore rules from {path}: {source}")]
    Ignore {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error(transparent)]
    Fs(#[from] FsError),

    #[error("Poller failed: {reason}")]
    Poller { reason: String },
}

/// Result type for watcher operations
pub type Result<T> = std::result::Result<T, WatchError>;
