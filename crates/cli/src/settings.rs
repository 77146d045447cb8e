//! Locating and loading the watch configuration file
//!
//! Search order: an explicit `--config` path, `./pollwatch.toml`, then
//! `<config_dir>/pollwatch/config.toml`. No file at all means defaults.

use anyhow::{Context, Result};
use pollwatch_watcher::WatchConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-local configuration file name
pub const LOCAL_CONFIG_FILE: &str = "pollwatch.toml";

/// User-level configuration file path (e.g. ~/.config/pollwatch/config.toml)
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pollwatch").join("config.toml"))
}

/// Pick the configuration file to use, if any
///
/// An explicit path is returned as-is, even if missing, so loading it
/// reports the error.
pub fn find_config(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = cwd.join(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    user_config_path().filter(|path| path.is_file())
}

/// Load the configuration and report where it came from
pub fn load(explicit: Option<&Path>) -> Result<(WatchConfig, Option<PathBuf>)> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    match find_config(explicit, &cwd) {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            let config = WatchConfig::load(&path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            Ok((config, Some(path)))
        }
        None => {
            debug!("No configuration file found, using defaults");
            Ok((WatchConfig::default(), None))
        }
    }
}
