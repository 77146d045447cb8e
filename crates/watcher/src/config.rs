//! Serializable watch configuration
//!
//! The TOML form of a `ModWatcherBuilder`, for front ends that read
//! their setup from a file.

use crate::admission::{skip_dir_names, IgnoreConfig, IgnoreRules};
use crate::error::{Result, WatchError};
use crate::modwatch::{ModWatcherBuilder, NotifyPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Watch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Directories walked fully recursively
    #[serde(default)]
    pub recursive_roots: Vec<PathBuf>,

    /// Files or directories scanned non-recursively
    #[serde(default)]
    pub other_paths: Vec<PathBuf>,

    /// Only track files ending with this suffix
    #[serde(default)]
    pub suffix: Option<String>,

    /// Hold-off window in milliseconds (0 = disabled)
    #[serde(default = "default_hold_off_ms")]
    pub hold_off_ms: u64,

    /// Polling interval in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Directory names never descended into
    #[serde(default)]
    pub skip_dir_names: Vec<String>,

    /// When to invoke the callback
    #[serde(default)]
    pub notify: NotifyPolicy,

    /// Gitignore-based directory admission
    #[serde(default)]
    pub ignore: Option<IgnoreConfig>,
}

fn default_hold_off_ms() -> u64 {
    500
}

fn default_interval_ms() -> u64 {
    1000
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            recursive_roots: vec![],
            other_paths: vec![],
            suffix: None,
            hold_off_ms: default_hold_off_ms(),
            interval_ms: default_interval_ms(),
            skip_dir_names: vec![],
            notify: NotifyPolicy::default(),
            ignore: None,
        }
    }
}

impl WatchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| WatchError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| WatchError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| WatchError::Config {
            reason: e.to_string(),
        })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| WatchError::Config {
            reason: e.to_string(),
        })
    }

    /// Check that the configuration describes something watchable
    pub fn validate(&self) -> Result<()> {
        if self.recursive_roots.is_empty() && self.other_paths.is_empty() {
            return Err(WatchError::Config {
                reason: "no paths to watch (set recursive_roots or other_paths)".to_string(),
            });
        }
        if self.interval_ms == 0 {
            return Err(WatchError::Config {
                reason: "interval_ms must be greater than 0".to_string(),
            });
        }
        if let Some(suffix) = &self.suffix {
            if suffix.trim().is_empty() {
                return Err(WatchError::Config {
                    reason: "suffix must not be blank (omit it to track every file)".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn hold_off(&self) -> Duration {
        Duration::from_millis(self.hold_off_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Validate and turn into a configured builder
    ///
    /// Loads .gitignore files when `ignore` is set.
    pub fn into_builder(self) -> Result<ModWatcherBuilder> {
        self.validate()?;

        let mut builder = ModWatcherBuilder::new()
            .recursive_roots(self.recursive_roots.iter().cloned())
            .hold_off(self.hold_off())
            .notify(self.notify);

        if let Some(suffix) = self.suffix {
            builder = builder.suffix(suffix);
        }

        if !self.other_paths.is_empty() {
            let other_paths = self.other_paths;
            builder = builder.other_paths(move || other_paths.clone());
        }

        let by_name = (!self.skip_dir_names.is_empty()).then(|| skip_dir_names(self.skip_dir_names));
        let by_rules = match self.ignore {
            Some(ignore) => Some(IgnoreRules::load(&self.recursive_roots, ignore)?.into_admission()),
            None => None,
        };

        builder = match (by_name, by_rules) {
            (Some(by_name), Some(by_rules)) => {
                builder.admit_dirs(move |path, name| by_name(path, name) && by_rules(path, name))
            }
            (Some(by_name), None) => builder.admit_dirs(by_name),
            (None, Some(by_rules)) => builder.admit_dirs(by_rules),
            (None, None) => builder,
        };

        Ok(builder)
    }
}

/// Example configuration file
pub fn example_config() -> &'static str {
    r#"# pollwatch configuration

# Directories walked fully recursively
recursive_roots = ["src"]

# Files or directories scanned without recursion
other_paths = ["Cargo.toml"]

# Only track files ending with this suffix (directories are always tracked)
# suffix = ".rs"

# Hold off raising while the newest change is younger than this (0 = off)
hold_off_ms = 500

# Polling interval
interval_ms = 1000

# Directory names never descended into
skip_dir_names = ["target", "node_modules"]

# "every-cycle" or "on-change"
notify = "on-change"

[ignore]
skip_vcs_dirs = true
use_gitignore = true
additional_patterns = []
"#
}
