//! Directory admission rules
//!
//! Builds the `(full_path, name) -> bool` predicates a `ModWatcher` uses
//! to decide which directories it descends into. Sources, in order:
//! 1. VCS metadata directories (.git/, .hg/, .svn/, .jj/), on by default
//! 2. .gitignore at each recursive root (optional, enabled by default)
//! 3. Additional name patterns from config

use crate::error::{Result, WatchError};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use pollwatch_core::NamePattern;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const VCS_DIRS: &[&str] = &[".git", ".hg", ".svn", ".jj"];

/// Admission predicate rejecting directories by exact name
pub fn skip_dir_names(names: Vec<String>) -> impl Fn(&Path, &str) -> bool + Send + Sync + 'static {
    move |_path: &Path, name: &str| !names.iter().any(|n| n == name)
}

/// Directory admission rules for a set of roots
pub struct IgnoreRules {
    /// Roots and their loaded .gitignore, if any
    roots: Vec<(PathBuf, Option<Gitignore>)>,

    /// Parsed additional patterns
    patterns: Vec<NamePattern>,

    /// Configuration
    config: IgnoreConfig,
}

impl IgnoreRules {
    /// Load ignore rules for the given roots
    pub fn load(roots: &[PathBuf], config: IgnoreConfig) -> Result<Self> {
        let patterns = config
            .additional_patterns
            .iter()
            .map(|p| NamePattern::new(p.trim_end_matches('/')))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut rules = Self {
            roots: roots.iter().map(|r| (r.clone(), None)).collect(),
            patterns,
            config,
        };

        rules.reload_ignore_files()?;
        Ok(rules)
    }

    /// Reload .gitignore files from disk
    pub fn reload_ignore_files(&mut self) -> Result<()> {
        for (root, gitignore) in &mut self.roots {
            *gitignore = None;
            if !self.config.use_gitignore {
                continue;
            }

            let gitignore_path = root.join(".gitignore");
            if gitignore_path.is_file() {
                let mut builder = GitignoreBuilder::new(&*root);
                if let Some(err) = builder.add(&gitignore_path) {
                    tracing::warn!("Partially invalid {}: {}", gitignore_path.display(), err);
                }
                let built = builder.build().map_err(|source| WatchError::Ignore {
                    path: gitignore_path.clone(),
                    source,
                })?;
                *gitignore = Some(built);
            }
        }
        Ok(())
    }

    /// Whether the directory at `path` (base name `name`) should be scanned
    pub fn admits(&self, path: &Path, name: &str) -> bool {
        if self.config.skip_vcs_dirs && VCS_DIRS.contains(&name) {
            return false;
        }

        for (root, gitignore) in &self.roots {
            let Some(gitignore) = gitignore else { continue };
            // The matcher panics on paths outside its root
            if path != root.as_path() && path.starts_with(root) {
                if gitignore.matched_path_or_any_parents(path, true).is_ignore() {
                    return false;
                }
            }
        }

        !self.patterns.iter().any(|p| p.matches(name))
    }

    /// Number of active rule sources
    pub fn active_sources(&self) -> usize {
        let mut count = 0;
        if self.config.skip_vcs_dirs {
            count += 1;
        }
        count += self.roots.iter().filter(|(_, g)| g.is_some()).count();
        if !self.patterns.is_empty() {
            count += 1;
        }
        count
    }

    /// Turn the rules into an admission predicate
    pub fn into_admission(self) -> impl Fn(&Path, &str) -> bool + Send + Sync + 'static {
        move |path: &Path, name: &str| self.admits(path, name)
    }
}

/// Ignore configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreConfig {
    /// Skip VCS metadata directories (default: true)
    #[serde(default = "default_true")]
    pub skip_vcs_dirs: bool,

    /// Use .gitignore at each root (default: true)
    #[serde(default = "default_true")]
    pub use_gitignore: bool,

    /// Additional directory-name patterns (`*` wildcards)
    #[serde(default)]
    pub additional_patterns: Vec<String>,
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            skip_vcs_dirs: true,
            use_gitignore: true,
            additional_patterns: vec![],
        }
    }
}

fn default_true() -> bool {
    true
}
