//! List files under a directory

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use pollwatch_core::fs::{all_file_paths_in, is_dir};
use pollwatch_core::{DirLister, NamePattern, OsLister};
use std::path::Path;

pub fn run(dir: &Path, ignore: Option<&Path>, pattern: Option<&str>, long: bool) -> Result<()> {
    if !is_dir(dir) {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    let pattern = pattern
        .map(NamePattern::new)
        .transpose()
        .context("Invalid --pattern")?;

    let mut paths = all_file_paths_in(dir, ignore, pattern.as_ref());
    paths.sort();

    for path in &paths {
        if !long {
            println!("{}", path.display());
            continue;
        }

        match OsLister.stat(path) {
            Ok(info) => println!(
                "{:>10}  {:<16}  {}",
                util::format_size(info.len),
                util::format_age(info.mod_time).dimmed(),
                path.display()
            ),
            Err(e) => {
                tracing::debug!("Cannot stat {}: {}", path.display(), e);
                println!("{:>10}  {:<16}  {}", "?", "?", path.display());
            }
        }
    }

    Ok(())
}
