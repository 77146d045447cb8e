//! Find a file in the nearest ancestor directory

use anyhow::{Context, Result};
use pollwatch_core::fs::locate;
use std::path::PathBuf;

/// Print the located path; `false` when nothing was found
pub fn run(name: &str, from: Option<PathBuf>) -> Result<bool> {
    let start = match from {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match locate(&start, name) {
        Some(path) => {
            println!("{}", path.display());
            Ok(true)
        }
        None => {
            eprintln!("{} not found in {} or any parent", name, start.display());
            Ok(false)
        }
    }
}
