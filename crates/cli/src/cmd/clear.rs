//! Empty a directory

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use pollwatch_core::fs::{clear_dir, is_dir};
use std::path::Path;

pub fn run(dir: &Path, keep: &[String]) -> Result<()> {
    if !is_dir(dir) {
        println!("{} {} is not a directory", "Nothing to clear:".dimmed(), dir.display());
        return Ok(());
    }

    let keep: Vec<&str> = keep.iter().map(String::as_str).collect();
    clear_dir(dir, &keep).with_context(|| format!("Failed to clear {}", dir.display()))?;

    println!("{} {}", "Cleared".green(), dir.display());
    Ok(())
}
