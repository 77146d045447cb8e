//! Recursive directory copy

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use pollwatch_core::fs::{copy_all_files_and_sub_dirs, is_dir};
use std::path::Path;
use tracing::info;

pub fn run(src: &Path, dst: &Path, skip_suffix: Option<&str>, skip_dirs: &[String]) -> Result<()> {
    if !is_dir(src) {
        anyhow::bail!("Not a directory: {}", src.display());
    }

    let skip_dirs: Vec<&str> = skip_dirs.iter().map(String::as_str).collect();
    copy_all_files_and_sub_dirs(src, dst, skip_suffix.unwrap_or(""), &skip_dirs)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dst.display()))?;

    info!("Copied {} to {}", src.display(), dst.display());
    println!(
        "{} {} -> {}",
        "Copied".green(),
        src.display(),
        dst.display()
    );
    Ok(())
}
