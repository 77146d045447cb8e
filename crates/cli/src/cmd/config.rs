//! Configuration inspection commands
//!
//! Shows the example file, the resolved configuration, and where the
//! user-level file lives.

use crate::settings;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use pollwatch_watcher::config::example_config;
use std::path::Path;

/// Print an example configuration file
pub fn run_example() {
    print!("{}", example_config());
}

/// Show the configuration `watch` would start from
pub fn run_show(explicit: Option<&Path>) -> Result<()> {
    let (config, source) = settings::load(explicit)?;

    println!("{}", "Watch Configuration".bold());
    match &source {
        Some(path) => println!("{}: {}\n", "Location".dimmed(), path.display().dimmed()),
        None => println!("{}: {}\n", "Location".dimmed(), "(defaults)".dimmed()),
    }

    let rendered = config
        .to_toml_string()
        .context("Failed to render configuration")?;
    print!("{}", rendered);

    if let Err(e) = config.validate() {
        println!("\n{} {}", "Not watchable as-is:".yellow(), e);
    }

    Ok(())
}

/// Print the user-level configuration file path
pub fn run_path() -> Result<()> {
    let path = settings::user_config_path().context("Could not determine config directory")?;
    println!("{}", path.display());
    Ok(())
}
