//! Watch paths and report raises

use crate::{settings, util};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use owo_colors::OwoColorize;
use pollwatch_core::FileKind;
use pollwatch_watcher::{IgnoreConfig, NotifyPolicy, Poller, Raise, WatchConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::info;

#[derive(Args, Debug, Default)]
pub struct WatchArgs {
    /// Directories to watch recursively (replaces configured roots)
    pub roots: Vec<PathBuf>,

    /// File or directory to watch without recursion (repeatable)
    #[arg(long = "other", value_name = "PATH")]
    pub other: Vec<PathBuf>,

    /// Only report files ending with this suffix
    #[arg(long)]
    pub suffix: Option<String>,

    /// Wait until nothing changed for this long before reporting (0 = off)
    #[arg(long, value_name = "MS")]
    pub hold_off_ms: Option<u64>,

    /// Time between scans
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Never descend into directories with this name (repeatable)
    #[arg(long = "skip-dir", value_name = "NAME")]
    pub skip_dir: Vec<String>,

    /// Skip VCS metadata and directories excluded by .gitignore
    #[arg(long)]
    pub gitignore: bool,

    /// When to report a cycle
    #[arg(long, value_enum)]
    pub notify: Option<NotifyArg>,

    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Print one JSON object per cycle instead of text
    #[arg(long)]
    pub json: bool,

    /// Configuration file (default: search ./pollwatch.toml, then the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifyArg {
    /// Report every cycle, including quiet ones
    EveryCycle,
    /// Report only cycles that raised something
    OnChange,
}

impl From<NotifyArg> for NotifyPolicy {
    fn from(arg: NotifyArg) -> Self {
        match arg {
            NotifyArg::EveryCycle => NotifyPolicy::EveryCycle,
            NotifyArg::OnChange => NotifyPolicy::OnChange,
        }
    }
}

impl WatchArgs {
    /// Layer command-line flags over the loaded configuration
    pub fn apply_to(&self, config: &mut WatchConfig) {
        if !self.roots.is_empty() {
            config.recursive_roots = self.roots.clone();
        }
        if !self.other.is_empty() {
            config.other_paths = self.other.clone();
        }
        if let Some(suffix) = &self.suffix {
            config.suffix = Some(suffix.clone());
        }
        if let Some(ms) = self.hold_off_ms {
            config.hold_off_ms = ms;
        }
        if let Some(ms) = self.interval_ms {
            config.interval_ms = ms;
        }
        for name in &self.skip_dir {
            if !config.skip_dir_names.contains(name) {
                config.skip_dir_names.push(name.clone());
            }
        }
        if self.gitignore && config.ignore.is_none() {
            config.ignore = Some(IgnoreConfig::default());
        }
        if let Some(notify) = self.notify {
            config.notify = notify.into();
        }
    }
}

/// One changed path in JSON output
#[derive(Debug, Serialize)]
pub struct ChangedPath<'a> {
    pub path: &'a Path,
    pub kind: FileKind,
    pub len: u64,
    pub mod_time: i64,
}

/// One cycle in JSON output
#[derive(Debug, Serialize)]
pub struct CycleReport<'a> {
    pub cycle_start: i64,
    pub first_run: bool,
    pub held_off: bool,
    pub changed: Vec<ChangedPath<'a>>,
}

impl<'a> CycleReport<'a> {
    pub fn new(raise: &'a Raise) -> Self {
        let changed = raise
            .sorted_paths()
            .into_iter()
            .map(|path| {
                let info = &raise.changed[path];
                ChangedPath {
                    path,
                    kind: info.kind,
                    len: info.len,
                    mod_time: info.mod_time,
                }
            })
            .collect();

        Self {
            cycle_start: raise.cycle_start,
            first_run: raise.first_run,
            held_off: raise.held_off,
            changed,
        }
    }
}

/// Render a raise as coloured text; quiet cycles render as nothing
pub fn render_text(raise: &Raise) -> Option<String> {
    let time = util::format_clock(raise.cycle_start);

    if raise.held_off {
        return Some(format!(
            "{} {}",
            time.dimmed(),
            "changes still settling, holding off".dimmed()
        ));
    }
    if raise.is_empty() {
        return None;
    }

    let label = if raise.first_run { "initial" } else { "changed" };
    let mut out = format!("{} {} {}", time.dimmed(), raise.len().bold(), label.cyan());
    for path in raise.sorted_paths() {
        let marker = match raise.changed[path].kind {
            FileKind::Dir => "d",
            FileKind::File => "f",
            FileKind::Other => "?",
        };
        out.push_str(&format!("\n  {} {}", marker.yellow(), path.display()));
    }
    Some(out)
}

fn print_raise(raise: &Raise, json: bool) {
    if json {
        match serde_json::to_string(&CycleReport::new(raise)) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::warn!("Failed to encode cycle report: {}", e),
        }
    } else if let Some(text) = render_text(raise) {
        println!("{}", text);
    }
}

pub async fn run(args: WatchArgs) -> Result<()> {
    // 1. Resolve configuration
    let (mut config, source) = settings::load(args.config.as_deref())?;
    args.apply_to(&mut config);
    if let Some(path) = &source {
        info!("Using configuration {}", path.display());
    }

    let interval = config.interval();
    let json = args.json;

    // 2. Build the watcher
    let builder = config
        .into_builder()
        .context("Invalid watch configuration")?;
    let mut watcher = builder.build(move |raise| print_raise(&raise, json));

    if args.once {
        watcher.run_cycle();
        return Ok(());
    }

    // 3. Poll until Ctrl-C
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = tokio::spawn(Poller::new(watcher, interval).run(shutdown_rx));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!("Interrupted, stopping");
    let _ = shutdown_tx.send(true);

    let cycles = poller.await.context("Poller task failed")??;
    info!("Ran {} cycles", cycles);

    Ok(())
}
