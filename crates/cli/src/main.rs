//! Pollwatch CLI - pollwatch command

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod cmd;
mod logging;
mod settings;
mod util;

/// Pollwatch - polling file modification watcher
#[derive(Parser)]
#[command(name = "pollwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch paths and print what changed each cycle
    Watch(cmd::watch::WatchArgs),
    /// List all files under a directory
    Files {
        /// Directory to list
        dir: PathBuf,
        /// Leave out files under this sub-path (relative to DIR)
        #[arg(long)]
        ignore: Option<PathBuf>,
        /// Only list files whose name matches, e.g. "*.rs"
        #[arg(long)]
        pattern: Option<String>,
        /// Show size and modification time
        #[arg(short, long)]
        long: bool,
    },
    /// Recursively copy a directory's contents
    Copy {
        /// Source directory
        src: PathBuf,
        /// Destination directory (created if missing)
        dst: PathBuf,
        /// Skip files ending with this suffix
        #[arg(long, value_name = "SUFFIX")]
        skip_suffix: Option<String>,
        /// Skip sub-directories with this name (repeatable)
        #[arg(long = "skip-dir", value_name = "NAME")]
        skip_dirs: Vec<String>,
    },
    /// Remove everything inside a directory
    Clear {
        /// Directory to clear
        dir: PathBuf,
        /// Keep direct children with this name (repeatable)
        #[arg(long = "keep", value_name = "NAME")]
        keep: Vec<String>,
    },
    /// Find the nearest file with this name, searching upwards
    Locate {
        /// File name to look for
        name: String,
        /// Directory to start from (default: current directory)
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Exit 0 if any file in DIR is newer than the oldest of FILES, else 1
    Newer {
        /// Directory to scan
        dir: PathBuf,
        /// Files to compare against
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Inspect watch configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print an example configuration file
    Example,
    /// Show the configuration `watch` would use
    Show {
        /// Configuration file (default: search ./pollwatch.toml, then the user config dir)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the user-level configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Held until exit so buffered file logs are flushed
    let _log_guard = logging::init(cli.log_dir.as_deref())?;

    match cli.command {
        Commands::Watch(args) => cmd::watch::run(args).await?,
        Commands::Files { dir, ignore, pattern, long } => {
            cmd::files::run(&dir, ignore.as_deref(), pattern.as_deref(), long)?
        }
        Commands::Copy { src, dst, skip_suffix, skip_dirs } => {
            cmd::copy::run(&src, &dst, skip_suffix.as_deref(), &skip_dirs)?
        }
        Commands::Clear { dir, keep } => cmd::clear::run(&dir, &keep)?,
        Commands::Locate { name, from } => {
            if !cmd::locate::run(&name, from)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Newer { dir, files } => {
            if !cmd::newer::run(&dir, &files) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Example => cmd::config::run_example(),
            ConfigCommands::Show { config } => cmd::config::run_show(config.as_deref())?,
            ConfigCommands::Path => cmd::config::run_path()?,
        },
    }

    Ok(ExitCode::SUCCESS)
}
