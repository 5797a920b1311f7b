//! TexKit CLI - maintenance commands for a CDN texture library

pub mod commands;
pub mod progress;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use commands::Commands;
use console::Emoji;
use indicatif::ProgressBar;
use tracing::Level;

use crate::config::TexKitConfig;

#[derive(Parser)]
#[command(name = "texkit", version)]
#[command(about = "TexKit: catalog, thumbnail and clean up a CDN texture library", long_about = None)]
struct Cli {
    /// Library root (contains textures/ and the catalog)
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file (default: <root>/texkit.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub root: PathBuf,
    pub config: Option<PathBuf>,
    pub quiet: bool,
}

impl GlobalArgs {
    /// Load the library configuration
    pub fn load_config(&self) -> anyhow::Result<TexKitConfig> {
        Ok(TexKitConfig::load(&self.root, self.config.as_deref())?)
    }

    /// Print a step line unless `--quiet`
    pub fn step(&self, current: usize, total: usize, emoji: Emoji, msg: &str) {
        if !self.quiet {
            progress::print_step(current, total, emoji, msg);
        }
    }

    /// Print the completion line unless `--quiet`
    pub fn done(&self, elapsed: Duration) {
        if !self.quiet {
            progress::print_done(elapsed);
        }
    }

    /// A progress bar, hidden under `--quiet`
    #[must_use]
    pub fn bar(&self, msg: &str) -> ProgressBar {
        if self.quiet {
            ProgressBar::hidden()
        } else {
            progress::simple_bar(0, msg)
        }
    }

    /// A spinner, hidden under `--quiet`
    #[must_use]
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.quiet {
            ProgressBar::hidden()
        } else {
            progress::simple_spinner(msg)
        }
    }
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Run the TexKit CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    let args = GlobalArgs {
        root: cli.root,
        config: cli.config,
        quiet: cli.quiet,
    };
    cli.command.execute(&args)
}
