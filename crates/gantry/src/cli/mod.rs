//! CLI definition and command handling

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{CleanCommand, ReleaseCommand, TestCommand};

/// Gantry - build, test and release automation for Xcode projects
#[derive(Debug, Parser)]
#[command(name = "gantry")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show every formatted toolchain line, not only errors and failures
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress summaries; live error/failure lines are still shown
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the configured scheme × destination test matrix
    Test(TestCommand),

    /// Run a release environment's package → export → publish chain
    Release(ReleaseCommand),

    /// Remove the configured build and report directories
    Clean(CleanCommand),
}

impl Cli {
    /// Execute the CLI command, returning the process exit code.
    pub fn execute(self) -> anyhow::Result<i32> {
        match self.command {
            Commands::Test(ref cmd) => cmd.execute(&self),
            Commands::Release(ref cmd) => cmd.execute(&self),
            Commands::Clean(ref cmd) => cmd.execute(&self),
        }
    }

    /// Resolve the operation's working directory once, at the boundary.
    ///
    /// Every component receives this explicitly; nothing below the CLI reads
    /// the ambient process directory.
    pub fn working_dir(&self) -> anyhow::Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        Ok(match &self.directory {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => cwd,
        })
    }
}
