//! CLI command implementations

mod clean;
mod release;

pub use clean::CleanCommand;
pub use release::ReleaseCommand;
pub use test::TestCommand;

use std::sync::Arc;
use std::time::Duration;

use gantry_exec::{CommandExecutor, OutputProcessor, XcodebuildFormatter};

use crate::cli::Cli;

/// Executor bound to the operation's working directory.
fn build_executor(
    working_dir: &std::path::Path,
    dry_run: bool,
    timeout_secs: Option<u64>,
) -> Arc<CommandExecutor> {
    let mut executor = CommandExecutor::new(working_dir).with_dry_run(dry_run);
    if let Some(secs) = timeout_secs {
        executor = executor.with_timeout(Duration::from_secs(secs));
    }
    Arc::new(executor)
}

/// The standard xcodebuild output pipeline for this CLI.
fn build_processor(cli: &Cli) -> OutputProcessor {
    OutputProcessor::new(Box::new(XcodebuildFormatter))
        .with_verbose(cli.verbose)
        .with_preserve_unrecognized(true)
}
