//! Shared command-step plumbing for the orchestrators

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use gantry_core::Config;
use gantry_exec::{CommandInvocation, CommandOutcome, CommandRunner, OutputProcessor};
use gantry_xcode::ToolchainLocator;

use crate::error::Result;
use crate::results::StageOutcome;

/// Run one command, streaming its lines through the processor, and fold the
/// result into a [`StageOutcome`].
///
/// Only infrastructure errors propagate; a non-zero exit and a timeout both
/// come back as `Failed` so the caller can aggregate them.
pub(crate) async fn run_step(
    runner: &Arc<dyn CommandRunner>,
    processor: &OutputProcessor,
    invocation: &CommandInvocation,
) -> Result<StageOutcome> {
    let mut sink = |line: &str| {
        if let Some(formatted) = processor.process_line(line) {
            println!("{formatted}");
        }
    };

    match runner.run_streaming(invocation, &mut sink).await {
        Ok(outcome) if outcome.success() => Ok(StageOutcome::Succeeded),
        Ok(outcome) => Ok(StageOutcome::Failed {
            error: failure_detail(invocation, &outcome),
        }),
        Err(e) if !e.is_infrastructure() => Ok(StageOutcome::Failed {
            error: e.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Locate the configured toolchain and return the environment overrides
/// every subsequent invocation carries.
///
/// Skipped in dry-run mode: there is nothing to discover when no command
/// will be spawned.
pub(crate) async fn toolchain_env(
    config: &Config,
    runner: &Arc<dyn CommandRunner>,
) -> Result<Option<BTreeMap<String, String>>> {
    if runner.is_dry_run() {
        debug!("dry-run: toolchain discovery skipped");
        return Ok(None);
    }

    let locator = ToolchainLocator::new(Arc::clone(runner));
    let toolchain = locator.locate(&config.toolchain.version).await?;
    info!(
        version = %toolchain.version,
        path = %toolchain.path.display(),
        "using toolchain"
    );

    Ok(Some(BTreeMap::from([(
        "DEVELOPER_DIR".to_string(),
        toolchain.developer_dir().display().to_string(),
    )])))
}

/// Stamp toolchain environment overrides onto an invocation.
pub(crate) fn apply_env(
    invocation: CommandInvocation,
    env: &Option<BTreeMap<String, String>>,
) -> CommandInvocation {
    match env {
        Some(vars) => invocation.envs(vars.clone()),
        None => invocation,
    }
}

/// Resolve a configured path against the operation's working directory.
///
/// Invocation arguments stay config-relative (the child resolves them
/// against its own working directory); this is for filesystem operations
/// performed by this process.
pub(crate) fn resolve_path(working_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    }
}

fn failure_detail(invocation: &CommandInvocation, outcome: &CommandOutcome) -> String {
    let mut detail = format!(
        "`{}` exited with code {}",
        invocation.render(),
        outcome.exit_code
    );

    let context = if outcome.stderr.trim().is_empty() {
        outcome.combined.trim()
    } else {
        outcome.stderr.trim()
    };
    if !context.is_empty() {
        detail.push('\n');
        detail.push_str(&tail_lines(context, 25));
    }
    detail
}

/// Last `max` lines of a block of captured output.
fn tail_lines(text: &str, max: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(max);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_keeps_last_lines() {
        let text = (1..=30).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let tail = tail_lines(&text, 25);
        assert!(tail.starts_with("6\n"));
        assert!(tail.ends_with("\n30"));
    }

    #[test]
    fn failure_detail_prefers_stderr() {
        let invocation = CommandInvocation::new("xcodebuild").arg("archive");
        let outcome = CommandOutcome {
            exit_code: 65,
            stdout: "progress\n".to_string(),
            stderr: "error: signing failed\n".to_string(),
            combined: "progress\nerror: signing failed\n".to_string(),
        };

        let detail = failure_detail(&invocation, &outcome);
        assert!(detail.contains("exited with code 65"));
        assert!(detail.contains("error: signing failed"));
        assert!(!detail.contains("progress"));
    }
}
