//! Child process spawning with incremental output streaming

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{ExecError, Result};
use crate::invocation::{CommandInvocation, CommandOutcome};
use crate::line_buffer::LineBuffer;

/// Seam between orchestrators and the process machinery.
///
/// Orchestrators hold an `Arc<dyn CommandRunner>`; tests substitute a
/// scripted implementation to exercise failure paths without a toolchain.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command, invoking `on_line` for each completed output line
    /// (stdout and stderr interleaved in arrival order) while it runs.
    async fn run_streaming(
        &self,
        invocation: &CommandInvocation,
        on_line: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<CommandOutcome>;

    /// Run the command without observing its output as it arrives.
    async fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutcome> {
        self.run_streaming(invocation, &mut |_line: &str| {}).await
    }

    /// Whether this runner records commands instead of spawning them.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Spawns external commands in a fixed working directory.
///
/// One executor is bound to exactly one working directory for its lifetime;
/// operating in a different directory requires a new instance. The ambient
/// process working directory is never consulted.
#[derive(Debug)]
pub struct CommandExecutor {
    working_dir: PathBuf,
    dry_run: bool,
    timeout: Option<Duration>,
    recorded: Mutex<Vec<CommandInvocation>>,
}

impl CommandExecutor {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            dry_run: false,
            timeout: None,
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// In dry-run mode commands are rendered, logged and recorded exactly as
    /// they would be executed, but never spawned; the outcome is a synthetic
    /// success so downstream aggregation behaves identically.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Kill the child and surface [`ExecError::TimedOut`] if it runs longer
    /// than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Invocations recorded in dry-run mode, in submission order.
    pub fn recorded_invocations(&self) -> Vec<CommandInvocation> {
        self.recorded.lock().expect("recorded list poisoned").clone()
    }

    async fn spawn_and_drain(
        &self,
        invocation: &CommandInvocation,
        on_line: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<CommandOutcome> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(env) = &invocation.env {
            command.envs(env);
        }

        let mut child = command.spawn().map_err(|e| ExecError::Spawn {
            program: invocation.program.clone(),
            source: e,
        })?;

        let mut stdout = child.stdout.take().expect("child stdout is piped");
        let mut stderr = child.stderr.take().expect("child stderr is piped");

        let mut stdout_lines = LineBuffer::new();
        let mut stderr_lines = LineBuffer::new();
        let mut stdout_text = String::new();
        let mut stderr_text = String::new();
        let mut combined = String::new();
        let mut stdout_open = true;
        let mut stderr_open = true;
        let mut out_chunk = [0u8; 4096];
        let mut err_chunk = [0u8; 4096];

        fn emit(
            lines: Vec<String>,
            combined: &mut String,
            on_line: &mut (dyn for<'a> FnMut(&'a str) + Send),
        ) {
            for line in lines {
                combined.push_str(&line);
                combined.push('\n');
                on_line(line.as_str());
            }
        }

        while stdout_open || stderr_open {
            tokio::select! {
                read = stdout.read(&mut out_chunk), if stdout_open => {
                    let n = read?;
                    if n == 0 {
                        stdout_open = false;
                    } else {
                        let text = String::from_utf8_lossy(&out_chunk[..n]).into_owned();
                        stdout_text.push_str(&text);
                        emit(stdout_lines.append(&text), &mut combined, on_line);
                    }
                }
                read = stderr.read(&mut err_chunk), if stderr_open => {
                    let n = read?;
                    if n == 0 {
                        stderr_open = false;
                    } else {
                        let text = String::from_utf8_lossy(&err_chunk[..n]).into_owned();
                        stderr_text.push_str(&text);
                        emit(stderr_lines.append(&text), &mut combined, on_line);
                    }
                }
            }
        }

        // Unterminated final lines still reach the consumer.
        if let Some(tail) = stdout_lines.flush() {
            emit(vec![tail], &mut combined, on_line);
        }
        if let Some(tail) = stderr_lines.flush() {
            emit(vec![tail], &mut combined, on_line);
        }

        let status = child.wait().await?;
        let exit_code = status.code().unwrap_or(-1);
        debug!(command = %invocation.render(), exit_code, "command finished");

        Ok(CommandOutcome {
            exit_code,
            stdout: stdout_text,
            stderr: stderr_text,
            combined,
        })
    }
}

#[async_trait]
impl CommandRunner for CommandExecutor {
    async fn run_streaming(
        &self,
        invocation: &CommandInvocation,
        on_line: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<CommandOutcome> {
        if self.dry_run {
            info!(command = %invocation.render(), "dry-run: command not spawned");
            self.recorded
                .lock()
                .expect("recorded list poisoned")
                .push(invocation.clone());
            return Ok(CommandOutcome::dry_run());
        }

        debug!(
            command = %invocation.render(),
            cwd = %self.working_dir.display(),
            "spawning command"
        );

        match self.timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, self.spawn_and_drain(invocation, on_line)).await
                {
                    Ok(result) => result,
                    // kill_on_drop reaps the abandoned child
                    Err(_) => Err(ExecError::TimedOut {
                        command: invocation.render(),
                        seconds: limit.as_secs(),
                    }),
                }
            }
            None => self.spawn_and_drain(invocation, on_line).await,
        }
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}
