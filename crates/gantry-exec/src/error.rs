//! Error types for command execution

use thiserror::Error;

/// Result type for execution operations
pub type Result<T> = std::result::Result<T, ExecError>;

/// Command execution errors.
///
/// A command that runs to completion with a non-zero exit code is NOT an
/// error at this layer; it comes back as a [`crate::CommandOutcome`] and the
/// caller decides what the exit code means.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The process could not be started at all
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while draining the child's output
    #[error("I/O error while reading command output: {0}")]
    Io(#[from] std::io::Error),

    /// The command exceeded the configured time limit and was killed
    #[error("command timed out after {seconds}s: {command}")]
    TimedOut { command: String, seconds: u64 },
}

impl ExecError {
    /// Whether this error means the process machinery itself is broken.
    ///
    /// Infrastructure errors propagate to the caller immediately; a timeout
    /// is aggregated by orchestrators exactly like a non-zero exit.
    pub fn is_infrastructure(&self) -> bool {
        !matches!(self, Self::TimedOut { .. })
    }
}
