//! Error types for workflow orchestration

use thiserror::Error;

use gantry_core::ConfigError;
use gantry_exec::ExecError;
use gantry_xcode::XcodeError;

/// Result type for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Errors that abort a whole operation before or during orchestration.
///
/// Individual command failures are NOT represented here; they are captured
/// as [`crate::StageOutcome::Failed`] inside the result structures.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// No [test] section configured
    #[error("no test configuration defined; add a [test] section with schemes")]
    NoTestConfiguration,

    /// Requested scheme names that are not configured
    #[error(
        "unknown scheme(s): [{}]; configured schemes: [{}]",
        .requested.join(", "),
        .known.join(", ")
    )]
    SchemesNotFound {
        requested: Vec<String>,
        known: Vec<String>,
    },

    /// No [release] section configured
    #[error("no release configuration defined; add a [release] section with environments")]
    NoReleaseConfiguration,

    /// Requested release environment that is not configured
    #[error(
        "unknown release environment '{requested}'; known environments: [{}]",
        .known.join(", ")
    )]
    EnvironmentNotFound {
        requested: String,
        known: Vec<String>,
    },

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Toolchain discovery error
    #[error(transparent)]
    Toolchain(#[from] XcodeError),

    /// Infrastructure failure in the process machinery
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
