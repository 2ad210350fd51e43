//! Error types for toolchain discovery

use std::path::PathBuf;
use thiserror::Error;

use gantry_exec::ExecError;

/// Result type for toolchain operations
pub type Result<T> = std::result::Result<T, XcodeError>;

/// Toolchain discovery errors. All of these are fatal and reported before
/// any build command executes.
#[derive(Debug, Error)]
pub enum XcodeError {
    /// No installed Xcode matches the configured version
    #[error(
        "no Xcode installation matches version '{requested}'; discovered versions: [{}]",
        .available.join(", ")
    )]
    ToolchainVersionNotFound {
        requested: String,
        available: Vec<String>,
    },

    /// An installation's version metadata could not be read
    #[error("failed to read Xcode version from {path}: {message}")]
    VersionUnreadable { path: PathBuf, message: String },

    /// The discovery subprocess itself failed
    #[error(transparent)]
    Exec(#[from] ExecError),
}
