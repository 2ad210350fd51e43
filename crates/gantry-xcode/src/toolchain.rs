//! Locating the installed Xcode matching a configured version

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use gantry_exec::{CommandInvocation, CommandRunner};

use crate::error::{Result, XcodeError};

/// Spotlight query matching Xcode application bundles.
const SPOTLIGHT_QUERY: &str = "kMDItemCFBundleIdentifier == 'com.apple.dt.Xcode'";

/// One discovered Xcode installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainDescriptor {
    /// Path to the application bundle (e.g. /Applications/Xcode.app)
    pub path: PathBuf,

    /// Version string from the bundle's version.plist
    pub version: String,
}

impl ToolchainDescriptor {
    /// Developer directory handed to xcodebuild as `DEVELOPER_DIR`, so a
    /// located-but-not-default installation is actually used.
    pub fn developer_dir(&self) -> PathBuf {
        self.path.join("Contents").join("Developer")
    }
}

/// Discovers Xcode installations and selects by exact version match.
///
/// Discovery runs per top-level operation rather than being cached, so a
/// toolchain swap between commands is honored without a restart.
pub struct ToolchainLocator {
    runner: Arc<dyn CommandRunner>,
}

impl ToolchainLocator {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Return the first installation whose version exactly equals
    /// `required_version`.
    ///
    /// Fails with [`XcodeError::ToolchainVersionNotFound`] when nothing is
    /// discovered, when no discovered installation's version is readable, or
    /// when none match; the versions that were readable are attached for
    /// diagnostics.
    pub async fn locate(&self, required_version: &str) -> Result<ToolchainDescriptor> {
        let invocation = CommandInvocation::new("mdfind").arg(SPOTLIGHT_QUERY);
        let outcome = self.runner.run(&invocation).await?;

        let installs: Vec<PathBuf> = outcome
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect();
        debug!(count = installs.len(), "discovered Xcode installations");

        let mut available = Vec::new();
        for install in installs {
            match read_toolchain_version(&install) {
                Ok(version) => {
                    if version == required_version {
                        info!(
                            path = %install.display(),
                            version,
                            "selected Xcode installation"
                        );
                        return Ok(ToolchainDescriptor {
                            path: install,
                            version,
                        });
                    }
                    available.push(version);
                }
                Err(e) => {
                    warn!(path = %install.display(), error = %e, "skipping installation with unreadable version");
                }
            }
        }

        Err(XcodeError::ToolchainVersionNotFound {
            requested: required_version.to_string(),
            available,
        })
    }
}

/// Read an installation's version string from `Contents/version.plist`.
pub fn read_toolchain_version(install: &Path) -> Result<String> {
    let plist_path = install.join("Contents").join("version.plist");
    let dict: plist::Dictionary =
        plist::from_file(&plist_path).map_err(|e| XcodeError::VersionUnreadable {
            path: plist_path.clone(),
            message: e.to_string(),
        })?;

    dict.get("CFBundleShortVersionString")
        .and_then(|v| v.as_string())
        .map(String::from)
        .ok_or_else(|| XcodeError::VersionUnreadable {
            path: plist_path,
            message: "CFBundleShortVersionString not found".to_string(),
        })
}
