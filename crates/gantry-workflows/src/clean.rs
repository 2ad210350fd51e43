//! Removing build and report directories

use std::path::Path;

use tracing::{debug, info};

use gantry_core::Config;

use crate::error::Result;
use crate::step::resolve_path;

/// Remove the configured build and report directories.
///
/// Idempotent: directories that do not exist are not an error.
pub async fn clean(config: &Config, working_dir: &Path) -> Result<()> {
    for dir in [&config.paths.build_dir, &config.paths.report_dir] {
        let resolved = resolve_path(working_dir, dir);
        match tokio::fs::remove_dir_all(&resolved).await {
            Ok(()) => info!(dir = %resolved.display(), "removed directory"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(dir = %resolved.display(), "directory already absent");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
