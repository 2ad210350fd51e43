//! Default values and well-known names for configuration

use std::path::PathBuf;

/// Configuration file names searched for, in priority order.
pub fn config_file_names() -> &'static [&'static str] {
    &["gantry.toml", "gantry.yaml", "gantry.yml"]
}

/// Default directory for build products and derived data.
pub fn default_build_dir() -> PathBuf {
    PathBuf::from(".build")
}

/// Default directory for test result bundles.
pub fn default_report_dir() -> PathBuf {
    PathBuf::from(".build/reports")
}

/// Default destination for archive builds.
pub fn default_archive_destination() -> String {
    "generic/platform=iOS".to_string()
}
