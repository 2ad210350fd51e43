//! Configuration types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::defaults;

/// Main configuration for Gantry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application identity
    pub app: AppConfig,

    /// Required toolchain version
    pub toolchain: ToolchainConfig,

    /// Build and report directories
    pub paths: PathsConfig,

    /// Test matrix configuration
    pub test: Option<TestConfig>,

    /// Release pipeline configuration
    pub release: Option<ReleaseConfig>,
}

/// Application identity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Display name of the application (also names the exported .ipa)
    pub name: String,

    /// Bundle identifier, used to look up provisioning profiles
    pub bundle_id: String,

    /// Path to the .xcodeproj or .xcworkspace, relative to the project root
    pub project: PathBuf,
}

/// Required toolchain version
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Exact Xcode version string (e.g. "16.0"); matched against
    /// CFBundleShortVersionString of installed Xcodes
    pub version: String,
}

/// Build and report directories
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory for derived data, archives and exported artifacts
    pub build_dir: PathBuf,

    /// Directory for test result bundles
    pub report_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            build_dir: defaults::default_build_dir(),
            report_dir: defaults::default_report_dir(),
        }
    }
}

/// Test matrix configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Schemes to build and test, in run order
    pub schemes: Vec<SchemeConfig>,
}

/// A single scheme's test plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemeConfig {
    /// Scheme name
    pub scheme: String,

    /// Destination used for the build-for-testing step
    pub build_destination: String,

    /// Destinations tests run on, in order
    pub destinations: Vec<String>,
}

/// Release pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Release environments keyed by name (e.g. "beta", "prod")
    pub environments: BTreeMap<String, ReleaseEnvironment>,
}

/// A single release environment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseEnvironment {
    /// Scheme to archive
    pub scheme: String,

    /// Build configuration; xcodebuild's default applies when unset
    pub configuration: Option<String>,

    /// Output label; artifacts are named `<output>.xcarchive` and
    /// `<output>-export` under the build directory
    pub output: String,

    /// Destination for the archive build
    pub destination: String,

    /// Path to the export options plist handed to -exportArchive
    pub export_options: PathBuf,

    /// Code signing settings
    pub signing: SigningConfig,

    /// Upload credentials; required only when the publish stage runs
    pub upload: Option<UploadConfig>,
}

impl Default for ReleaseEnvironment {
    fn default() -> Self {
        Self {
            scheme: String::new(),
            configuration: None,
            output: String::new(),
            destination: defaults::default_archive_destination(),
            export_options: PathBuf::new(),
            signing: SigningConfig::default(),
            upload: None,
        }
    }
}

/// Code signing settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningConfig {
    /// Signing style
    pub style: SigningStyle,

    /// Signing certificate identity (manual signing)
    pub identity: Option<String>,

    /// Development team identifier
    pub team_id: Option<String>,

    /// Provisioning profile names keyed by bundle identifier (manual signing)
    pub profiles: BTreeMap<String, String>,
}

/// Signing style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningStyle {
    /// Xcode-managed signing; provisioning updates are allowed
    #[default]
    Automatic,
    /// Explicit certificate and profile mapping
    Manual,
}

/// Upload credentials for the publish stage.
///
/// Values arrive already resolved from the credential source; Gantry only
/// ever sees the final strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// App Store Connect API key identifier
    pub api_key_id: String,

    /// App Store Connect API issuer identifier
    pub api_issuer_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths() {
        let config = Config::default();
        assert_eq!(config.paths.build_dir, PathBuf::from(".build"));
        assert_eq!(config.paths.report_dir, PathBuf::from(".build/reports"));
    }

    #[test]
    fn environment_defaults_to_generic_ios_destination() {
        let env = ReleaseEnvironment::default();
        assert_eq!(env.destination, "generic/platform=iOS");
        assert_eq!(env.signing.style, SigningStyle::Automatic);
    }

    #[test]
    fn signing_style_parses_lowercase() {
        let signing: SigningConfig =
            serde_yaml::from_str("style: manual\nidentity: Apple Distribution").unwrap();
        assert_eq!(signing.style, SigningStyle::Manual);
        assert_eq!(signing.identity.as_deref(), Some("Apple Distribution"));
    }
}
