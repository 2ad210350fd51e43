//! Rendering domain operations into xcodebuild/xcrun invocations
//!
//! Everything here is a pure function from parameters to a
//! [`CommandInvocation`]; no filesystem access, no process state.

use std::path::{Path, PathBuf};

use gantry_core::{SigningConfig, SigningStyle, UploadConfig};
use gantry_exec::CommandInvocation;

/// `-workspace` for .xcworkspace bundles, `-project` otherwise.
fn project_args(project: &Path) -> [String; 2] {
    let flag = if project.extension().is_some_and(|e| e == "xcworkspace") {
        "-workspace"
    } else {
        "-project"
    };
    [flag.to_string(), project.display().to_string()]
}

fn xcodebuild(
    project: &Path,
    scheme: &str,
    configuration: Option<&str>,
    destination: &str,
) -> CommandInvocation {
    let mut invocation = CommandInvocation::new("xcodebuild")
        .args(project_args(project))
        .args(["-scheme", scheme]);
    // xcodebuild applies the scheme's own configuration when the argument
    // is omitted
    if let Some(configuration) = configuration {
        invocation = invocation.args(["-configuration", configuration]);
    }
    invocation.args(["-destination", destination])
}

/// Compile a scheme for testing without running anything.
pub fn build_for_testing(
    project: &Path,
    scheme: &str,
    configuration: Option<&str>,
    build_destination: &str,
    build_dir: &Path,
) -> CommandInvocation {
    xcodebuild(project, scheme, configuration, build_destination)
        .arg("-derivedDataPath")
        .arg(derived_data_dir(build_dir).display().to_string())
        .arg("build-for-testing")
}

/// Run a scheme's tests against one destination, reusing the
/// build-for-testing products.
pub fn test_without_building(
    project: &Path,
    scheme: &str,
    configuration: Option<&str>,
    destination: &str,
    build_dir: &Path,
    result_bundle: &Path,
) -> CommandInvocation {
    xcodebuild(project, scheme, configuration, destination)
        .arg("-derivedDataPath")
        .arg(derived_data_dir(build_dir).display().to_string())
        .arg("-resultBundlePath")
        .arg(result_bundle.display().to_string())
        .arg("test-without-building")
}

/// Package a scheme into an .xcarchive.
pub fn archive(
    project: &Path,
    scheme: &str,
    configuration: Option<&str>,
    destination: &str,
    archive_path: &Path,
    signing: &SigningConfig,
    bundle_id: &str,
) -> CommandInvocation {
    let mut invocation = xcodebuild(project, scheme, configuration, destination)
        .arg("-archivePath")
        .arg(archive_path.display().to_string())
        .arg("archive");

    match signing.style {
        SigningStyle::Automatic => {
            invocation = invocation
                .arg("-allowProvisioningUpdates")
                .arg("CODE_SIGN_STYLE=Automatic");
        }
        SigningStyle::Manual => {
            invocation = invocation.arg("CODE_SIGN_STYLE=Manual");
            if let Some(identity) = &signing.identity {
                invocation = invocation.arg(format!("CODE_SIGN_IDENTITY={identity}"));
            }
            if let Some(profile) = signing.profiles.get(bundle_id) {
                invocation =
                    invocation.arg(format!("PROVISIONING_PROFILE_SPECIFIER={profile}"));
            }
        }
    }
    if let Some(team_id) = &signing.team_id {
        invocation = invocation.arg(format!("DEVELOPMENT_TEAM={team_id}"));
    }

    invocation
}

/// Export an .xcarchive into a distributable artifact.
///
/// Callers must remove any stale output at `export_dir` before invoking;
/// the underlying toolchain refuses to overwrite a prior export.
pub fn export_archive(
    archive_path: &Path,
    export_dir: &Path,
    export_options: &Path,
    signing_style: SigningStyle,
) -> CommandInvocation {
    let mut invocation = CommandInvocation::new("xcodebuild")
        .arg("-exportArchive")
        .arg("-archivePath")
        .arg(archive_path.display().to_string())
        .arg("-exportPath")
        .arg(export_dir.display().to_string())
        .arg("-exportOptionsPlist")
        .arg(export_options.display().to_string());
    if signing_style == SigningStyle::Automatic {
        invocation = invocation.arg("-allowProvisioningUpdates");
    }
    invocation
}

/// Submit an exported artifact to App Store Connect.
pub fn upload(ipa: &Path, upload: &UploadConfig) -> CommandInvocation {
    CommandInvocation::new("xcrun")
        .args(["altool", "--upload-app"])
        .arg("--file")
        .arg(ipa.display().to_string())
        .args(["--type", "ios"])
        .arg("--apiKey")
        .arg(upload.api_key_id.as_str())
        .arg("--apiIssuer")
        .arg(upload.api_issuer_id.as_str())
}

/// `<build_dir>/DerivedData`
pub fn derived_data_dir(build_dir: &Path) -> PathBuf {
    build_dir.join("DerivedData")
}

/// `<build_dir>/<output>.xcarchive`
pub fn archive_path(build_dir: &Path, output: &str) -> PathBuf {
    build_dir.join(format!("{output}.xcarchive"))
}

/// `<build_dir>/<output>-export`
pub fn export_dir(build_dir: &Path, output: &str) -> PathBuf {
    build_dir.join(format!("{output}-export"))
}

/// `<export_dir>/<app_name>.ipa`
pub fn ipa_path(export_dir: &Path, app_name: &str) -> PathBuf {
    export_dir.join(format!("{app_name}.ipa"))
}

/// `<report_dir>/<scheme>-<ordinal>.xcresult`
pub fn result_bundle_path(report_dir: &Path, scheme: &str, ordinal: usize) -> PathBuf {
    report_dir.join(format!("{scheme}-{ordinal}.xcresult"))
}
