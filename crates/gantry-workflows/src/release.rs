//! Package → export → publish release chain

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument, warn};

use gantry_core::{Config, ConfigError, ReleaseEnvironment};
use gantry_exec::{CommandRunner, OutputProcessor};
use gantry_xcode::commands;

use crate::error::{Result, WorkflowError};
use crate::results::ReleaseResult;
use crate::step::{apply_env, resolve_path, run_step, toolchain_env};

/// Stage selection flags. Precedence: `archive_only`, then `upload_only`,
/// then `skip_upload`; the CLI marks them mutually exclusive.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseOptions {
    /// Run only the package stage
    pub archive_only: bool,

    /// Run package and export, skip publish
    pub skip_upload: bool,

    /// Run only the publish stage, trusting prior artifacts
    pub upload_only: bool,
}

/// The contiguous sub-chain a request selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StageSelection {
    package: bool,
    export: bool,
    publish: bool,
}

impl StageSelection {
    fn from_options(options: &ReleaseOptions) -> Self {
        if options.archive_only {
            Self {
                package: true,
                export: false,
                publish: false,
            }
        } else if options.upload_only {
            Self {
                package: false,
                export: false,
                publish: true,
            }
        } else if options.skip_upload {
            Self {
                package: true,
                export: true,
                publish: false,
            }
        } else {
            Self {
                package: true,
                export: true,
                publish: true,
            }
        }
    }
}

/// Runs one environment's release chain.
///
/// Unlike the test matrix's independent cells, stages are hard
/// producer → consumer dependencies: an export needs the archive, an upload
/// needs the export. The chain therefore stops at the first failing stage
/// and later stages stay not-attempted.
pub struct ReleasePipeline {
    config: Config,
    working_dir: PathBuf,
    runner: Arc<dyn CommandRunner>,
    processor: OutputProcessor,
}

impl ReleasePipeline {
    pub fn new(
        config: Config,
        working_dir: impl Into<PathBuf>,
        runner: Arc<dyn CommandRunner>,
        processor: OutputProcessor,
    ) -> Self {
        Self {
            config,
            working_dir: working_dir.into(),
            runner,
            processor,
        }
    }

    /// Run the selected sub-chain for `environment`.
    ///
    /// Configuration problems (unknown environment, missing upload
    /// credentials for a selected publish stage) are fatal before any
    /// command executes; stage failures are captured in the result.
    #[instrument(skip(self, options))]
    pub async fn release(
        &self,
        environment: &str,
        options: &ReleaseOptions,
    ) -> Result<ReleaseResult> {
        let release_config = self
            .config
            .release
            .as_ref()
            .ok_or(WorkflowError::NoReleaseConfiguration)?;

        let env_config = release_config.environments.get(environment).ok_or_else(|| {
            WorkflowError::EnvironmentNotFound {
                requested: environment.to_string(),
                known: release_config.environments.keys().cloned().collect(),
            }
        })?;

        let stages = StageSelection::from_options(options);
        if stages.publish && env_config.upload.is_none() {
            return Err(ConfigError::MissingField(format!(
                "release.environments.{environment}.upload"
            ))
            .into());
        }

        let toolchain = toolchain_env(&self.config, &self.runner).await?;

        let build_dir = &self.config.paths.build_dir;
        let archive_path = commands::archive_path(build_dir, &env_config.output);
        let export_dir = commands::export_dir(build_dir, &env_config.output);

        let mut result = ReleaseResult::new(environment, &env_config.scheme);

        if stages.package {
            info!(environment, scheme = %env_config.scheme, "packaging archive");
            let invocation = apply_env(
                commands::archive(
                    &self.config.app.project,
                    &env_config.scheme,
                    env_config.configuration.as_deref(),
                    &env_config.destination,
                    &archive_path,
                    &env_config.signing,
                    &self.config.app.bundle_id,
                ),
                &toolchain,
            );
            result.package = run_step(&self.runner, &self.processor, &invocation).await?;
            if result.package.failed() {
                warn!(environment, "package stage failed, chain stopped");
                return Ok(result);
            }
        }

        if stages.export {
            info!(environment, "exporting archive");
            // The toolchain refuses to overwrite a previous export at the
            // same path.
            if !self.runner.is_dry_run() {
                remove_stale_export(&resolve_path(&self.working_dir, &export_dir)).await?;
            }
            let invocation = apply_env(
                commands::export_archive(
                    &archive_path,
                    &export_dir,
                    &env_config.export_options,
                    env_config.signing.style,
                ),
                &toolchain,
            );
            result.export = run_step(&self.runner, &self.processor, &invocation).await?;
            if result.export.failed() {
                warn!(environment, "export stage failed, chain stopped");
                return Ok(result);
            }
        }

        if stages.publish {
            info!(environment, "uploading artifact");
            let upload = upload_config(env_config, environment)?;
            let ipa = commands::ipa_path(&export_dir, &self.config.app.name);
            let invocation = apply_env(commands::upload(&ipa, upload), &toolchain);
            result.publish = run_step(&self.runner, &self.processor, &invocation).await?;
        }

        info!(environment, complete = result.is_complete(), "release chain finished");
        Ok(result)
    }
}

fn upload_config<'a>(
    env_config: &'a ReleaseEnvironment,
    environment: &str,
) -> Result<&'a gantry_core::UploadConfig> {
    env_config.upload.as_ref().ok_or_else(|| {
        ConfigError::MissingField(format!("release.environments.{environment}.upload")).into()
    })
}

/// Remove a previous export output so the toolchain starts clean.
async fn remove_stale_export(dir: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {
            info!(dir = %dir.display(), "removed stale export output");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
