//! Scheme × destination test matrix orchestration

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use gantry_core::{Config, SchemeConfig};
use gantry_exec::{CommandRunner, OutputProcessor};
use gantry_xcode::commands;

use crate::error::{Result, WorkflowError};
use crate::results::{SchemeResult, StageOutcome, TestMatrixResult, TestOutcome};
use crate::step::{apply_env, run_step, toolchain_env};

/// Options for one matrix run.
#[derive(Debug, Clone, Default)]
pub struct TestRunOptions {
    /// Subset of configured schemes to run; all of them when empty
    pub schemes: Option<Vec<String>>,

    /// Remove build and report directories before running
    pub clean: bool,

    /// Reuse existing build products instead of building first
    pub skip_build: bool,

    /// Single destination replacing every scheme's configured list
    pub destination: Option<String>,
}

/// Builds each requested scheme once, then runs its tests on every
/// destination, aggregating one outcome per cell.
///
/// Cells are independent: a destination failure never stops its siblings,
/// and a scheme's build failure only skips that scheme's destinations.
pub struct TestMatrixRunner {
    config: Config,
    working_dir: PathBuf,
    runner: Arc<dyn CommandRunner>,
    processor: OutputProcessor,
}

impl TestMatrixRunner {
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

    /// Run the matrix and return the aggregated result.
    ///
    /// Fails before any command executes when no test configuration exists
    /// or when a requested scheme is unknown; after that point command
    /// failures are captured in the result, never thrown.
    #[instrument(skip(self), fields(working_dir = %self.working_dir.display()))]
    pub async fn run(&self, options: &TestRunOptions) -> Result<TestMatrixResult> {
        let test_config = self
            .config
            .test
            .as_ref()
            .ok_or(WorkflowError::NoTestConfiguration)?;

        let resolved = resolve_schemes(&test_config.schemes, options.schemes.as_deref())?;

        if options.clean && !self.runner.is_dry_run() {
            crate::clean::clean(&self.config, &self.working_dir).await?;
        }

        let env = toolchain_env(&self.config, &self.runner).await?;

        let mut result = TestMatrixResult::default();
        for scheme in resolved {
            result.record(self.run_scheme(scheme, options, &env).await?);
        }

        info!(
            schemes = result.schemes().len(),
            failures = result.has_failures(),
            "test matrix finished"
        );
        Ok(result)
    }

    async fn run_scheme(
        &self,
        scheme: &SchemeConfig,
        options: &TestRunOptions,
        env: &Option<std::collections::BTreeMap<String, String>>,
    ) -> Result<SchemeResult> {
        let build = if options.skip_build {
            info!(scheme = %scheme.scheme, "build skipped");
            StageOutcome::NotAttempted
        } else {
            info!(scheme = %scheme.scheme, "building for testing");
            let invocation = apply_env(
                commands::build_for_testing(
                    &self.config.app.project,
                    &scheme.scheme,
                    None,
                    &scheme.build_destination,
                    &self.config.paths.build_dir,
                ),
                env,
            );
            run_step(&self.runner, &self.processor, &invocation).await?
        };

        // Destinations after a failed build are never attempted; their
        // absence from the result is the signal.
        if build.failed() {
            warn!(scheme = %scheme.scheme, "build failed, skipping destinations");
            return Ok(SchemeResult {
                scheme: scheme.scheme.clone(),
                build,
                tests: Vec::new(),
            });
        }

        let destinations: Vec<&str> = match &options.destination {
            Some(destination) => vec![destination.as_str()],
            None => scheme.destinations.iter().map(String::as_str).collect(),
        };

        let mut tests = Vec::with_capacity(destinations.len());
        for (ordinal, destination) in destinations.into_iter().enumerate() {
            info!(scheme = %scheme.scheme, destination, "running tests");
            let bundle = commands::result_bundle_path(
                &self.config.paths.report_dir,
                &scheme.scheme,
                ordinal + 1,
            );
            let invocation = apply_env(
                commands::test_without_building(
                    &self.config.app.project,
                    &scheme.scheme,
                    None,
                    destination,
                    &self.config.paths.build_dir,
                    &bundle,
                ),
                env,
            );
            let outcome = run_step(&self.runner, &self.processor, &invocation).await?;
            tests.push(TestOutcome {
                destination: destination.to_string(),
                outcome,
            });
        }

        Ok(SchemeResult {
            scheme: scheme.scheme.clone(),
            build,
            tests,
        })
    }
}

/// Resolve a requested subset against the configured schemes, preserving
/// configuration order. Any unknown name is fatal and nothing runs.
fn resolve_schemes<'a>(
    configured: &'a [SchemeConfig],
    requested: Option<&[String]>,
) -> Result<Vec<&'a SchemeConfig>> {
    match requested {
        Some(names) if !names.is_empty() => {
            let known: Vec<String> = configured.iter().map(|s| s.scheme.clone()).collect();
            let unknown: Vec<String> = names
                .iter()
                .filter(|name| !known.contains(name))
                .cloned()
                .collect();
            if !unknown.is_empty() {
                return Err(WorkflowError::SchemesNotFound {
                    requested: unknown,
                    known,
                });
            }
            Ok(configured
                .iter()
                .filter(|s| names.contains(&s.scheme))
                .collect())
        }
        _ => Ok(configured.iter().collect()),
    }
}
