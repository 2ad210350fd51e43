//! Scripted command runner for orchestrator tests

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use gantry_core::{
    AppConfig, Config, ReleaseConfig, ReleaseEnvironment, SchemeConfig, SigningConfig,
    SigningStyle, TestConfig, ToolchainConfig, UploadConfig,
};
use gantry_exec::{CommandInvocation, CommandOutcome, CommandRunner, ExecError};

type Decider = dyn Fn(&CommandInvocation) -> bool + Send + Sync;

/// Runner double that records every invocation and fails the ones a
/// predicate selects, without spawning anything.
///
/// Reports itself as dry-run so orchestrators skip toolchain discovery and
/// filesystem side effects; scripted failures still flow through
/// aggregation like real non-zero exits.
pub(crate) struct ScriptedRunner {
    should_fail: Box<Decider>,
    invocations: Mutex<Vec<CommandInvocation>>,
}

impl ScriptedRunner {
    pub(crate) fn recorded(&self) -> Vec<CommandInvocation> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run_streaming(
        &self,
        invocation: &CommandInvocation,
        on_line: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<CommandOutcome, ExecError> {
        self.invocations.lock().unwrap().push(invocation.clone());

        if (self.should_fail)(invocation) {
            on_line("error: scripted failure");
            Ok(CommandOutcome {
                exit_code: 65,
                stdout: String::new(),
                stderr: "error: scripted failure\n".to_string(),
                combined: "error: scripted failure\n".to_string(),
            })
        } else {
            Ok(CommandOutcome::dry_run())
        }
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

/// Runner on which every command succeeds.
pub(crate) fn scripted_ok() -> Arc<ScriptedRunner> {
    scripted_failing(|_| false)
}

/// Runner failing exactly the invocations the predicate selects.
pub(crate) fn scripted_failing(
    should_fail: impl Fn(&CommandInvocation) -> bool + Send + Sync + 'static,
) -> Arc<ScriptedRunner> {
    Arc::new(ScriptedRunner {
        should_fail: Box::new(should_fail),
        invocations: Mutex::new(Vec::new()),
    })
}

const SIM_15: &str = "platform=iOS Simulator,name=iPhone 15";
const SIM_AIR: &str = "platform=iOS Simulator,name=iPad Air";

/// Two schemes with two destinations each, plus two release environments.
pub(crate) fn test_config() -> Config {
    let scheme = |name: &str| SchemeConfig {
        scheme: name.to_string(),
        build_destination: SIM_15.to_string(),
        destinations: vec![SIM_15.to_string(), SIM_AIR.to_string()],
    };

    let environment = |configuration: &str| ReleaseEnvironment {
        scheme: "App".to_string(),
        configuration: Some(configuration.to_string()),
        output: "Demo".to_string(),
        destination: "generic/platform=iOS".to_string(),
        export_options: PathBuf::from("ExportOptions.plist"),
        signing: SigningConfig {
            style: SigningStyle::Automatic,
            identity: None,
            team_id: Some("ABCDE12345".to_string()),
            profiles: Default::default(),
        },
        upload: Some(UploadConfig {
            api_key_id: "KEY123".to_string(),
            api_issuer_id: "ISSUER456".to_string(),
        }),
    };

    Config {
        app: AppConfig {
            name: "Demo".to_string(),
            bundle_id: "com.example.demo".to_string(),
            project: PathBuf::from("Demo.xcodeproj"),
        },
        toolchain: ToolchainConfig {
            version: "16.0".to_string(),
        },
        paths: Default::default(),
        test: Some(TestConfig {
            schemes: vec![scheme("App"), scheme("Widget")],
        }),
        release: Some(ReleaseConfig {
            environments: [
                ("beta".to_string(), environment("Beta")),
                ("prod".to_string(), environment("Release")),
            ]
            .into(),
        }),
    }
}
