//! Exit codes for the CLI

use gantry_core::ConfigError;
use gantry_workflows::WorkflowError;

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error (unknown scheme/environment, missing section)
pub const CONFIG_ERROR: i32 = 2;

/// Toolchain error (no matching Xcode installation)
pub const TOOLCHAIN_ERROR: i32 = 3;

/// The operation ran but reported failures
pub const FAILURES: i32 = 10;

/// Map an error bubbling out of a command to an exit code.
pub fn from_error(error: &anyhow::Error) -> i32 {
    if let Some(workflow) = error.downcast_ref::<WorkflowError>() {
        return match workflow {
            WorkflowError::NoTestConfiguration
            | WorkflowError::SchemesNotFound { .. }
            | WorkflowError::NoReleaseConfiguration
            | WorkflowError::EnvironmentNotFound { .. }
            | WorkflowError::Config(_) => CONFIG_ERROR,
            WorkflowError::Toolchain(_) => TOOLCHAIN_ERROR,
            WorkflowError::Exec(_) | WorkflowError::Io(_) => ERROR,
        };
    }
    if error.downcast_ref::<ConfigError>().is_some() {
        return CONFIG_ERROR;
    }
    ERROR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_config_errors_map_to_config_exit() {
        let err = anyhow::Error::new(WorkflowError::NoTestConfiguration);
        assert_eq!(from_error(&err), CONFIG_ERROR);

        let err = anyhow::Error::new(WorkflowError::SchemesNotFound {
            requested: vec!["Unknown".to_string()],
            known: vec!["App".to_string()],
        });
        assert_eq!(from_error(&err), CONFIG_ERROR);
    }

    #[test]
    fn toolchain_errors_map_to_toolchain_exit() {
        let err = anyhow::Error::new(WorkflowError::Toolchain(
            gantry_xcode::XcodeError::ToolchainVersionNotFound {
                requested: "16.0".to_string(),
                available: vec!["15.4".to_string()],
            },
        ));
        assert_eq!(from_error(&err), TOOLCHAIN_ERROR);
    }

    #[test]
    fn unrecognized_errors_are_general() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(from_error(&err), ERROR);
    }
}
