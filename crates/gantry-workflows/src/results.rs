//! Result structures for matrix runs and release chains
//!
//! Orchestrators exclusively own and mutate these while a run is in
//! progress; once returned to the caller they are read-only snapshots.

use serde::Serialize;

/// Tri-state outcome of one stage or matrix cell.
///
/// "Not attempted" is deliberately distinct from "failed": a destination
/// skipped because its scheme's build broke, or a pipeline stage after the
/// first failure, did not fail; it never ran. Aggregation depends on the
/// distinction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    NotAttempted,
    Succeeded,
    Failed { error: String },
}

impl StageOutcome {
    pub fn attempted(&self) -> bool {
        !matches!(self, Self::NotAttempted)
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    pub fn failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Captured error detail, present only for failures.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Outcome of one scheme × destination cell.
#[derive(Debug, Clone, Serialize)]
pub struct TestOutcome {
    pub destination: String,
    pub outcome: StageOutcome,
}

/// Aggregated result for one scheme.
///
/// An empty `tests` vector after a failed build means the destinations were
/// never attempted, not that they failed.
#[derive(Debug, Clone, Serialize)]
pub struct SchemeResult {
    pub scheme: String,
    pub build: StageOutcome,
    pub tests: Vec<TestOutcome>,
}

impl SchemeResult {
    pub fn has_failures(&self) -> bool {
        self.build.failed() || self.tests.iter().any(|t| t.outcome.failed())
    }
}

/// Result of a whole matrix run, in configuration order. Scheme names are
/// unique (duplicates are rejected at config validation).
#[derive(Debug, Clone, Default, Serialize)]
pub struct TestMatrixResult {
    schemes: Vec<SchemeResult>,
}

impl TestMatrixResult {
    pub(crate) fn record(&mut self, result: SchemeResult) {
        self.schemes.push(result);
    }

    pub fn schemes(&self) -> &[SchemeResult] {
        &self.schemes
    }

    pub fn scheme(&self, name: &str) -> Option<&SchemeResult> {
        self.schemes.iter().find(|s| s.scheme == name)
    }

    pub fn has_failures(&self) -> bool {
        self.schemes.iter().any(SchemeResult::has_failures)
    }

    /// Single human-readable summary line.
    pub fn summary(&self) -> String {
        if !self.has_failures() {
            return format!("all {} scheme(s) passed", self.schemes.len());
        }

        let parts: Vec<String> = self
            .schemes
            .iter()
            .filter(|s| s.has_failures())
            .map(|s| {
                if s.build.failed() {
                    format!("{}: build failed", s.scheme)
                } else {
                    let failed = s.tests.iter().filter(|t| t.outcome.failed()).count();
                    format!(
                        "{}: {failed} of {} destination(s) failed",
                        s.scheme,
                        s.tests.len()
                    )
                }
            })
            .collect();
        parts.join("; ")
    }
}

/// Result of one release chain.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseResult {
    pub environment: String,
    pub scheme: String,
    pub package: StageOutcome,
    pub export: StageOutcome,
    pub publish: StageOutcome,
}

impl ReleaseResult {
    pub(crate) fn new(environment: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            scheme: scheme.into(),
            package: StageOutcome::NotAttempted,
            export: StageOutcome::NotAttempted,
            publish: StageOutcome::NotAttempted,
        }
    }

    /// Stages with their display names, in chain order.
    pub fn stages(&self) -> [(&'static str, &StageOutcome); 3] {
        [
            ("package", &self.package),
            ("export", &self.export),
            ("publish", &self.publish),
        ]
    }

    pub fn has_failures(&self) -> bool {
        self.stages().iter().any(|(_, s)| s.failed())
    }

    /// True iff at least one stage was attempted and every attempted stage
    /// succeeded. A request that attempted nothing is not complete.
    pub fn is_complete(&self) -> bool {
        let attempted = self.stages().iter().filter(|(_, s)| s.attempted()).count();
        attempted > 0 && !self.has_failures()
    }

    /// Single human-readable summary line.
    pub fn summary(&self) -> String {
        let rendered: Vec<String> = self
            .stages()
            .iter()
            .map(|(name, stage)| {
                let state = match stage {
                    StageOutcome::NotAttempted => "skipped",
                    StageOutcome::Succeeded => "ok",
                    StageOutcome::Failed { .. } => "failed",
                };
                format!("{name} {state}")
            })
            .collect();
        format!("{}: {}", self.environment, rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed() -> StageOutcome {
        StageOutcome::Failed {
            error: "exit 65".to_string(),
        }
    }

    #[test]
    fn not_attempted_is_distinguishable_from_failed() {
        assert!(!StageOutcome::NotAttempted.attempted());
        assert!(!StageOutcome::NotAttempted.failed());
        assert!(failed().attempted());
        assert!(failed().failed());
        assert_eq!(failed().error(), Some("exit 65"));
        assert_eq!(StageOutcome::Succeeded.error(), None);
    }

    #[test]
    fn matrix_summary_all_passed() {
        let mut result = TestMatrixResult::default();
        result.record(SchemeResult {
            scheme: "App".to_string(),
            build: StageOutcome::Succeeded,
            tests: vec![TestOutcome {
                destination: "iPhone 15".to_string(),
                outcome: StageOutcome::Succeeded,
            }],
        });

        assert!(!result.has_failures());
        assert_eq!(result.summary(), "all 1 scheme(s) passed");
    }

    #[test]
    fn matrix_summary_names_failures() {
        let mut result = TestMatrixResult::default();
        result.record(SchemeResult {
            scheme: "App".to_string(),
            build: failed(),
            tests: vec![],
        });
        result.record(SchemeResult {
            scheme: "Widget".to_string(),
            build: StageOutcome::Succeeded,
            tests: vec![
                TestOutcome {
                    destination: "iPhone 15".to_string(),
                    outcome: failed(),
                },
                TestOutcome {
                    destination: "iPad Air".to_string(),
                    outcome: StageOutcome::Succeeded,
                },
            ],
        });

        assert!(result.has_failures());
        assert_eq!(
            result.summary(),
            "App: build failed; Widget: 1 of 2 destination(s) failed"
        );
    }

    #[test]
    fn release_completeness_requires_an_attempt() {
        let result = ReleaseResult::new("prod", "App");
        assert!(!result.is_complete());
        assert!(!result.has_failures());
    }

    #[test]
    fn archive_only_success_is_complete() {
        let mut result = ReleaseResult::new("prod", "App");
        result.package = StageOutcome::Succeeded;
        assert!(result.is_complete());
        assert!(!result.has_failures());
    }

    #[test]
    fn attempted_failure_blocks_completeness() {
        let mut result = ReleaseResult::new("prod", "App");
        result.package = StageOutcome::Succeeded;
        result.export = failed();
        assert!(!result.is_complete());
        assert!(result.has_failures());
    }
}
