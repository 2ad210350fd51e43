//! Command descriptions and captured results

use std::collections::BTreeMap;

use serde::Serialize;

/// An immutable description of one external command.
///
/// Constructed per call. The working directory is not part of the
/// invocation; it belongs to the executor, which is bound to exactly one
/// directory for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandInvocation {
    /// Program name or path
    pub program: String,

    /// Ordered argument list
    pub args: Vec<String>,

    /// Environment overrides applied on top of the inherited environment
    pub env: Option<BTreeMap<String, String>>,
}

impl CommandInvocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add environment overrides, merging into any already present.
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let env = self.env.get_or_insert_with(BTreeMap::new);
        env.extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Shell-style rendering for logs and dry-run output.
    ///
    /// Environment overrides are shown as `KEY=value` prefixes; arguments
    /// containing whitespace are single-quoted.
    pub fn render(&self) -> String {
        let mut parts = Vec::new();
        if let Some(env) = &self.env {
            for (key, value) in env {
                parts.push(format!("{key}={}", quote(value)));
            }
        }
        parts.push(quote(&self.program));
        parts.extend(self.args.iter().map(|a| quote(a)));
        parts.join(" ")
    }
}

fn quote(s: &str) -> String {
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        format!("'{s}'")
    } else {
        s.to_string()
    }
}

/// The captured result of one completed invocation. Never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    /// Process exit code (-1 when terminated by a signal)
    pub exit_code: i32,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,

    /// Both streams' lines in arrival order
    pub combined: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Synthetic outcome for dry-run mode, indistinguishable from a command
    /// that succeeded without producing output.
    pub fn dry_run() -> Self {
        Self {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
            combined: String::new(),
        }
    }
}
