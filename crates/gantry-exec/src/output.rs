//! Output classification and beautification
//!
//! A long toolchain run produces thousands of routine lines. The processor
//! keeps the default console stream terse while guaranteeing that errors,
//! warnings and test failures are always shown live; `--verbose` reveals the
//! full formatted trace.

/// Capability interface for line beautification.
///
/// Implementations turn a raw toolchain output line into a display form, or
/// return `None` for lines they do not recognize. Injected rather than
/// hard-coded so a no-op double can stand in.
pub trait LineFormatter: Send + Sync {
    fn format_line(&self, raw: &str) -> Option<String>;
}

/// Pass-through formatter: recognizes every line unchanged.
#[derive(Debug, Default)]
pub struct PlainFormatter;

impl LineFormatter for PlainFormatter {
    fn format_line(&self, raw: &str) -> Option<String> {
        Some(raw.to_string())
    }
}

/// Beautifier for the common xcodebuild line shapes.
#[derive(Debug, Default)]
pub struct XcodebuildFormatter;

impl LineFormatter for XcodebuildFormatter {
    fn format_line(&self, raw: &str) -> Option<String> {
        let line = raw.trim_end();
        let trimmed = line.trim_start();

        // Result banners: "** BUILD SUCCEEDED **", "** TEST FAILED **", ...
        if trimmed.starts_with("**") && trimmed.ends_with("**") {
            return Some(trimmed.trim_matches('*').trim().to_string());
        }

        // Compiler diagnostics pass through untouched.
        if trimmed.contains("error:") || trimmed.contains("warning:") {
            return Some(trimmed.to_string());
        }

        // Test Case '-[AppTests testLogin]' passed (0.003 seconds).
        if let Some(rest) = trimmed.strip_prefix("Test Case '") {
            let (name, rest) = rest.split_once('\'')?;
            let rest = rest.trim().trim_end_matches('.');
            return if rest.starts_with("passed") {
                Some(format!("✓ {name} {}", rest.trim_start_matches("passed").trim()))
            } else if rest.starts_with("failed") {
                Some(format!("✗ {name} {}", rest.trim_start_matches("failed").trim()))
            } else {
                // "started" lines add nothing over the pass/fail line
                None
            };
        }

        if let Some(rest) = trimmed.strip_prefix("Test Suite '") {
            let (name, rest) = rest.split_once('\'')?;
            return if rest.contains("failed") {
                Some(format!("Suite {name} failed"))
            } else if rest.contains("passed") {
                Some(format!("Suite {name} passed"))
            } else {
                None
            };
        }

        // Build steps: "CompileSwift normal arm64 /path/File.swift (in target ...)"
        for (prefix, verb) in [
            ("CompileSwift ", "Compiling"),
            ("CompileC ", "Compiling"),
            ("SwiftCompile ", "Compiling"),
            ("Ld ", "Linking"),
            ("CodeSign ", "Signing"),
            ("ProcessInfoPlistFile ", "Processing"),
            ("CopySwiftLibs ", "Copying"),
        ] {
            if let Some(rest) = trimmed.strip_prefix(prefix) {
                if let Some(subject) = step_subject(rest) {
                    return Some(format!("{verb} {subject}"));
                }
            }
        }

        None
    }
}

/// Last path component of the first path-looking token in a build step line.
fn step_subject(rest: &str) -> Option<String> {
    rest.split_whitespace()
        .find(|token| token.contains('/'))
        .and_then(|token| token.rsplit('/').next())
        .map(String::from)
}

/// Decides, per verbosity mode, whether a line is displayed.
pub struct OutputProcessor {
    formatter: Box<dyn LineFormatter>,
    verbose: bool,
    preserve_unrecognized: bool,
}

impl OutputProcessor {
    pub fn new(formatter: Box<dyn LineFormatter>) -> Self {
        Self {
            formatter,
            verbose: false,
            preserve_unrecognized: false,
        }
    }

    /// In verbose mode every formatted line is shown.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// In verbose mode, also show lines the formatter does not recognize,
    /// unchanged.
    pub fn with_preserve_unrecognized(mut self, preserve: bool) -> Self {
        self.preserve_unrecognized = preserve;
        self
    }

    /// Format and classify one raw line; `None` means suppressed.
    pub fn process_line(&self, raw: &str) -> Option<String> {
        if raw.is_empty() {
            return None;
        }

        match self.formatter.format_line(raw) {
            Some(formatted) => {
                if self.verbose || is_important(&formatted) {
                    Some(formatted)
                } else {
                    None
                }
            }
            None => {
                if self.verbose && self.preserve_unrecognized {
                    Some(raw.to_string())
                } else {
                    None
                }
            }
        }
    }
}

/// Errors, warnings and test failures are always displayed.
fn is_important(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    lower.contains("error") || lower.contains("warning") || lower.contains("fail")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UnrecognizingFormatter;

    impl LineFormatter for UnrecognizingFormatter {
        fn format_line(&self, _raw: &str) -> Option<String> {
            None
        }
    }

    fn quiet() -> OutputProcessor {
        OutputProcessor::new(Box::new(PlainFormatter))
    }

    #[test]
    fn empty_lines_are_always_suppressed() {
        let processor = quiet().with_verbose(true).with_preserve_unrecognized(true);
        assert_eq!(processor.process_line(""), None);
    }

    #[test]
    fn quiet_mode_suppresses_routine_lines() {
        let processor = quiet();
        assert_eq!(processor.process_line("Compiling main.swift"), None);
    }

    #[test]
    fn quiet_mode_shows_errors_warnings_and_failures() {
        let processor = quiet();
        for line in [
            "main.swift:3:1: error: use of unresolved identifier",
            "main.swift:9:5: warning: unused variable",
            "✗ -[AppTests testLogin] (0.120 seconds)... failed",
        ] {
            assert_eq!(processor.process_line(line), Some(line.to_string()));
        }
    }

    #[test]
    fn verbose_mode_shows_everything_recognized() {
        let processor = quiet().with_verbose(true);
        assert_eq!(
            processor.process_line("Compiling main.swift"),
            Some("Compiling main.swift".to_string())
        );
    }

    #[test]
    fn unrecognized_lines_need_verbose_and_preserve() {
        let raw = "some inscrutable toolchain chatter";

        let verbose_only =
            OutputProcessor::new(Box::new(UnrecognizingFormatter)).with_verbose(true);
        assert_eq!(verbose_only.process_line(raw), None);

        let preserving = OutputProcessor::new(Box::new(UnrecognizingFormatter))
            .with_verbose(true)
            .with_preserve_unrecognized(true);
        assert_eq!(preserving.process_line(raw), Some(raw.to_string()));

        let quiet_preserving = OutputProcessor::new(Box::new(UnrecognizingFormatter))
            .with_preserve_unrecognized(true);
        assert_eq!(quiet_preserving.process_line(raw), None);
    }

    #[test]
    fn xcodebuild_formatter_banners() {
        let formatter = XcodebuildFormatter;
        assert_eq!(
            formatter.format_line("** BUILD SUCCEEDED **"),
            Some("BUILD SUCCEEDED".to_string())
        );
        assert_eq!(
            formatter.format_line("** ARCHIVE FAILED **"),
            Some("ARCHIVE FAILED".to_string())
        );
    }

    #[test]
    fn xcodebuild_formatter_test_cases() {
        let formatter = XcodebuildFormatter;
        assert_eq!(
            formatter.format_line("Test Case '-[AppTests testLogin]' passed (0.003 seconds)."),
            Some("✓ -[AppTests testLogin] (0.003 seconds)".to_string())
        );
        assert_eq!(
            formatter.format_line("Test Case '-[AppTests testSync]' failed (1.2 seconds)."),
            Some("✗ -[AppTests testSync] (1.2 seconds)".to_string())
        );
        assert_eq!(
            formatter.format_line("Test Case '-[AppTests testSync]' started."),
            None
        );
    }

    #[test]
    fn xcodebuild_formatter_build_steps() {
        let formatter = XcodebuildFormatter;
        assert_eq!(
            formatter.format_line(
                "CompileSwift normal arm64 /tmp/Sources/App/Login.swift (in target 'App')"
            ),
            Some("Compiling Login.swift".to_string())
        );
        assert_eq!(
            formatter.format_line("Ld /tmp/Build/Products/Debug-iphonesimulator/App.app/App normal"),
            Some("Linking App".to_string())
        );
        assert_eq!(formatter.format_line("note: Using new build system"), None);
    }

    #[test]
    fn failed_banner_is_important_in_quiet_mode() {
        let processor = OutputProcessor::new(Box::new(XcodebuildFormatter));
        assert_eq!(
            processor.process_line("** TEST FAILED **"),
            Some("TEST FAILED".to_string())
        );
        assert_eq!(processor.process_line("** TEST SUCCEEDED **"), None);
    }
}
