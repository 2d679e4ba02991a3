//! User-friendly diagnostic messages.
//!
//! Every error printed by the CLI names what failed, where in the header
//! it failed, and what to change to make it work.

use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when a header uses a type the generator does not know.
    pub const UNKNOWN_TYPE: &str =
        "Declare the type in chfl-bindgen.toml (`handles` for opaque types, `structs` for manual structs)";

    /// Suggestion when the configuration file is rejected.
    pub const CHECK_CONFIG: &str = "Check chfl-bindgen.toml next to the header, or pass --config";

    /// Suggestion when generated files are out of date.
    pub const STALE_OUTPUT: &str = "Run `chfl-bindgen generate` to refresh the bindings";
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            "\x1b[1;31merror\x1b[0m"
        } else {
            "error"
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("unknown C type `chfl_thing`")
            .with_location("include/chemfiles.h")
            .with_context("used by `chfl_thing_free` (line 12)")
            .with_suggestion(suggestions::UNKNOWN_TYPE);

        let output = diag.format(false);
        assert!(output.starts_with("error: unknown C type"));
        assert!(output.contains("  --> include/chemfiles.h\n"));
        assert!(output.contains("  = used by `chfl_thing_free`"));
        assert!(output.contains("help: consider:"));
        assert!(output.contains("1. Declare the type"));
    }

    #[test]
    fn test_error_without_suggestions() {
        let output = Diagnostic::error("ffi.jl is out of date").format(false);
        assert_eq!(output, "error: ffi.jl is out of date\n");
    }
}
