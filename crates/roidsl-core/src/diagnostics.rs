//! Diagnostics
//!
//! Every stage of the pipeline reports problems as `Diagnostic` values
//! rather than failing on the first one, so a single run surfaces every
//! issue in a file. Only Error-severity diagnostics block compilation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// Pipeline stage that produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Parse,
    Validate,
    Interpret,
    Transpile,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Parse => "parse",
            Stage::Validate => "validate",
            Stage::Interpret => "interpret",
            Stage::Transpile => "transpile",
        }
    }
}

/// One reported problem, with an optional 1-based source line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub stage: Stage,
    pub line: Option<u32>,
    pub message: String,
}

impl Diagnostic {
    pub fn error(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            stage,
            line: None,
            message: message.into(),
        }
    }

    pub fn warning(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            stage,
            line: None,
            message: message.into(),
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match self.line {
            Some(line) => write!(
                f,
                "{}[{}] line {}: {}",
                severity,
                self.stage.label(),
                line,
                self.message
            ),
            None => write!(f, "{}[{}]: {}", severity, self.stage.label(), self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_line() {
        let diag = Diagnostic::error(Stage::Parse, "unterminated string").with_line(7);
        assert_eq!(
            diag.to_string(),
            "error[parse] line 7: unterminated string"
        );
    }

    #[test]
    fn test_display_without_line() {
        let diag = Diagnostic::warning(Stage::Validate, "no GOAL declared");
        assert_eq!(diag.to_string(), "warning[validate]: no GOAL declared");
        assert!(!diag.is_error());
    }
}
