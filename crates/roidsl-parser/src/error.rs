//! Parser error types

use thiserror::Error;

/// Parser error
///
/// Variants carrying a `line` are fatal structural errors in a `.roi` file
/// and abort parsing. Unrecognized declarations are not errors; the document
/// parser records them as non-fatal diagnostics and continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Missing or unterminated quoted value
    #[error("unterminated quoted value in '{text}'")]
    UnterminatedString { line: u32, text: String },

    /// A METRIC value or WHEN threshold failed to parse as a number
    #[error("invalid number '{value}'")]
    InvalidNumber { line: u32, value: String },

    /// A recognized keyword line with a malformed body
    #[error("invalid declaration '{text}'")]
    InvalidDeclaration { line: u32, text: String },

    /// A malformed WHEN/THEN line
    #[error("invalid trigger '{text}': {message}")]
    InvalidTrigger {
        line: u32,
        text: String,
        message: String,
    },

    /// Invalid arithmetic expression syntax
    #[error("invalid expression: {0}")]
    InvalidExpression(String),

    /// Invalid trigger condition or action syntax (outside line context)
    #[error("invalid condition '{condition}': {message}")]
    InvalidCondition { condition: String, message: String },
}

impl ParseError {
    /// The 1-based source line this error points at, when known
    pub fn line(&self) -> Option<u32> {
        match self {
            ParseError::UnterminatedString { line, .. }
            | ParseError::InvalidNumber { line, .. }
            | ParseError::InvalidDeclaration { line, .. }
            | ParseError::InvalidTrigger { line, .. } => Some(*line),
            ParseError::InvalidExpression(_) | ParseError::InvalidCondition { .. } => None,
        }
    }
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
