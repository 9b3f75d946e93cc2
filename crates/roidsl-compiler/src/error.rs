//! Compiler error types

use roidsl_core::ast::OutputKind;
use thiserror::Error;

/// Compiler error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// Formula evaluation failure (division by zero, undefined reference)
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// A transpiler hit a structurally impossible input. Validation should
    /// make this unreachable; it indicates a contract violation, not a user
    /// input error.
    #[error("transpile error for {kind}: {message}")]
    Transpile { kind: OutputKind, message: String },
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;
