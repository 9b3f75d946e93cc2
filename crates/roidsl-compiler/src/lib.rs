//! ROI-DSL Compiler - validation, interpretation, and output generation
//!
//! The pipeline runs strictly forward:
//! raw text → Document → (validated Document, diagnostics) →
//! (Document, Insights) → output documents.
//!
//! [`Compiler::compile`] is the single synchronous entry point; it sequences
//! the stages, accumulates diagnostics, and never runs a transpiler when
//! validation produced errors.

pub mod compiler;
pub mod error;
pub mod expression;
pub mod interpreter;
pub mod transpile;
pub mod validator;

pub use compiler::{compile, CompilationResult, Compiler};
pub use error::{CompileError, Result};
pub use interpreter::interpret;
pub use validator::{validate, ValidationReport};
