//! ROI-DSL Core - Core types for the ROI-DSL compiler
//!
//! This crate provides the fundamental types used across the ROI-DSL toolchain:
//! - Value types for output document trees
//! - Document (AST) definitions for parsed `.roi` files
//! - Arithmetic expression definitions for RMetric formulas
//! - Diagnostics and interpreter insight types

pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod insights;
pub mod types;

// Re-export commonly used types
pub use ast::Document;
pub use diagnostics::{Diagnostic, Severity, Stage};
pub use error::CoreError;
pub use insights::Insights;
pub use types::{Map, Value};
