//! ROI-DSL Parser - turns `.roi` source text into a Document AST
//!
//! Three parsers live here:
//! - [`DocumentParser`]: line-oriented parser for whole `.roi` files
//! - [`ExpressionParser`]: arithmetic RMetric formulas
//! - [`trigger`]: WHEN/THEN condition and action-call strings

pub mod document_parser;
pub mod error;
pub mod expression_parser;
pub mod trigger;

pub use document_parser::{parse, DocumentParser, Parsed};
pub use error::{ParseError, Result};
pub use expression_parser::ExpressionParser;
