//! AST definitions for parsed `.roi` documents

pub mod document;
pub mod expression;
pub mod operator;
pub mod output;

pub use document::{
    ComputedMetric, Contact, ContentBlock, Document, FieldSpec, Goal, Metric, Persona, Seo,
    Trigger, VariantMap,
};
pub use expression::Expr;
pub use operator::{ArithOp, Comparator};
pub use output::OutputKind;
