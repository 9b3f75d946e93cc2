//! Arithmetic expression AST for RMetric formulas
//!
//! Formulas are arithmetic over base metric identifiers, e.g.
//! `VendorDrift * 0.6 + TimelineRisk * 0.4`.

use super::operator::ArithOp;
use serde::{Deserialize, Serialize};

/// Expression AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Numeric literal
    Number(f64),

    /// Reference to a base metric by key
    MetricRef(String),

    /// Binary arithmetic operation
    Binary {
        left: Box<Expr>,
        op: ArithOp,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Create a binary expression
    pub fn binary(left: Expr, op: ArithOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Collect every metric key referenced by this expression, in order of
    /// appearance (duplicates retained)
    pub fn references(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        self.collect_references(&mut refs);
        refs
    }

    fn collect_references<'a>(&'a self, refs: &mut Vec<&'a str>) {
        match self {
            Expr::Number(_) => {}
            Expr::MetricRef(key) => refs.push(key),
            Expr::Binary { left, right, .. } => {
                left.collect_references(refs);
                right.collect_references(refs);
            }
        }
    }
}
