//! Arithmetic formula evaluation
//!
//! Evaluates RMetric formula ASTs against the document's base metric values.
//! Failures here are recoverable: the interpreter downgrades them to
//! warnings and omits the affected computed metric.

use crate::error::{CompileError, Result};
use roidsl_core::ast::{ArithOp, Expr};
use std::collections::HashMap;

/// Evaluate an expression against a metric value map
pub fn evaluate(expr: &Expr, metrics: &HashMap<String, f64>) -> Result<f64> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::MetricRef(key) => metrics
            .get(key)
            .copied()
            .ok_or_else(|| CompileError::Evaluation(format!("undefined metric '{key}'"))),
        Expr::Binary { left, op, right } => {
            let lhs = evaluate(left, metrics)?;
            let rhs = evaluate(right, metrics)?;
            match op {
                ArithOp::Add => Ok(lhs + rhs),
                ArithOp::Sub => Ok(lhs - rhs),
                ArithOp::Mul => Ok(lhs * rhs),
                ArithOp::Div => {
                    if rhs == 0.0 {
                        Err(CompileError::Evaluation("division by zero".to_string()))
                    } else {
                        Ok(lhs / rhs)
                    }
                }
            }
        }
    }
}

/// Parse and evaluate a formula string in one step
pub fn evaluate_formula(formula: &str, metrics: &HashMap<String, f64>) -> Result<f64> {
    let expr = roidsl_parser::ExpressionParser::parse(formula)
        .map_err(|err| CompileError::Evaluation(err.to_string()))?;
    evaluate(&expr, metrics)
}
