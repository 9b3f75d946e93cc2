//! Interpreter
//!
//! Derives business-insight values from a validated Document: evaluated
//! computed metrics, urgency bands, pain-point ranking, resolved triggers,
//! and an overall risk score. Never fails; formula evaluation problems
//! become warnings and the affected metric is left out.

use crate::expression;
use log::debug;
use roidsl_core::ast::Document;
use roidsl_core::diagnostics::{Diagnostic, Stage};
use roidsl_core::insights::{Insights, MetricUrgency, PainPoint, UrgencyBand};
use roidsl_parser::trigger;
use std::cmp::Ordering;
use std::collections::HashMap;

const RISK_MARKERS: [&str; 4] = ["risk", "drift", "delay", "variance"];

/// Derive Insights from a Document
pub fn interpret(doc: &Document) -> Insights {
    let metric_map: HashMap<String, f64> = doc
        .metrics
        .iter()
        .map(|m| (m.key.clone(), m.value))
        .collect();

    let mut insights = Insights::default();

    for cm in &doc.computed_metrics {
        match expression::evaluate_formula(&cm.formula, &metric_map) {
            Ok(value) => insights.computed.push((cm.key.clone(), value)),
            Err(err) => insights.warnings.push(Diagnostic::warning(
                Stage::Interpret,
                format!("RMetric {} was skipped: {err}", cm.key),
            )),
        }
    }

    for metric in &doc.metrics {
        insights.urgency.push(MetricUrgency {
            key: metric.key.clone(),
            value: metric.value,
            band: UrgencyBand::classify(metric.value),
        });
    }

    insights.pain_points = rank_pain_points(doc);

    for t in &doc.triggers {
        match trigger::resolve(t) {
            Ok(resolved) => insights.resolved_triggers.push(resolved),
            // The parser syntax-checks WHEN lines, so this only fires for
            // hand-built Documents.
            Err(err) => insights.warnings.push(Diagnostic::warning(
                Stage::Interpret,
                format!("trigger '{}' was skipped: {err}", t.condition),
            )),
        }
    }

    insights.risk_score = risk_score(doc);

    debug!(
        "interpreted document: {} computed metrics, {} pain points, risk score {}",
        insights.computed.len(),
        insights.pain_points.len(),
        insights.risk_score
    );

    insights
}

/// Metrics sorted descending by value; sort is stable so ties keep source
/// order. Each is linked to a goal when the keys match by convention.
fn rank_pain_points(doc: &Document) -> Vec<PainPoint> {
    let mut points: Vec<PainPoint> = doc
        .metrics
        .iter()
        .map(|metric| PainPoint {
            metric: metric.key.clone(),
            value: metric.value,
            goal: link_goal(doc, &metric.key),
        })
        .collect();

    points.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    points
}

/// Best-effort naming-convention link from a metric to its owning goal:
/// exact key match, else either key being a prefix of the other.
fn link_goal(doc: &Document, metric_key: &str) -> Option<String> {
    if let Some(goal) = doc.goals.iter().find(|g| g.key == metric_key) {
        return Some(goal.key.clone());
    }
    doc.goals
        .iter()
        .find(|g| metric_key.starts_with(&g.key) || g.key.starts_with(metric_key))
        .map(|g| g.key.clone())
}

/// Mean of risk-flavored metrics (key contains a risk marker,
/// case-insensitive), falling back to the mean of all metrics.
/// Rounded to two decimals.
fn risk_score(doc: &Document) -> f64 {
    if doc.metrics.is_empty() {
        return 0.0;
    }

    let risk_values: Vec<f64> = doc
        .metrics
        .iter()
        .filter(|m| {
            let key = m.key.to_lowercase();
            RISK_MARKERS.iter().any(|marker| key.contains(marker))
        })
        .map(|m| m.value)
        .collect();

    let values = if risk_values.is_empty() {
        doc.metrics.iter().map(|m| m.value).collect()
    } else {
        risk_values
    };

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    (mean * 100.0).round() / 100.0
}
