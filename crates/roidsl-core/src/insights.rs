//! Interpreter insight types
//!
//! `Insights` is the derived-value bundle the interpreter produces from a
//! validated Document. It plays the role of an intermediate representation:
//! transpilers read it alongside the Document and never mutate it.

use crate::ast::Comparator;
use crate::diagnostics::Diagnostic;
use serde::{Deserialize, Serialize};

/// Coarse urgency classification of a metric value in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrgencyBand {
    Low,
    Medium,
    High,
    Critical,
}

impl UrgencyBand {
    /// Classify a metric value at the fixed cut points 0.4 / 0.6 / 0.8.
    /// These are the same thresholds WHEN triggers conventionally use.
    pub fn classify(value: f64) -> Self {
        if value < 0.4 {
            UrgencyBand::Low
        } else if value < 0.6 {
            UrgencyBand::Medium
        } else if value < 0.8 {
            UrgencyBand::High
        } else {
            UrgencyBand::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UrgencyBand::Low => "low",
            UrgencyBand::Medium => "medium",
            UrgencyBand::High => "high",
            UrgencyBand::Critical => "critical",
        }
    }
}

/// A base metric with its urgency classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricUrgency {
    pub key: String,
    pub value: f64,
    pub band: UrgencyBand,
}

/// A metric ranked by severity, linked to its owning goal when a naming
/// convention connects them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PainPoint {
    pub metric: String,
    pub value: f64,
    pub goal: Option<String>,
}

/// A WHEN trigger resolved into structured form. Triggers are compiled, not
/// evaluated; evaluation against live data belongs to downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTrigger {
    pub metric: String,
    pub comparator: Comparator,
    pub threshold: f64,
    pub action: String,
    pub argument: String,
}

/// Derived business-insight values for one Document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Insights {
    /// Evaluated RMetric values in declaration order; formulas that failed
    /// to evaluate are omitted (and reported in `warnings`)
    pub computed: Vec<(String, f64)>,
    /// Urgency classification per base metric, in declaration order
    pub urgency: Vec<MetricUrgency>,
    /// Metrics sorted descending by value (stable on ties)
    pub pain_points: Vec<PainPoint>,
    /// Structured triggers in declaration order
    pub resolved_triggers: Vec<ResolvedTrigger>,
    /// Mean of risk-flavored metrics, falling back to mean of all metrics
    pub risk_score: f64,
    /// Non-fatal interpreter warnings (formula evaluation failures)
    pub warnings: Vec<Diagnostic>,
}

impl Insights {
    /// Evaluated value of a computed metric
    pub fn computed_value(&self, key: &str) -> Option<f64> {
        self.computed
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    /// The most urgent metric (highest value), if any
    pub fn highest_urgency(&self) -> Option<&PainPoint> {
        self.pain_points.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_band_cut_points() {
        assert_eq!(UrgencyBand::classify(0.0), UrgencyBand::Low);
        assert_eq!(UrgencyBand::classify(0.39), UrgencyBand::Low);
        assert_eq!(UrgencyBand::classify(0.4), UrgencyBand::Medium);
        assert_eq!(UrgencyBand::classify(0.59), UrgencyBand::Medium);
        assert_eq!(UrgencyBand::classify(0.6), UrgencyBand::High);
        assert_eq!(UrgencyBand::classify(0.79), UrgencyBand::High);
        assert_eq!(UrgencyBand::classify(0.8), UrgencyBand::Critical);
        assert_eq!(UrgencyBand::classify(1.0), UrgencyBand::Critical);
    }

    #[test]
    fn test_computed_value_lookup() {
        let insights = Insights {
            computed: vec![("StudyHealth".to_string(), 0.62)],
            ..Default::default()
        };
        assert_eq!(insights.computed_value("StudyHealth"), Some(0.62));
        assert_eq!(insights.computed_value("Other"), None);
    }
}
