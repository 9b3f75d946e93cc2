//! Semantic validator
//!
//! Walks a parsed Document and collects every rule violation instead of
//! stopping at the first. Errors block compilation; warnings are advisory.

use roidsl_core::ast::{Document, OutputKind};
use roidsl_core::diagnostics::{Diagnostic, Stage};
use roidsl_parser::{trigger, ExpressionParser};
use std::collections::{HashMap, HashSet};

/// Validation outcome: all errors and warnings found in one pass
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl ValidationReport {
    /// Returns true when no errors were found (warnings are acceptable)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a Document against the semantic rules
pub fn validate(doc: &Document) -> ValidationReport {
    let mut validator = Validator {
        doc,
        report: ValidationReport::default(),
    };
    validator.run();
    validator.report
}

struct Validator<'a> {
    doc: &'a Document,
    report: ValidationReport,
}

impl Validator<'_> {
    fn run(&mut self) {
        self.check_required_fields();
        self.check_output_selectors();
        self.check_metrics();
        self.check_goals();
        self.check_computed_metrics();
        self.check_triggers();
        self.check_naming();
        self.check_empty_values();
    }

    fn error(&mut self, message: String) {
        self.report.errors.push(Diagnostic::error(Stage::Validate, message));
    }

    fn warning(&mut self, message: String) {
        self.report
            .warnings
            .push(Diagnostic::warning(Stage::Validate, message));
    }

    fn check_required_fields(&mut self) {
        if self.doc.personas.is_empty() {
            self.error("at least one PERSONA is required".to_string());
        }
        if self.doc.goals.is_empty() {
            self.warning("no GOAL declared; downstream outputs will be sparse".to_string());
        }
    }

    fn check_output_selectors(&mut self) {
        if self.doc.output_selectors.is_empty() {
            self.error("at least one OUTPUT selector is required".to_string());
            return;
        }
        for name in &self.doc.output_selectors {
            if OutputKind::from_name(name).is_none() {
                self.error(format!("unknown OUTPUT selector '{name}'"));
            }
        }
    }

    fn check_metrics(&mut self) {
        let mut seen = HashSet::new();
        for metric in &self.doc.metrics {
            if !seen.insert(metric.key.as_str()) {
                self.error(format!("duplicate METRIC key: {}", metric.key));
            }
            if !(0.0..=1.0).contains(&metric.value) {
                self.error(format!(
                    "METRIC {} value {} is outside [0.0, 1.0]",
                    metric.key, metric.value
                ));
            }
        }
    }

    fn check_goals(&mut self) {
        let mut seen = HashSet::new();
        for goal in &self.doc.goals {
            if !seen.insert(goal.key.as_str()) {
                self.error(format!("duplicate GOAL key: {}", goal.key));
            }
        }
    }

    fn check_computed_metrics(&mut self) {
        let metric_keys: HashSet<&str> =
            self.doc.metrics.iter().map(|m| m.key.as_str()).collect();
        let computed_keys: HashSet<&str> = self
            .doc
            .computed_metrics
            .iter()
            .map(|cm| cm.key.as_str())
            .collect();

        let mut seen = HashSet::new();
        // Dependency edges between computed metrics, kept for cycle detection
        let mut graph: HashMap<&str, Vec<&str>> = HashMap::new();

        for cm in &self.doc.computed_metrics {
            if !seen.insert(cm.key.as_str()) {
                self.error(format!("duplicate RMetric key: {}", cm.key));
            }

            let expr = match ExpressionParser::parse(&cm.formula) {
                Ok(expr) => expr,
                Err(err) => {
                    self.error(format!("RMetric {} has an invalid formula: {err}", cm.key));
                    continue;
                }
            };

            let mut edges = Vec::new();
            for reference in expr.references() {
                if metric_keys.contains(reference) {
                    continue;
                }
                if let Some(&reference) = computed_keys.get(reference) {
                    // The base grammar restricts formulas to base metrics;
                    // record the edge so the cycle check below still fires.
                    self.error(format!(
                        "RMetric {} references computed metric {reference}; formulas may only reference base METRICs",
                        cm.key
                    ));
                    edges.push(reference);
                } else {
                    self.error(format!(
                        "RMetric {} references undefined METRIC: {reference}",
                        cm.key
                    ));
                }
            }
            graph.insert(cm.key.as_str(), edges);
        }

        for cycle in find_cycles(&graph) {
            self.error(format!("circular RMetric reference: {cycle}"));
        }
    }

    fn check_triggers(&mut self) {
        for t in &self.doc.triggers {
            match trigger::parse_condition(&t.condition) {
                Ok(condition) => {
                    if !self.doc.has_metric(&condition.metric) {
                        self.error(format!(
                            "trigger references undefined METRIC: {}",
                            condition.metric
                        ));
                    }
                }
                Err(err) => {
                    self.error(format!("invalid trigger condition '{}': {err}", t.condition));
                }
            }
            if let Err(err) = trigger::parse_action(&t.action) {
                self.warning(format!("trigger action '{}' may be malformed: {err}", t.action));
            }
        }
    }

    fn check_naming(&mut self) {
        let mut check = |kind: &str, key: &str, warnings: &mut Vec<Diagnostic>| {
            if !is_conservative_identifier(key) {
                warnings.push(Diagnostic::warning(
                    Stage::Validate,
                    format!(
                        "{kind} identifier '{key}' should be alphanumeric and start with a letter"
                    ),
                ));
            }
        };

        let warnings = &mut self.report.warnings;
        for p in &self.doc.personas {
            check("PERSONA", &p.name, warnings);
        }
        for g in &self.doc.goals {
            check("GOAL", &g.key, warnings);
        }
        for m in &self.doc.metrics {
            check("METRIC", &m.key, warnings);
        }
        for cm in &self.doc.computed_metrics {
            check("RMetric", &cm.key, warnings);
        }
    }

    fn check_empty_values(&mut self) {
        let empties: Vec<String> = self
            .doc
            .personas
            .iter()
            .filter(|p| p.description.is_empty())
            .map(|p| format!("PERSONA {} has an empty description", p.name))
            .chain(
                self.doc
                    .goals
                    .iter()
                    .filter(|g| g.description.is_empty())
                    .map(|g| format!("GOAL {} has an empty description", g.key)),
            )
            .chain(
                self.doc
                    .variants
                    .iter()
                    .filter(|(_, v)| v.is_empty())
                    .map(|(t, _)| format!("VARIANT {t} has an empty value")),
            )
            .collect();

        for message in empties {
            self.warning(message);
        }
    }
}

/// Conservative identifier pattern: a letter followed by alphanumerics
fn is_conservative_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric())
}

/// Depth-first cycle search over the computed-metric dependency graph.
///
/// The base grammar cannot produce multi-node cycles (metric-to-metric
/// references are rejected above), but the traversal stays in place so a
/// future extension that allows them inherits termination safety.
fn find_cycles(graph: &HashMap<&str, Vec<&str>>) -> Vec<String> {
    fn visit<'a>(
        node: &'a str,
        graph: &HashMap<&'a str, Vec<&'a str>>,
        done: &mut HashSet<&'a str>,
        path: &mut Vec<&'a str>,
        cycles: &mut Vec<String>,
    ) {
        if let Some(start) = path.iter().position(|&n| n == node) {
            let mut cycle: Vec<&str> = path[start..].to_vec();
            cycle.push(node);
            cycles.push(cycle.join(" -> "));
            return;
        }
        if done.contains(node) {
            return;
        }

        path.push(node);
        if let Some(edges) = graph.get(node) {
            for &next in edges {
                visit(next, graph, done, path, cycles);
            }
        }
        path.pop();
        done.insert(node);
    }

    let mut nodes: Vec<&str> = graph.keys().copied().collect();
    nodes.sort_unstable();

    let mut done = HashSet::new();
    let mut cycles = Vec::new();
    for node in nodes {
        visit(node, graph, &mut done, &mut Vec::new(), &mut cycles);
    }
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use roidsl_core::ast::{ComputedMetric, Goal, Metric, Persona, Trigger};

    fn base_doc() -> Document {
        let mut doc = Document::default();
        doc.personas.push(Persona {
            name: "Sponsor".to_string(),
            description: "Phase III Director".to_string(),
        });
        doc.goals.push(Goal {
            key: "DelayCost".to_string(),
            description: "Avoid $2M/mo burn".to_string(),
        });
        doc.metrics.push(Metric {
            key: "VendorDrift".to_string(),
            value: 0.45,
        });
        doc.push_output_selector("MintSite".to_string());
        doc
    }

    #[test]
    fn test_valid_document_passes() {
        let report = validate(&base_doc());
        assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn test_missing_persona_is_error() {
        let mut doc = base_doc();
        doc.personas.clear();
        let report = validate(&doc);
        assert!(!report.is_valid());
        assert!(report.errors[0].message.contains("PERSONA"));
    }

    #[test]
    fn test_missing_goals_is_warning_only() {
        let mut doc = base_doc();
        doc.goals.clear();
        let report = validate(&doc);
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.message.contains("GOAL")));
    }

    #[test]
    fn test_no_output_selector_is_error() {
        let mut doc = base_doc();
        doc.output_selectors.clear();
        let report = validate(&doc);
        assert!(!report.is_valid());
    }

    #[test]
    fn test_unknown_output_selector_is_error() {
        let mut doc = base_doc();
        doc.push_output_selector("Cloudflare".to_string());
        let report = validate(&doc);
        assert!(report
            .errors
            .iter()
            .any(|e| e.message.contains("Cloudflare")));
    }

    #[test]
    fn test_metric_out_of_range_is_error() {
        let mut doc = base_doc();
        doc.metrics.push(Metric {
            key: "Overflow".to_string(),
            value: 1.3,
        });
        let report = validate(&doc);
        let error = report
            .errors
            .iter()
            .find(|e| e.message.contains("Overflow"))
            .expect("range error expected");
        assert!(error.message.contains("1.3"));
    }

    #[test]
    fn test_duplicate_metric_is_error() {
        let mut doc = base_doc();
        doc.metrics.push(Metric {
            key: "VendorDrift".to_string(),
            value: 0.2,
        });
        let report = validate(&doc);
        assert!(report
            .errors
            .iter()
            .any(|e| e.message.contains("duplicate METRIC")));
    }

    #[test]
    fn test_trigger_with_undefined_metric_is_error() {
        let mut doc = base_doc();
        doc.triggers.push(Trigger {
            condition: "UndefinedMetric > 0.5".to_string(),
            action: "escalate(\"x\")".to_string(),
        });
        let report = validate(&doc);
        let matching: Vec<_> = report
            .errors
            .iter()
            .filter(|e| e.message.contains("UndefinedMetric"))
            .collect();
        assert_eq!(matching.len(), 1);
    }

    #[test]
    fn test_rmetric_undefined_reference_is_error() {
        let mut doc = base_doc();
        doc.computed_metrics.push(ComputedMetric {
            key: "Health".to_string(),
            formula: "VendorDrift + Ghost".to_string(),
        });
        let report = validate(&doc);
        assert!(report.errors.iter().any(|e| e.message.contains("Ghost")));
    }

    #[test]
    fn test_rmetric_self_reference_is_cycle() {
        let mut doc = base_doc();
        doc.computed_metrics.push(ComputedMetric {
            key: "Loop".to_string(),
            formula: "Loop * 0.5".to_string(),
        });
        let report = validate(&doc);
        assert!(report
            .errors
            .iter()
            .any(|e| e.message.contains("circular RMetric reference")));
    }

    #[test]
    fn test_metric_to_metric_reference_is_rejected() {
        let mut doc = base_doc();
        doc.computed_metrics.push(ComputedMetric {
            key: "First".to_string(),
            formula: "VendorDrift * 2".to_string(),
        });
        doc.computed_metrics.push(ComputedMetric {
            key: "Second".to_string(),
            formula: "First + 0.1".to_string(),
        });
        let report = validate(&doc);
        assert!(report
            .errors
            .iter()
            .any(|e| e.message.contains("may only reference base METRICs")));
    }

    #[test]
    fn test_naming_warning_does_not_block() {
        let mut doc = base_doc();
        doc.metrics.push(Metric {
            key: "snake_case".to_string(),
            value: 0.1,
        });
        let report = validate(&doc);
        assert!(report.is_valid());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.message.contains("snake_case")));
    }

    #[test]
    fn test_all_errors_collected_together() {
        let mut doc = Document::default();
        doc.metrics.push(Metric {
            key: "Bad".to_string(),
            value: 2.0,
        });
        let report = validate(&doc);
        // Missing persona, missing output, out-of-range metric all reported at once
        assert!(report.errors.len() >= 3);
    }
}
