//! SK skill transpiler: Document → compact semantic-skill text descriptor
//!
//! Unlike the JSON-shaped outputs, the skill descriptor is a flat
//! `key=value` text block meant for keyword-matching pipelines. The
//! value tree carries it as a single `content` string; the boundary
//! layer writes it out verbatim as a `.txt` file.

use std::fmt::Write as _;

use super::Transpiler;
use crate::error::Result;
use roidsl_core::ast::{Document, OutputKind};
use roidsl_core::{Insights, Map, Value};

pub struct SkillTranspiler;

impl Transpiler for SkillTranspiler {
    fn kind(&self) -> OutputKind {
        OutputKind::SkSkill
    }

    fn transpile(&self, doc: &Document, insights: &Insights) -> Result<Value> {
        let mut content = String::new();

        if let Some(persona) = doc.primary_persona() {
            let _ = writeln!(content, "persona={}", persona.name);
            let _ = writeln!(content, "persona_description={}", persona.description);
        }

        for goal in &doc.goals {
            let _ = writeln!(content, "goal.{}={}", goal.key, goal.description);
        }

        for metric in &doc.metrics {
            let _ = writeln!(content, "metric.{}={}", metric.key, metric.value);
        }

        for (key, value) in &insights.computed {
            let _ = writeln!(content, "computed.{key}={value}");
        }

        if !doc.metrics.is_empty() {
            let _ = writeln!(content, "risk_score={}", insights.risk_score);
        }

        if !doc.sk_tags.is_empty() {
            let _ = writeln!(content, "tags={}", doc.sk_tags.join(","));
        }

        let mut descriptor = Map::new();
        descriptor.insert("skill_type", Value::string("semantic_skill"));
        descriptor.insert("content", Value::string(content));
        Ok(Value::Object(descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::interpret;
    use roidsl_parser::parse;

    fn content_of(value: &Value) -> String {
        value
            .as_object()
            .unwrap()
            .get("content")
            .unwrap()
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_flattens_persona_goals_and_metrics() {
        let source = r#"
PERSONA Sponsor: "Phase III Program Director"
GOAL ReduceDrift: "Cut vendor slippage"
METRIC VendorDrift: 0.45
SK_TAG: "clinical"
SK_TAG: "vendor_oversight"
OUTPUT SK_SKILL
"#;
        let doc = parse(source).unwrap().document;
        let insights = interpret(&doc);
        let value = SkillTranspiler.transpile(&doc, &insights).unwrap();

        let content = content_of(&value);
        assert!(content.contains("persona=Sponsor\n"));
        assert!(content.contains("goal.ReduceDrift=Cut vendor slippage\n"));
        assert!(content.contains("metric.VendorDrift=0.45\n"));
        assert!(content.contains("tags=clinical,vendor_oversight\n"));
    }

    #[test]
    fn test_includes_computed_metrics_and_risk_score() {
        let source = r#"
PERSONA Sponsor: "Director"
METRIC VendorDrift: 0.5
METRIC TimelineRisk: 0.5
RMetric Composite: "VendorDrift * 0.6 + TimelineRisk * 0.4"
OUTPUT SK_SKILL
"#;
        let doc = parse(source).unwrap().document;
        let insights = interpret(&doc);
        let content = content_of(&SkillTranspiler.transpile(&doc, &insights).unwrap());

        assert!(content.contains("computed.Composite=0.5\n"));
        assert!(content.contains("risk_score=0.5\n"));
    }

    #[test]
    fn test_empty_document_yields_empty_content() {
        let doc = Document::default();
        let insights = interpret(&doc);
        let value = SkillTranspiler.transpile(&doc, &insights).unwrap();
        assert_eq!(content_of(&value), "");
    }
}
