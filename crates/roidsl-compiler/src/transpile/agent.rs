//! Agent transpiler: Document → qualification agent configuration

use super::{display_name, persona_object, Transpiler};
use crate::error::Result;
use roidsl_core::ast::{Document, OutputKind};
use roidsl_core::{Insights, Map, Value};

/// How many top pain points become qualification questions
const TOP_PAIN_POINTS: usize = 5;

pub struct AgentTranspiler;

impl Transpiler for AgentTranspiler {
    fn kind(&self) -> OutputKind {
        OutputKind::Agent
    }

    fn transpile(&self, doc: &Document, insights: &Insights) -> Result<Value> {
        let mut agent = Map::new();
        agent.insert("agent_type", Value::string("roi_qualification_bot"));
        agent.insert(
            "persona",
            Value::object(vec![
                ("name", Value::string("ROI Qualification Assistant")),
                ("role", Value::string("value_discovery")),
                ("tone", Value::string("professional_empathetic")),
            ]),
        );

        if let Some(target) = persona_object(doc) {
            agent.insert("target_persona", target);
        }

        if !doc.goals.is_empty() {
            let goals: Vec<Value> = doc
                .goals
                .iter()
                .map(|goal| {
                    let lowered = goal.description.to_lowercase();
                    let goal_type = if lowered.contains("avoid") || lowered.contains("prevent") {
                        "pain_avoidance"
                    } else {
                        "value_gain"
                    };
                    Value::object(vec![
                        ("goal_id", Value::string(&goal.key)),
                        ("description", Value::string(&goal.description)),
                        ("type", Value::string(goal_type)),
                    ])
                })
                .collect();
            agent.insert("goals", Value::Array(goals));
        }

        agent.insert("qualification", qualification(insights));

        if !insights.resolved_triggers.is_empty() {
            let rules: Vec<Value> = insights
                .resolved_triggers
                .iter()
                .map(|t| {
                    Value::object(vec![
                        ("metric", Value::string(&t.metric)),
                        ("comparator", Value::string(t.comparator.symbol())),
                        ("threshold", Value::Number(t.threshold)),
                        ("action", Value::string(&t.action)),
                        ("argument", Value::string(&t.argument)),
                    ])
                })
                .collect();
            agent.insert("escalation_rules", Value::Array(rules));
        }

        if !doc.metrics.is_empty() {
            let mut tracking = Map::new();
            for m in &doc.metrics {
                tracking.insert(&m.key, Value::Number(m.value));
            }
            agent.insert("metrics_tracking", Value::Object(tracking));
        }

        Ok(Value::Object(agent))
    }
}

fn qualification(insights: &Insights) -> Value {
    let questions: Vec<Value> = insights
        .pain_points
        .iter()
        .take(TOP_PAIN_POINTS)
        .map(|point| {
            let key_lower = point.metric.to_lowercase();
            let weight = if key_lower.contains("risk") || key_lower.contains("drift") {
                1.5
            } else {
                1.0
            };

            let mut question = Map::new();
            question.insert("metric", Value::string(&point.metric));
            question.insert(
                "question",
                Value::String(format!(
                    "On a scale of 0-100, how would you rate your current {}?",
                    display_name(&point.metric)
                )),
            );
            question.insert("current_value", Value::Number(point.value));
            if let Some(goal) = &point.goal {
                question.insert("related_goal", Value::string(goal));
            }
            question.insert("weight", Value::Number(weight));
            Value::Object(question)
        })
        .collect();

    Value::object(vec![
        ("questions", Value::Array(questions)),
        (
            "scoring",
            Value::object(vec![
                ("high_priority_threshold", Value::Number(0.6)),
                ("medium_priority_threshold", Value::Number(0.4)),
                ("low_priority_threshold", Value::Number(0.2)),
            ]),
        ),
    ])
}
