//! RMetrics transpiler: Document → metrics dashboard definition

use super::{display_name, Transpiler};
use crate::error::Result;
use roidsl_core::ast::{Document, OutputKind};
use roidsl_core::{Insights, Map, Value};
use roidsl_parser::ExpressionParser;

pub struct RMetricsTranspiler;

impl Transpiler for RMetricsTranspiler {
    fn kind(&self) -> OutputKind {
        OutputKind::RMetrics
    }

    fn transpile(&self, doc: &Document, insights: &Insights) -> Result<Value> {
        let mut config = Map::new();
        config.insert("metrics_engine_version", Value::string("2.1"));

        if !doc.metrics.is_empty() {
            config.insert("base_metrics", base_metrics(doc, insights));
        }
        if !doc.computed_metrics.is_empty() {
            config.insert("computed_metrics", computed_metrics(doc, insights));
        }
        if !insights.resolved_triggers.is_empty() {
            config.insert("thresholds", thresholds(insights));
            config.insert("alerts", alerts(insights));
        }

        config.insert("panels", Value::Array(panels(doc)));

        Ok(Value::Object(config))
    }
}

fn base_metrics(doc: &Document, insights: &Insights) -> Value {
    let mut metrics = Map::new();
    for urgency in &insights.urgency {
        metrics.insert(
            &urgency.key,
            Value::object(vec![
                ("current_value", Value::Number(urgency.value)),
                ("display_name", Value::String(display_name(&urgency.key))),
                ("urgency", Value::string(urgency.band.label())),
            ]),
        );
    }
    // insights.urgency carries every base metric; fall back if a caller
    // hands us a bare Insights
    if metrics.is_empty() {
        for m in &doc.metrics {
            metrics.insert(
                &m.key,
                Value::object(vec![
                    ("current_value", Value::Number(m.value)),
                    ("display_name", Value::String(display_name(&m.key))),
                ]),
            );
        }
    }
    Value::Object(metrics)
}

fn computed_metrics(doc: &Document, insights: &Insights) -> Value {
    let mut computed = Map::new();
    for cm in &doc.computed_metrics {
        let dependencies: Vec<Value> = ExpressionParser::parse(&cm.formula)
            .map(|expr| {
                expr.references()
                    .into_iter()
                    .filter(|r| doc.has_metric(r))
                    .map(Value::string)
                    .collect()
            })
            .unwrap_or_default();

        let mut entry = Map::new();
        entry.insert("expression", Value::string(&cm.formula));
        entry.insert("dependencies", Value::Array(dependencies));
        entry.insert("display_name", Value::String(display_name(&cm.key)));
        if let Some(value) = insights.computed_value(&cm.key) {
            entry.insert("current_value", Value::Number(value));
        }
        computed.insert(&cm.key, Value::Object(entry));
    }
    Value::Object(computed)
}

fn thresholds(insights: &Insights) -> Value {
    let mut thresholds = Map::new();
    for t in &insights.resolved_triggers {
        let severity = if t.threshold > 0.5 { "high" } else { "medium" };
        thresholds.insert(
            &t.metric,
            Value::object(vec![
                ("operator", Value::string(t.comparator.symbol())),
                ("threshold", Value::Number(t.threshold)),
                ("action", Value::string(&t.action)),
                ("severity", Value::string(severity)),
            ]),
        );
    }
    Value::Object(thresholds)
}

fn alerts(insights: &Insights) -> Value {
    let items: Vec<Value> = insights
        .resolved_triggers
        .iter()
        .map(|t| {
            Value::object(vec![
                ("alert_id", Value::String(format!("alert_{}", t.metric))),
                ("metric", Value::string(&t.metric)),
                (
                    "condition",
                    Value::String(format!(
                        "{} {} {}",
                        t.metric,
                        t.comparator.symbol(),
                        t.threshold
                    )),
                ),
                ("action", Value::string(&t.action)),
                ("argument", Value::string(&t.argument)),
            ])
        })
        .collect();
    Value::Array(items)
}

fn panels(doc: &Document) -> Vec<Value> {
    let gauges = doc.metrics.iter().map(|m| {
        Value::object(vec![
            ("type", Value::string("gauge")),
            ("metric", Value::string(&m.key)),
            ("title", Value::String(display_name(&m.key))),
            (
                "thresholds",
                Value::object(vec![
                    ("warning", Value::Number(0.4)),
                    ("high", Value::Number(0.6)),
                    ("critical", Value::Number(0.8)),
                ]),
            ),
        ])
    });

    let score_cards = doc.computed_metrics.iter().map(|cm| {
        Value::object(vec![
            ("type", Value::string("score_card")),
            ("metric", Value::string(&cm.key)),
            ("title", Value::String(display_name(&cm.key))),
            ("formula", Value::string(&cm.formula)),
        ])
    });

    gauges.chain(score_cards).collect()
}
