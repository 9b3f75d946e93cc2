//! SMS campaign transpiler: Document → timed outbound message sequence
//!
//! Always produces the same fixed-length sequence (five messages at day
//! offsets 0, 2, 5, 8, 12), interpolating document content when present and
//! falling back to generic copy when not.

use super::{display_name, persona_object, Transpiler};
use crate::error::Result;
use roidsl_core::ast::{Document, OutputKind};
use roidsl_core::insights::UrgencyBand;
use roidsl_core::{Insights, Map, Value};

const DAY_OFFSETS: [u32; 5] = [0, 2, 5, 8, 12];

pub struct CampaignTranspiler;

impl Transpiler for CampaignTranspiler {
    fn kind(&self) -> OutputKind {
        OutputKind::SmsCampaign
    }

    fn transpile(&self, doc: &Document, insights: &Insights) -> Result<Value> {
        let mut campaign = Map::new();
        campaign.insert("campaign_type", Value::string("value_first_sms"));

        if let Some(persona) = persona_object(doc) {
            campaign.insert("persona", persona);
        }

        if let Some(top) = insights.highest_urgency() {
            let band = UrgencyBand::classify(top.value);
            let theme = match band {
                UrgencyBand::Critical | UrgencyBand::High => "risk_mitigation",
                UrgencyBand::Medium => "proactive_improvement",
                UrgencyBand::Low => "value_growth",
            };
            campaign.insert(
                "theme",
                Value::object(vec![
                    ("metric", Value::string(&top.metric)),
                    ("urgency", Value::string(band.label())),
                    ("name", Value::string(theme)),
                ]),
            );
        }

        campaign.insert("messages", Value::Array(messages(doc, insights)));

        if !doc.triggers.is_empty() {
            let triggers: Vec<Value> = doc
                .triggers
                .iter()
                .map(|t| {
                    Value::object(vec![
                        ("condition", Value::string(&t.condition)),
                        ("action", Value::string(&t.action)),
                        ("type", Value::string("metric_threshold")),
                    ])
                })
                .collect();
            campaign.insert("triggers", Value::Array(triggers));
        }

        if !doc.metrics.is_empty() {
            let mut metrics = Map::new();
            for m in &doc.metrics {
                metrics.insert(&m.key, Value::Number(m.value));
            }
            campaign.insert("metrics", Value::Object(metrics));
        }

        Ok(Value::Object(campaign))
    }
}

fn messages(doc: &Document, insights: &Insights) -> Vec<Value> {
    let primary_goal = doc
        .goals
        .first()
        .map(|g| g.description.clone())
        .unwrap_or_else(|| "improving your operations".to_string());
    let cta = doc.variants.get("CTA").unwrap_or("Get Started").to_string();

    let templates: [(u32, &str, String); 5] = [
        (
            DAY_OFFSETS[0],
            "value_proposition",
            format!("Hi {{name}}, {primary_goal}. We help with exactly this. Reply LEARN for details."),
        ),
        (
            DAY_OFFSETS[1],
            "risk_awareness",
            risk_message(insights),
        ),
        (
            DAY_OFFSETS[2],
            "proof",
            proof_message(doc, &primary_goal),
        ),
        (
            DAY_OFFSETS[3],
            "urgency",
            urgency_message(insights),
        ),
        (
            DAY_OFFSETS[4],
            "breakup",
            format!("Last note from us, {{name}}. If the timing is ever right: {cta}. [LINK]"),
        ),
    ];

    templates
        .into_iter()
        .enumerate()
        .map(|(i, (day, kind, template))| {
            Value::object(vec![
                ("sequence", Value::Number((i + 1) as f64)),
                ("day", Value::Number(day as f64)),
                ("kind", Value::string(kind)),
                ("template", Value::String(template)),
            ])
        })
        .collect()
}

fn risk_message(insights: &Insights) -> String {
    match insights.highest_urgency() {
        Some(top) => format!(
            "Your {} is at {}%. Most teams see issues at 40%+. Reply SCAN for a free assessment.",
            display_name(&top.metric),
            (top.value * 100.0).round() as i64
        ),
        None => "Most teams are carrying risk they cannot see. Reply SCAN for a free assessment."
            .to_string(),
    }
}

fn proof_message(doc: &Document, primary_goal: &str) -> String {
    match doc.case_studies.first() {
        Some(case) => format!(
            "Case in point: {}. We can walk you through how. Reply PROOF.",
            case.text
        ),
        None => format!("Teams like yours use us for exactly this: {primary_goal}. Reply PROOF."),
    }
}

fn urgency_message(insights: &Insights) -> String {
    match insights.resolved_triggers.first() {
        Some(t) => format!(
            "Heads up: once {} crosses {}, delays compound fast. Worth a quick call?",
            display_name(&t.metric),
            t.threshold
        ),
        None => "Every week of delay has a cost. Worth a quick call to measure yours?".to_string(),
    }
}
