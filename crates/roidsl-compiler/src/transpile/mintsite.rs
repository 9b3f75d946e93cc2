//! MintSite transpiler: Document → static site configuration

use super::{content_map, display_name, persona_object, Transpiler};
use crate::error::Result;
use roidsl_core::ast::{Document, OutputKind};
use roidsl_core::insights::UrgencyBand;
use roidsl_core::{Insights, Map, Value};

pub struct MintSiteTranspiler;

impl Transpiler for MintSiteTranspiler {
    fn kind(&self) -> OutputKind {
        OutputKind::MintSite
    }

    fn transpile(&self, doc: &Document, insights: &Insights) -> Result<Value> {
        let mut site = Map::new();
        site.insert("site_version", Value::string("2.1"));

        if let Some(persona) = persona_object(doc) {
            site.insert("persona", persona);
        }

        site.insert("value_framework", value_framework(doc, insights));

        if !doc.triggers.is_empty() {
            let triggers: Vec<Value> = doc
                .triggers
                .iter()
                .map(|t| {
                    Value::object(vec![
                        ("condition", Value::string(&t.condition)),
                        ("action", Value::string(&t.action)),
                        ("type", Value::string("threshold_alert")),
                    ])
                })
                .collect();
            site.insert(
                "automation",
                Value::object(vec![("triggers", Value::Array(triggers))]),
            );
        }

        if !doc.variants.is_empty() {
            let mut variants = Map::new();
            for (variant_type, text) in doc.variants.iter() {
                variants.insert(variant_type, Value::string(text));
            }
            site.insert("page_variants", Value::Object(variants));
        }

        if let Some(hero) = hero_section(doc) {
            site.insert("hero_section", hero);
        }

        if !doc.goals.is_empty() {
            let props: Vec<Value> = doc
                .goals
                .iter()
                .map(|goal| {
                    let quantified =
                        goal.description.contains('$') || goal.description.contains('%');
                    Value::object(vec![
                        ("title", Value::string(&goal.key)),
                        ("description", Value::string(&goal.description)),
                        ("quantified", Value::Bool(quantified)),
                    ])
                })
                .collect();
            site.insert("value_props", Value::Array(props));
        }

        if !doc.credentials.is_empty() {
            site.insert("credentials", content_map(&doc.credentials));
        }
        if !doc.case_studies.is_empty() {
            site.insert("case_studies", content_map(&doc.case_studies));
        }
        if !doc.services.is_empty() {
            site.insert("services", content_map(&doc.services));
        }
        if !doc.stats.is_empty() {
            site.insert("stats", content_map(&doc.stats));
        }

        site.insert("cta", cta_section(doc, insights));

        if !doc.seo.is_empty() {
            let mut seo = Map::new();
            if let Some(title) = &doc.seo.title {
                seo.insert("title", Value::string(title));
            }
            if let Some(description) = &doc.seo.description {
                seo.insert("meta_description", Value::string(description));
            }
            if let Some(keywords) = &doc.seo.keywords {
                seo.insert("keywords", Value::string(keywords));
            }
            site.insert("seo", Value::Object(seo));
        }

        if !doc.contact.is_empty() {
            let mut contact = Map::new();
            if let Some(name) = &doc.contact.name {
                contact.insert("name", Value::string(name));
            }
            if let Some(email) = &doc.contact.email {
                contact.insert("email", Value::string(email));
            }
            if let Some(location) = &doc.contact.location {
                contact.insert("location", Value::string(location));
            }
            site.insert("contact", Value::Object(contact));
        }

        Ok(Value::Object(site))
    }
}

fn value_framework(doc: &Document, insights: &Insights) -> Value {
    let pillars: Vec<Value> = doc
        .goals
        .iter()
        .map(|g| {
            Value::object(vec![
                ("name", Value::string(&g.key)),
                ("value", Value::string(&g.description)),
            ])
        })
        .collect();

    let mut metrics = Map::new();
    for m in &doc.metrics {
        metrics.insert(&m.key, Value::Number(m.value));
    }

    let mut formulas = Map::new();
    for cm in &doc.computed_metrics {
        formulas.insert(&cm.key, Value::string(&cm.formula));
    }

    let mut computed_values = Map::new();
    for (key, value) in &insights.computed {
        computed_values.insert(key, Value::Number(*value));
    }

    Value::object(vec![
        ("pillars", Value::Array(pillars)),
        ("metrics", Value::Object(metrics)),
        ("computed_metrics", Value::Object(formulas)),
        ("computed_values", Value::Object(computed_values)),
        ("risk_score", Value::Number(insights.risk_score)),
    ])
}

fn hero_section(doc: &Document) -> Option<Value> {
    let headline = doc
        .variants
        .get("Hero")
        .map(str::to_string)
        .or_else(|| doc.primary_persona().map(|p| p.description.clone()))?;

    let mut hero = Map::new();
    hero.insert("headline", Value::String(headline));
    if let Some(goal) = doc.goals.first() {
        hero.insert("subheadline", Value::string(&goal.description));
    }
    hero.insert(
        "cta_primary",
        Value::string(doc.variants.get("CTA").unwrap_or("Get Started")),
    );
    Some(Value::Object(hero))
}

fn cta_section(doc: &Document, insights: &Insights) -> Value {
    let mut cta = Map::new();
    cta.insert(
        "primary_text",
        Value::string(doc.variants.get("CTA").unwrap_or("Schedule Consultation")),
    );
    cta.insert("secondary_text", Value::string("Learn More"));

    // Urgency message from the most severe metric, when one is High/Critical
    if let Some(top) = insights.highest_urgency() {
        let band = UrgencyBand::classify(top.value);
        if matches!(band, UrgencyBand::High | UrgencyBand::Critical) {
            cta.insert(
                "urgency_message",
                Value::String(format!(
                    "High {} detected - take action now",
                    display_name(&top.metric)
                )),
            );
        }
    }

    Value::Object(cta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::interpret;
    use roidsl_parser::parse;

    fn run(source: &str) -> Value {
        let doc = parse(source).unwrap().document;
        let insights = interpret(&doc);
        MintSiteTranspiler.transpile(&doc, &insights).unwrap()
    }

    #[test]
    fn test_goals_become_ordered_pillars() {
        let site = run(
            "PERSONA A: \"x\"\nGOAL First: \"one\"\nGOAL Second: \"two $5K\"\nOUTPUT MintSite",
        );
        let framework = site.as_object().unwrap().get("value_framework").unwrap();
        let pillars = framework.as_object().unwrap().get("pillars").unwrap();
        let names: Vec<&str> = pillars
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p.as_object().unwrap().get("name").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_hero_prefers_variant_over_persona() {
        let site = run("PERSONA A: \"persona text\"\nVARIANT Hero: \"hero text\"\nOUTPUT MintSite");
        let hero = site.as_object().unwrap().get("hero_section").unwrap();
        assert_eq!(
            hero.as_object().unwrap().get("headline").unwrap().as_str(),
            Some("hero text")
        );
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let site = run("PERSONA A: \"x\"\nOUTPUT MintSite");
        let map = site.as_object().unwrap();
        assert!(map.get("automation").is_none());
        assert!(map.get("case_studies").is_none());
        assert!(map.get("seo").is_none());
        assert!(map.get("value_props").is_none());
    }

    #[test]
    fn test_urgency_message_for_high_metric() {
        let site = run("PERSONA A: \"x\"\nMETRIC VendorDrift: 0.85\nOUTPUT MintSite");
        let cta = site.as_object().unwrap().get("cta").unwrap();
        let message = cta
            .as_object()
            .unwrap()
            .get("urgency_message")
            .unwrap()
            .as_str()
            .unwrap();
        assert!(message.contains("Vendor Drift"));
    }

    #[test]
    fn test_quantified_flag() {
        let site = run("PERSONA A: \"x\"\nGOAL Cost: \"Avoid $2M/mo burn\"\nOUTPUT MintSite");
        let props = site.as_object().unwrap().get("value_props").unwrap();
        let first = &props.as_array().unwrap()[0];
        assert_eq!(
            first.as_object().unwrap().get("quantified"),
            Some(&Value::Bool(true))
        );
    }
}
