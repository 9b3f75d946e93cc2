//! Output transpilers
//!
//! One transpiler per output kind. Each is a pure function from
//! (Document, Insights) to an OutputDocument value tree; the concrete
//! encoding (JSON files, text blocks) belongs to the boundary layer.
//! Transpilers tolerate partially-empty Documents by omitting the
//! corresponding sections; they never depend on each other's output.

pub mod agent;
pub mod campaign;
pub mod mintsite;
pub mod rmetrics;
pub mod skill;
pub mod vroi;

use crate::error::Result;
use roidsl_core::ast::{Document, OutputKind};
use roidsl_core::{Insights, Map, Value};

pub use vroi::{VroiInputs, VroiModel, VroiResult};

/// A pure mapping from (Document, Insights) to one output document
pub trait Transpiler {
    /// The output kind this transpiler produces
    fn kind(&self) -> OutputKind;

    /// Project the validated Document and Insights into the target schema
    fn transpile(&self, doc: &Document, insights: &Insights) -> Result<Value>;
}

/// All transpilers in canonical output order
pub fn all() -> Vec<Box<dyn Transpiler>> {
    vec![
        Box::new(mintsite::MintSiteTranspiler),
        Box::new(agent::AgentTranspiler),
        Box::new(campaign::CampaignTranspiler),
        Box::new(rmetrics::RMetricsTranspiler),
        Box::new(vroi::VroiTranspiler),
        Box::new(skill::SkillTranspiler),
    ]
}

/// Format a PascalCase key as a display label: `VendorDrift` → `Vendor Drift`
pub(crate) fn display_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_ascii_uppercase() && i > 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// The primary persona as a `{role, description}` object, when declared
pub(crate) fn persona_object(doc: &Document) -> Option<Value> {
    doc.primary_persona().map(|p| {
        Value::object(vec![
            ("role", Value::string(&p.name)),
            ("description", Value::string(&p.description)),
        ])
    })
}

/// Content blocks as an ordered key → text object
pub(crate) fn content_map(blocks: &[roidsl_core::ast::ContentBlock]) -> Value {
    let mut map = Map::new();
    for block in blocks {
        map.insert(&block.key, Value::string(&block.text));
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("VendorDrift"), "Vendor Drift");
        assert_eq!(display_name("CRORework"), "C R O Rework");
        assert_eq!(display_name("plain"), "plain");
    }

    #[test]
    fn test_all_matches_canonical_order() {
        let kinds: Vec<OutputKind> = all().iter().map(|t| t.kind()).collect();
        assert_eq!(kinds, OutputKind::ALL.to_vec());
    }
}
