//! Document AST
//!
//! A `Document` is the parsed, in-memory representation of one `.roi` source
//! file. It is constructed once per compilation and never mutated afterwards;
//! validator, interpreter, and transpilers only read from it.

use serde::{Deserialize, Serialize};

/// A `PERSONA Name: "description"` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub description: String,
}

/// A `GOAL Key: "description"` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub key: String,
    pub description: String,
}

/// A `METRIC Key: <value>` declaration; values are normalized to [0.0, 1.0]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub key: String,
    pub value: f64,
}

/// An `RMetric Key: "formula"` declaration; the formula is an arithmetic
/// expression over base metric keys, stored raw and parsed downstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedMetric {
    pub key: String,
    pub formula: String,
}

/// A `WHEN <condition> THEN <action>` declaration, stored as raw strings.
/// The parser syntax-checks the line; the interpreter resolves it into a
/// structured form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub condition: String,
    pub action: String,
}

/// A free-form keyed content declaration (CREDENTIAL, CASE_STUDY, SERVICE,
/// TRAINING, MICROTRAINING, STAT)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub key: String,
    pub text: String,
}

/// A calculator form field (VROI_INPUT / VROI_OUTPUT)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    pub label: String,
}

/// SEO metadata, filled by the SEO_* scalar declarations (last write wins)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Seo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
}

impl Seo {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.keywords.is_none()
    }
}

/// Contact details, filled by the CONTACT_* scalar declarations (last write wins)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
}

impl Contact {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.location.is_none()
    }
}

/// Ordered variant-type → text map with last-wins overwrite semantics.
///
/// `VARIANT Hero: "A"` followed by `VARIANT Hero: "B"` leaves a single
/// `Hero` entry holding `"B"`, at the position of the first write.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VariantMap {
    entries: Vec<(String, String)>,
}

impl VariantMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variant, overwriting an existing entry of the same type
    pub fn insert(&mut self, variant_type: impl Into<String>, value: impl Into<String>) {
        let variant_type = variant_type.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(t, _)| *t == variant_type) {
            entry.1 = value;
        } else {
            self.entries.push((variant_type, value));
        }
    }

    /// Look up a variant by type
    pub fn get(&self, variant_type: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == variant_type)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }
}

/// Parsed representation of one `.roi` source file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Declared personas in source order; the first is primary
    pub personas: Vec<Persona>,
    pub goals: Vec<Goal>,
    pub metrics: Vec<Metric>,
    pub computed_metrics: Vec<ComputedMetric>,
    pub triggers: Vec<Trigger>,
    pub variants: VariantMap,
    pub credentials: Vec<ContentBlock>,
    pub case_studies: Vec<ContentBlock>,
    pub services: Vec<ContentBlock>,
    pub training: Vec<ContentBlock>,
    pub microtraining: Vec<ContentBlock>,
    pub vroi_inputs: Vec<FieldSpec>,
    pub vroi_outputs: Vec<FieldSpec>,
    pub stats: Vec<ContentBlock>,
    pub seo: Seo,
    pub contact: Contact,
    /// Unique tags in declaration order
    pub sk_tags: Vec<String>,
    /// Raw requested output selector names, unique, in declaration order.
    /// Unknown names are validation errors, not parse errors.
    pub output_selectors: Vec<String>,
}

impl Document {
    /// The primary persona (first declared), if any
    pub fn primary_persona(&self) -> Option<&Persona> {
        self.personas.first()
    }

    /// Look up a base metric by key (first declaration wins on duplicates;
    /// duplicates are validation errors anyway)
    pub fn metric(&self, key: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.key == key)
    }

    /// Whether a base metric with this key exists
    pub fn has_metric(&self, key: &str) -> bool {
        self.metric(key).is_some()
    }

    /// Add a tag, keeping set semantics by value
    pub fn push_sk_tag(&mut self, tag: String) {
        if !self.sk_tags.contains(&tag) {
            self.sk_tags.push(tag);
        }
    }

    /// Add an output selector, keeping set semantics by value
    pub fn push_output_selector(&mut self, name: String) {
        if !self.output_selectors.contains(&name) {
            self.output_selectors.push(name);
        }
    }
}
