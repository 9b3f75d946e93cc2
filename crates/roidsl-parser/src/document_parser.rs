//! Line-oriented `.roi` document parser
//!
//! Each significant line is one declaration, dispatched on its leading
//! keyword. Structural malformations (missing quotes, bad numbers,
//! malformed triggers) are fatal; lines starting with an unknown keyword
//! are recorded as non-fatal diagnostics so one run reports them all.

use crate::error::{ParseError, Result};
use crate::trigger;
use log::debug;
use roidsl_core::ast::{
    ComputedMetric, ContentBlock, Document, FieldSpec, Goal, Metric, Persona, Trigger,
};
use roidsl_core::diagnostics::{Diagnostic, Stage};

/// Result of parsing one `.roi` source: the Document plus any non-fatal
/// parse diagnostics (unrecognized declarations)
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse `.roi` source text
pub fn parse(text: &str) -> Result<Parsed> {
    DocumentParser::new().parse(text)
}

/// The `.roi` document parser
#[derive(Debug, Default)]
pub struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse source text into a Document.
    ///
    /// Stops at the first fatal structural error; collects unrecognized
    /// lines as warnings and keeps going past them.
    pub fn parse(&self, text: &str) -> Result<Parsed> {
        let mut document = Document::default();
        let mut diagnostics = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = (idx + 1) as u32;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }

            // Scalar keywords may carry the colon in the first token
            // (`SEO_TITLE: "..."`), so dispatch on the token minus any
            // trailing colon.
            let token = line.split_whitespace().next().unwrap_or_default();
            let keyword = token.trim_end_matches(':');

            match keyword {
                "PERSONA" => {
                    let (name, description) = keyed_quoted(line, token, line_no)?;
                    document.personas.push(Persona { name, description });
                }
                "GOAL" => {
                    let (key, description) = keyed_quoted(line, token, line_no)?;
                    document.goals.push(Goal { key, description });
                }
                "METRIC" => {
                    let (key, value) = keyed_number(line, token, line_no)?;
                    document.metrics.push(Metric { key, value });
                }
                "RMetric" => {
                    let (key, formula) = keyed_quoted(line, token, line_no)?;
                    document.computed_metrics.push(ComputedMetric { key, formula });
                }
                "WHEN" => {
                    document.triggers.push(parse_trigger_line(line, token, line_no)?);
                }
                "VARIANT" => {
                    let (variant_type, value) = keyed_quoted(line, token, line_no)?;
                    document.variants.insert(variant_type, value);
                }
                "CREDENTIAL" => {
                    let (key, text) = keyed_quoted(line, token, line_no)?;
                    document.credentials.push(ContentBlock { key, text });
                }
                "CASE_STUDY" => {
                    let (key, text) = keyed_quoted(line, token, line_no)?;
                    document.case_studies.push(ContentBlock { key, text });
                }
                "SERVICE" => {
                    let (key, text) = keyed_quoted(line, token, line_no)?;
                    document.services.push(ContentBlock { key, text });
                }
                "TRAINING" => {
                    let (key, text) = keyed_quoted(line, token, line_no)?;
                    document.training.push(ContentBlock { key, text });
                }
                "MICROTRAINING" => {
                    let (key, text) = keyed_quoted(line, token, line_no)?;
                    document.microtraining.push(ContentBlock { key, text });
                }
                "VROI_INPUT" => {
                    let (key, label) = keyed_quoted(line, token, line_no)?;
                    document.vroi_inputs.push(FieldSpec { key, label });
                }
                "VROI_OUTPUT" => {
                    let (key, label) = keyed_quoted(line, token, line_no)?;
                    document.vroi_outputs.push(FieldSpec { key, label });
                }
                "STAT" => {
                    let (key, text) = keyed_quoted(line, token, line_no)?;
                    document.stats.push(ContentBlock { key, text });
                }
                "SEO_TITLE" => {
                    document.seo.title = Some(scalar_quoted(line, token, line_no)?);
                }
                "SEO_DESCRIPTION" => {
                    document.seo.description = Some(scalar_quoted(line, token, line_no)?);
                }
                "SEO_KEYWORDS" => {
                    document.seo.keywords = Some(scalar_quoted(line, token, line_no)?);
                }
                "CONTACT_NAME" => {
                    document.contact.name = Some(scalar_quoted(line, token, line_no)?);
                }
                "CONTACT_EMAIL" => {
                    document.contact.email = Some(scalar_quoted(line, token, line_no)?);
                }
                "CONTACT_LOCATION" => {
                    document.contact.location = Some(scalar_quoted(line, token, line_no)?);
                }
                "SK_TAG" => {
                    document.push_sk_tag(scalar_quoted(line, token, line_no)?);
                }
                "OUTPUT" => {
                    document.push_output_selector(bare_name(line, token, line_no)?);
                }
                other => {
                    diagnostics.push(
                        Diagnostic::warning(
                            Stage::Parse,
                            format!("unrecognized declaration '{other}'"),
                        )
                        .with_line(line_no),
                    );
                }
            }
        }

        debug!(
            "parsed document: {} personas, {} goals, {} metrics, {} computed, {} triggers, {} selectors",
            document.personas.len(),
            document.goals.len(),
            document.metrics.len(),
            document.computed_metrics.len(),
            document.triggers.len(),
            document.output_selectors.len()
        );

        Ok(Parsed {
            document,
            diagnostics,
        })
    }
}

/// `KEYWORD Identifier: "text"` — returns (identifier, text)
fn keyed_quoted(line: &str, token: &str, line_no: u32) -> Result<(String, String)> {
    let rest = line[token.len()..].trim_start();

    let colon = rest.find(':').ok_or_else(|| ParseError::InvalidDeclaration {
        line: line_no,
        text: line.to_string(),
    })?;

    let key = rest[..colon].trim();
    if !is_word(key) {
        return Err(ParseError::InvalidDeclaration {
            line: line_no,
            text: line.to_string(),
        });
    }

    let value = quoted(rest[colon + 1..].trim(), line, line_no)?;
    Ok((key.to_string(), value))
}

/// `KEYWORD Identifier: <float>` — returns (identifier, number)
fn keyed_number(line: &str, token: &str, line_no: u32) -> Result<(String, f64)> {
    let rest = line[token.len()..].trim_start();

    let colon = rest.find(':').ok_or_else(|| ParseError::InvalidDeclaration {
        line: line_no,
        text: line.to_string(),
    })?;

    let key = rest[..colon].trim();
    if !is_word(key) {
        return Err(ParseError::InvalidDeclaration {
            line: line_no,
            text: line.to_string(),
        });
    }

    let value_str = rest[colon + 1..].trim();
    let value = value_str
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber {
            line: line_no,
            value: value_str.to_string(),
        })?;

    Ok((key.to_string(), value))
}

/// `KEYWORD: "text"` — returns the text
fn scalar_quoted(line: &str, token: &str, line_no: u32) -> Result<String> {
    let mut rest = line[token.len()..].trim_start();

    // The colon may have been part of the first token already.
    if !token.ends_with(':') {
        rest = rest
            .strip_prefix(':')
            .ok_or_else(|| ParseError::InvalidDeclaration {
                line: line_no,
                text: line.to_string(),
            })?
            .trim_start();
    }

    quoted(rest, line, line_no)
}

/// `OUTPUT Name` — returns the selector name
fn bare_name(line: &str, token: &str, line_no: u32) -> Result<String> {
    let rest = line[token.len()..].trim();
    let name = rest.split_whitespace().next().unwrap_or_default();

    if name.is_empty() {
        return Err(ParseError::InvalidDeclaration {
            line: line_no,
            text: line.to_string(),
        });
    }

    Ok(name.to_string())
}

/// Parse a `WHEN <condition> THEN <action>` line, syntax-checking both sides
fn parse_trigger_line(line: &str, token: &str, line_no: u32) -> Result<Trigger> {
    let rest = line[token.len()..].trim();

    let then_pos = rest.find(" THEN ").ok_or_else(|| ParseError::InvalidTrigger {
        line: line_no,
        text: line.to_string(),
        message: "missing THEN".to_string(),
    })?;

    let condition = rest[..then_pos].trim().to_string();
    let action = rest[then_pos + " THEN ".len()..].trim().to_string();

    let to_line_error = |err: ParseError| match err {
        ParseError::InvalidCondition { message, .. } => ParseError::InvalidTrigger {
            line: line_no,
            text: line.to_string(),
            message,
        },
        other => other,
    };

    trigger::parse_condition(&condition).map_err(to_line_error)?;
    trigger::parse_action(&action).map_err(to_line_error)?;

    Ok(Trigger { condition, action })
}

/// Everything between the first pair of double quotes.
/// A recognized declaration without an opening quote is an invalid
/// declaration; an opening quote without a closing one is fatal.
fn quoted(rest: &str, line: &str, line_no: u32) -> Result<String> {
    let inner = rest
        .strip_prefix('"')
        .ok_or_else(|| ParseError::InvalidDeclaration {
            line: line_no,
            text: line.to_string(),
        })?;

    let close = inner
        .find('"')
        .ok_or_else(|| ParseError::UnterminatedString {
            line: line_no,
            text: line.to_string(),
        })?;

    Ok(inner[..close].to_string())
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_persona_and_goal() {
        let parsed = parse(
            r#"
PERSONA Sponsor: "CNS Phase III Director"
GOAL DelayCost: "Avoid $2M/mo burn"
"#,
        )
        .unwrap();

        let doc = &parsed.document;
        assert_eq!(doc.personas.len(), 1);
        assert_eq!(doc.personas[0].name, "Sponsor");
        assert_eq!(doc.personas[0].description, "CNS Phase III Director");
        assert_eq!(doc.goals[0].key, "DelayCost");
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_parse_metric_value() {
        let parsed = parse("METRIC VendorDrift: 0.45").unwrap();
        assert_eq!(parsed.document.metrics[0].key, "VendorDrift");
        assert_eq!(parsed.document.metrics[0].value, 0.45);
    }

    #[test]
    fn test_metric_with_bad_number_is_fatal() {
        let err = parse("METRIC VendorDrift: high").unwrap_err();
        assert_eq!(err.line(), Some(1));
        assert!(matches!(err, ParseError::InvalidNumber { .. }));
    }

    #[test]
    fn test_unterminated_quote_is_fatal() {
        let err = parse("GOAL DelayCost: \"Avoid burn").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedString { line: 1, .. }));
    }

    #[test]
    fn test_unrecognized_keyword_is_nonfatal() {
        let parsed = parse(
            "PERSONA A: \"x\"\nBOGUS Key: \"y\"\nGOAL B: \"z\"\nNONSENSE too",
        )
        .unwrap();

        assert_eq!(parsed.diagnostics.len(), 2);
        assert_eq!(parsed.diagnostics[0].line, Some(2));
        assert_eq!(parsed.diagnostics[1].line, Some(4));
        // Parsing continued past the bad lines
        assert_eq!(parsed.document.goals.len(), 1);
    }

    #[test]
    fn test_comments_and_blanks_ignored() {
        let parsed = parse("# comment\n\n// another\nPERSONA A: \"x\"").unwrap();
        assert_eq!(parsed.document.personas.len(), 1);
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_parse_trigger_line() {
        let parsed = parse("WHEN VendorDrift > 0.40 THEN escalate(\"vendor\")").unwrap();
        let trigger = &parsed.document.triggers[0];
        assert_eq!(trigger.condition, "VendorDrift > 0.40");
        assert_eq!(trigger.action, "escalate(\"vendor\")");
    }

    #[test]
    fn test_trigger_with_bad_threshold_is_fatal() {
        let err = parse("WHEN VendorDrift > high THEN escalate(\"x\")").unwrap_err();
        assert!(matches!(err, ParseError::InvalidTrigger { line: 1, .. }));
    }

    #[test]
    fn test_trigger_without_then_is_fatal() {
        let err = parse("WHEN VendorDrift > 0.4").unwrap_err();
        assert!(matches!(err, ParseError::InvalidTrigger { line: 1, .. }));
    }

    #[test]
    fn test_variant_overwrites_last_wins() {
        let parsed = parse("VARIANT Hero: \"A\"\nVARIANT Hero: \"B\"").unwrap();
        assert_eq!(parsed.document.variants.get("Hero"), Some("B"));
        assert_eq!(parsed.document.variants.len(), 1);
    }

    #[test]
    fn test_duplicate_sequence_keys_append() {
        let parsed = parse("GOAL A: \"one\"\nGOAL A: \"two\"").unwrap();
        assert_eq!(parsed.document.goals.len(), 2);
    }

    #[test]
    fn test_scalar_declarations() {
        let parsed = parse(
            r#"
SEO_TITLE: "Rose Maloney - Clinical Operations Expert"
SEO_DESCRIPTION: "Rescue delayed trials"
CONTACT_NAME: "Rose Maloney"
CONTACT_EMAIL: "rose@example.com"
SK_TAG: "clinical_operations_expert"
SK_TAG: "clinical_operations_expert"
"#,
        )
        .unwrap();

        let doc = &parsed.document;
        assert_eq!(
            doc.seo.title.as_deref(),
            Some("Rose Maloney - Clinical Operations Expert")
        );
        assert_eq!(doc.contact.email.as_deref(), Some("rose@example.com"));
        assert_eq!(doc.sk_tags, vec!["clinical_operations_expert"]);
    }

    #[test]
    fn test_output_selectors_collect_as_set() {
        let parsed = parse("OUTPUT MintSite\nOUTPUT vROI\nOUTPUT MintSite").unwrap();
        assert_eq!(parsed.document.output_selectors, vec!["MintSite", "vROI"]);
    }

    #[test]
    fn test_unknown_output_name_is_kept_for_validation() {
        // Not a parse error; the validator reports unknown selectors
        let parsed = parse("OUTPUT Cloudflare").unwrap();
        assert_eq!(parsed.document.output_selectors, vec!["Cloudflare"]);
    }

    #[test]
    fn test_vroi_fields_and_content_blocks() {
        let parsed = parse(
            r#"
VROI_INPUT MonthlyBurn: "Monthly burn rate ($)"
VROI_OUTPUT DelayCost: "Cost of Delay (Monthly)"
CREDENTIAL Sites: "536+ Sites Managed"
STAT Sites: "536 Sites"
CASE_STUDY Asubio: "COPD Phase IIb"
SERVICE CriticalPath: "Critical-Path Turnaround"
TRAINING MonitoringRisk: "Monitoring for Risk"
MICROTRAINING Title: "See the Precision Method"
"#,
        )
        .unwrap();

        let doc = &parsed.document;
        assert_eq!(doc.vroi_inputs[0].key, "MonthlyBurn");
        assert_eq!(doc.vroi_outputs[0].label, "Cost of Delay (Monthly)");
        assert_eq!(doc.credentials.len(), 1);
        assert_eq!(doc.stats.len(), 1);
        assert_eq!(doc.case_studies.len(), 1);
        assert_eq!(doc.services.len(), 1);
        assert_eq!(doc.training.len(), 1);
        assert_eq!(doc.microtraining.len(), 1);
    }

    #[test]
    fn test_rmetric_stores_raw_formula() {
        let parsed = parse("RMetric StudyHealth: \"TimelineRisk * 1.2 + VendorDrift\"").unwrap();
        assert_eq!(
            parsed.document.computed_metrics[0].formula,
            "TimelineRisk * 1.2 + VendorDrift"
        );
    }
}
