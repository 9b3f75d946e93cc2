//! Trigger condition and action parsers
//!
//! Conditions look like `VendorDrift > 0.40`; actions look like
//! `escalate("vendor")`. Both are stored raw in the Document and resolved
//! into structured form here.

use crate::error::{ParseError, Result};
use roidsl_core::ast::{Comparator, Trigger};
use roidsl_core::insights::ResolvedTrigger;

/// Parsed pieces of a trigger condition
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub metric: String,
    pub comparator: Comparator,
    pub threshold: f64,
}

/// Parsed action call: `name("argument")`
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCall {
    pub name: String,
    pub argument: String,
}

// Ordered longest-first so ">=" is not read as ">" followed by "=".
const COMPARATORS: [(&str, Comparator); 5] = [
    (">=", Comparator::Ge),
    ("<=", Comparator::Le),
    ("==", Comparator::Eq),
    (">", Comparator::Gt),
    ("<", Comparator::Lt),
];

/// Parse a condition string of the form `<metricKey> <op> <threshold>`
pub fn parse_condition(condition: &str) -> Result<Condition> {
    let condition = condition.trim();

    let invalid = |message: &str| ParseError::InvalidCondition {
        condition: condition.to_string(),
        message: message.to_string(),
    };

    if condition.is_empty() {
        return Err(invalid("empty condition"));
    }

    for (symbol, comparator) in COMPARATORS {
        if let Some(pos) = condition.find(symbol) {
            let metric = condition[..pos].trim();
            let threshold_str = condition[pos + symbol.len()..].trim();

            if metric.is_empty() {
                return Err(invalid("missing metric key"));
            }
            if !is_identifier(metric) {
                return Err(invalid("metric key is not an identifier"));
            }

            let threshold = threshold_str
                .parse::<f64>()
                .map_err(|_| invalid("threshold is not a number"))?;

            return Ok(Condition {
                metric: metric.to_string(),
                comparator,
                threshold,
            });
        }
    }

    Err(invalid("no comparison operator found"))
}

/// Parse an action call of the form `identifier("argument")`.
/// Single or double quotes around the argument are accepted; an unquoted
/// bare word is accepted too.
pub fn parse_action(action: &str) -> Result<ActionCall> {
    let action = action.trim();

    let invalid = |message: &str| ParseError::InvalidCondition {
        condition: action.to_string(),
        message: message.to_string(),
    };

    let open = action.find('(').ok_or_else(|| invalid("missing '('"))?;
    if !action.ends_with(')') {
        return Err(invalid("missing closing ')'"));
    }

    let name = action[..open].trim();
    if name.is_empty() || !is_identifier(name) {
        return Err(invalid("action name is not an identifier"));
    }

    let raw_arg = action[open + 1..action.len() - 1].trim();
    let argument = strip_quotes(raw_arg);

    Ok(ActionCall {
        name: name.to_string(),
        argument: argument.to_string(),
    })
}

/// Resolve a raw trigger into structured form
pub fn resolve(trigger: &Trigger) -> Result<ResolvedTrigger> {
    let condition = parse_condition(&trigger.condition)?;
    let action = parse_action(&trigger.action)?;

    Ok(ResolvedTrigger {
        metric: condition.metric,
        comparator: condition.comparator,
        threshold: condition.threshold,
        action: action.name,
        argument: action.argument,
    })
}

fn strip_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_condition() {
        let cond = parse_condition("VendorDrift > 0.40").unwrap();
        assert_eq!(cond.metric, "VendorDrift");
        assert_eq!(cond.comparator, Comparator::Gt);
        assert_eq!(cond.threshold, 0.40);
    }

    #[test]
    fn test_parse_two_char_comparators() {
        assert_eq!(
            parse_condition("A >= 0.5").unwrap().comparator,
            Comparator::Ge
        );
        assert_eq!(
            parse_condition("A <= 0.5").unwrap().comparator,
            Comparator::Le
        );
        assert_eq!(
            parse_condition("A == 0.5").unwrap().comparator,
            Comparator::Eq
        );
    }

    #[test]
    fn test_condition_without_operator_is_error() {
        assert!(parse_condition("VendorDrift").is_err());
    }

    #[test]
    fn test_condition_with_bad_threshold_is_error() {
        assert!(parse_condition("VendorDrift > high").is_err());
    }

    #[test]
    fn test_parse_action_double_quoted() {
        let action = parse_action("escalate(\"vendor\")").unwrap();
        assert_eq!(action.name, "escalate");
        assert_eq!(action.argument, "vendor");
    }

    #[test]
    fn test_parse_action_single_quoted() {
        let action = parse_action("notify('ops')").unwrap();
        assert_eq!(action.name, "notify");
        assert_eq!(action.argument, "ops");
    }

    #[test]
    fn test_parse_action_bare_argument() {
        let action = parse_action("escalate(vendor)").unwrap();
        assert_eq!(action.argument, "vendor");
    }

    #[test]
    fn test_action_without_parens_is_error() {
        assert!(parse_action("escalate").is_err());
        assert!(parse_action("escalate(\"vendor\"").is_err());
    }

    #[test]
    fn test_resolve_trigger() {
        let trigger = Trigger {
            condition: "TimelineRisk >= 0.6".to_string(),
            action: "escalate(\"timeline\")".to_string(),
        };
        let resolved = resolve(&trigger).unwrap();
        assert_eq!(resolved.metric, "TimelineRisk");
        assert_eq!(resolved.comparator, Comparator::Ge);
        assert_eq!(resolved.threshold, 0.6);
        assert_eq!(resolved.action, "escalate");
        assert_eq!(resolved.argument, "timeline");
    }
}
