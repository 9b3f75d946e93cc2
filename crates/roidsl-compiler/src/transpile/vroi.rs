//! vROI transpiler: Document → value-of-avoiding-delay calculator definition
//!
//! The calculator's computation is fixed: monthly burn, delay weeks, and
//! rework percentage produce delay cost, rework cost, and total exposure,
//! with a binary recommendation at a fixed exposure threshold. The form
//! fields come from the document's VROI_INPUT / VROI_OUTPUT declarations.

use super::{persona_object, Transpiler};
use crate::error::Result;
use roidsl_core::ast::{Document, FieldSpec, OutputKind};
use roidsl_core::{Insights, Map, Value};

/// Average weeks per month used by the delay-cost model
pub const WEEKS_PER_MONTH: f64 = 4.33;

/// Total exposure above this triggers the high-exposure recommendation
pub const EXPOSURE_THRESHOLD: f64 = 1_000_000.0;

const RECOMMENDATION_HIGH: &str = "Immediate Intervention Required";
const RECOMMENDATION_LOW: &str = "Schedule Assessment";

/// Inputs to the fixed calculator formula
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VroiInputs {
    /// Monthly burn rate in dollars
    pub monthly_burn: f64,
    /// Current delay in weeks
    pub delay_weeks: f64,
    /// Rework as a percentage of monthly burn (0-100)
    pub rework_percent: f64,
}

/// Evaluated calculator outputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VroiResult {
    pub delay_cost: f64,
    pub rework_cost: f64,
    pub total_exposure: f64,
    pub high_exposure: bool,
}

/// The embedded calculator model
pub struct VroiModel;

impl VroiModel {
    /// Evaluate the fixed formula:
    /// `delay_cost = (monthly_burn / 4.33) * delay_weeks`,
    /// `rework_cost = monthly_burn * rework_percent / 100`,
    /// `total_exposure = delay_cost + rework_cost`.
    pub fn evaluate(inputs: VroiInputs) -> VroiResult {
        let delay_cost = (inputs.monthly_burn / WEEKS_PER_MONTH) * inputs.delay_weeks;
        let rework_cost = inputs.monthly_burn * (inputs.rework_percent / 100.0);
        let total_exposure = delay_cost + rework_cost;
        VroiResult {
            delay_cost,
            rework_cost,
            total_exposure,
            high_exposure: total_exposure > EXPOSURE_THRESHOLD,
        }
    }
}

pub struct VroiTranspiler;

impl Transpiler for VroiTranspiler {
    fn kind(&self) -> OutputKind {
        OutputKind::Vroi
    }

    fn transpile(&self, doc: &Document, _insights: &Insights) -> Result<Value> {
        let mut calculator = Map::new();
        calculator.insert("calculator_type", Value::string("value_of_avoiding_delay"));

        if let Some(persona) = persona_object(doc) {
            calculator.insert("persona", persona);
        }

        if !doc.vroi_inputs.is_empty() {
            calculator.insert("inputs", field_list(&doc.vroi_inputs));
        }
        if !doc.vroi_outputs.is_empty() {
            calculator.insert("outputs", field_list(&doc.vroi_outputs));
        }

        calculator.insert(
            "formula",
            Value::object(vec![
                ("weeks_per_month", Value::Number(WEEKS_PER_MONTH)),
                (
                    "delay_cost",
                    Value::string("(MonthlyBurn / 4.33) * ActualDelay"),
                ),
                (
                    "rework_cost",
                    Value::string("MonthlyBurn * (CRORework / 100)"),
                ),
                ("total_exposure", Value::string("delay_cost + rework_cost")),
                ("exposure_threshold", Value::Number(EXPOSURE_THRESHOLD)),
                ("recommendation_high", Value::string(RECOMMENDATION_HIGH)),
                ("recommendation_low", Value::string(RECOMMENDATION_LOW)),
            ]),
        );

        Ok(Value::Object(calculator))
    }
}

fn field_list(fields: &[FieldSpec]) -> Value {
    let items: Vec<Value> = fields
        .iter()
        .map(|f| {
            Value::object(vec![
                ("field_id", Value::string(&f.key)),
                ("label", Value::string(&f.label)),
            ])
        })
        .collect();
    Value::Array(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::interpret;
    use roidsl_parser::parse;

    #[test]
    fn test_reference_scenario() {
        // burn 2,000,000 / delay 8 weeks / rework 15%
        let result = VroiModel::evaluate(VroiInputs {
            monthly_burn: 2_000_000.0,
            delay_weeks: 8.0,
            rework_percent: 15.0,
        });

        assert!((result.delay_cost - 3_695_150.115).abs() < 0.01);
        assert_eq!(result.rework_cost, 300_000.0);
        assert!((result.total_exposure - 3_995_150.115).abs() < 0.01);
        assert!(result.high_exposure);
    }

    #[test]
    fn test_low_exposure_recommendation() {
        let result = VroiModel::evaluate(VroiInputs {
            monthly_burn: 100_000.0,
            delay_weeks: 2.0,
            rework_percent: 5.0,
        });
        assert!(!result.high_exposure);
    }

    #[test]
    fn test_zero_inputs() {
        let result = VroiModel::evaluate(VroiInputs {
            monthly_burn: 0.0,
            delay_weeks: 0.0,
            rework_percent: 0.0,
        });
        assert_eq!(result.total_exposure, 0.0);
        assert!(!result.high_exposure);
    }

    #[test]
    fn test_form_fields_in_declaration_order() {
        let source = r#"
PERSONA A: "x"
VROI_INPUT MonthlyBurn: "Monthly burn rate ($)"
VROI_INPUT ActualDelay: "Current delay (weeks)"
VROI_OUTPUT DelayCost: "Cost of Delay (Monthly)"
OUTPUT vROI
"#;
        let doc = parse(source).unwrap().document;
        let insights = interpret(&doc);
        let calculator = VroiTranspiler.transpile(&doc, &insights).unwrap();

        let inputs = calculator.as_object().unwrap().get("inputs").unwrap();
        let ids: Vec<&str> = inputs
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f.as_object().unwrap().get("field_id").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["MonthlyBurn", "ActualDelay"]);
    }

    #[test]
    fn test_formula_block_always_present() {
        let doc = parse("PERSONA A: \"x\"\nOUTPUT vROI").unwrap().document;
        let insights = interpret(&doc);
        let calculator = VroiTranspiler.transpile(&doc, &insights).unwrap();
        let formula = calculator.as_object().unwrap().get("formula").unwrap();
        assert_eq!(
            formula
                .as_object()
                .unwrap()
                .get("exposure_threshold")
                .unwrap()
                .as_number(),
            Some(EXPOSURE_THRESHOLD)
        );
    }
}
