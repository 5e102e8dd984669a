// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{ParameterKind, ParameterSet, ParameterSpec};
use crate::engine::Event;
use crate::errors::ProcessorError;
use crate::traits::{Flow, OutputSink, Processor};

use super::common::{debug_parameter, invalid, Tracer};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Operation {
    Sum,
    Difference,
    Product,
    Ratio,
    AbsDifference,
}

impl Operation {
    fn parse(text: &str) -> Option<Self> {
        match text {
            "sum" => Some(Operation::Sum),
            "difference" => Some(Operation::Difference),
            "product" => Some(Operation::Product),
            "ratio" => Some(Operation::Ratio),
            "abs_difference" => Some(Operation::AbsDifference),
            _ => None,
        }
    }

    fn is_binary(&self) -> bool {
        matches!(self, Operation::Difference | Operation::Ratio | Operation::AbsDifference)
    }
}

/// Combines numeric fields into a new field: `output = scale * op(inputs)`.
pub struct DerivedFieldProcessor {
    inputs: Vec<String>,
    operation: Operation,
    output: String,
    scale: f64,
    tracer: Tracer,
}

impl DerivedFieldProcessor {
    pub const TYPE_TAG: &'static str = "DerivedFieldProcessor";

    pub fn schema() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("inputs", ParameterKind::StringList, "Numeric fields to combine"),
            ParameterSpec::required(
                "operation",
                ParameterKind::String,
                "sum, difference, product, ratio or abs_difference",
            ),
            ParameterSpec::required("output", ParameterKind::String, "Field to write"),
            ParameterSpec::optional("scale", ParameterKind::Float, 1.0, "Multiplier applied to the result"),
            debug_parameter(),
        ]
    }

    pub fn create(name: &str, params: &ParameterSet) -> Result<Box<dyn Processor>, ProcessorError> {
        let inputs = params.get_string_list("inputs")?;
        let operation_text = params.get_string("operation")?;
        let operation = Operation::parse(&operation_text)
            .ok_or_else(|| invalid("operation", format!("unknown operation '{}'", operation_text)))?;

        if inputs.is_empty() {
            return Err(invalid("inputs", "at least one input field is required"));
        }
        if operation.is_binary() && inputs.len() != 2 {
            return Err(invalid(
                "inputs",
                format!("'{}' takes exactly two inputs, got {}", operation_text, inputs.len()),
            ));
        }

        let output = params.get_string("output")?;
        if output.is_empty() {
            return Err(invalid("output", "must not be empty"));
        }

        Ok(Box::new(Self {
            inputs,
            operation,
            output,
            scale: params.get_float("scale")?,
            tracer: Tracer::new(name, params)?,
        }))
    }

    fn combine(&self, values: &[f64]) -> Result<f64, ProcessorError> {
        let result: f64 = match self.operation {
            Operation::Sum => values.iter().sum(),
            Operation::Product => values.iter().product(),
            Operation::Difference => values[0] - values[1],
            Operation::AbsDifference => (values[0] - values[1]).abs(),
            Operation::Ratio => {
                if values[1] == 0.0 {
                    return Err(ProcessorError::Failed(format!(
                        "ratio denominator '{}' is zero",
                        self.inputs[1]
                    )));
                }
                values[0] / values[1]
            }
        };
        Ok(result * self.scale)
    }
}

impl Processor for DerivedFieldProcessor {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn process(&mut self, event: &mut Event, _sink: &mut dyn OutputSink) -> Result<Flow, ProcessorError> {
        let values = self
            .inputs
            .iter()
            .map(|field| event.number_field(field))
            .collect::<Result<Vec<_>, _>>()?;
        let result = self.combine(&values)?;
        self.tracer
            .trace(event.number(), || format!("{} = {}", self.output, result));
        event.set_field(self.output.clone(), result);
        Ok(Flow::Continue)
    }
}
