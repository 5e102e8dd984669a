// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{ParameterKind, ParameterSet, ParameterSpec};
use crate::engine::Event;
use crate::errors::ProcessorError;
use crate::io::OutputEntry;
use crate::traits::{Flow, OutputSink, Processor};
use crate::utils::Histogram2D;

use super::common::{debug_parameter, string_or, Tracer};
use super::histogram_1d::axis_from;

/// Fills a 2D histogram from a pair of numeric fields.
///
/// Array fields are filled pairwise and must have equal lengths.
pub struct Histogram2DProcessor {
    x_field: String,
    y_field: String,
    weight: Option<String>,
    skip_missing: bool,
    histogram: Histogram2D,
    tracer: Tracer,
}

impl Histogram2DProcessor {
    pub const TYPE_TAG: &'static str = "Histogram2DProcessor";

    pub fn schema() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("x_field", ParameterKind::String, "Field on the x axis"),
            ParameterSpec::required("y_field", ParameterKind::String, "Field on the y axis"),
            ParameterSpec::required("x_bins", ParameterKind::Int, "Number of x bins"),
            ParameterSpec::required("x_min", ParameterKind::Float, "Lower x edge"),
            ParameterSpec::required("x_max", ParameterKind::Float, "Upper x edge"),
            ParameterSpec::required("y_bins", ParameterKind::Int, "Number of y bins"),
            ParameterSpec::required("y_min", ParameterKind::Float, "Lower y edge"),
            ParameterSpec::required("y_max", ParameterKind::Float, "Upper y edge"),
            ParameterSpec::optional("weight", ParameterKind::String, "", "Field holding the fill weight"),
            ParameterSpec::optional("histogram", ParameterKind::String, "", "Histogram name, default <name>_<y_field>_vs_<x_field>"),
            ParameterSpec::optional("skip_missing", ParameterKind::Int, 0, "Ignore records without either field"),
            debug_parameter(),
        ]
    }

    pub fn create(name: &str, params: &ParameterSet) -> Result<Box<dyn Processor>, ProcessorError> {
        let x_field = params.get_string("x_field")?;
        let y_field = params.get_string("y_field")?;
        let x_axis = axis_from(params, "x_bins", "x_min", "x_max")?;
        let y_axis = axis_from(params, "y_bins", "y_min", "y_max")?;
        let histogram_name = string_or(params, "histogram", &format!("{}_{}_vs_{}", name, y_field, x_field))?;
        let title = format!("{} vs {}", y_field, x_field);
        let weight = params.get_string("weight")?;

        Ok(Box::new(Self {
            x_field,
            y_field,
            weight: (!weight.is_empty()).then_some(weight),
            skip_missing: params.get_int("skip_missing")? != 0,
            histogram: Histogram2D::new(histogram_name, title, x_axis, y_axis),
            tracer: Tracer::new(name, params)?,
        }))
    }
}

impl Processor for Histogram2DProcessor {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn process(&mut self, event: &mut Event, _sink: &mut dyn OutputSink) -> Result<Flow, ProcessorError> {
        let missing = event.field(&self.x_field).is_none() || event.field(&self.y_field).is_none();
        if self.skip_missing && missing {
            return Ok(Flow::Continue);
        }
        let xs = event.number_values(&self.x_field)?;
        let ys = event.number_values(&self.y_field)?;
        if xs.len() != ys.len() {
            return Err(ProcessorError::Failed(format!(
                "'{}' has {} values but '{}' has {}",
                self.x_field,
                xs.len(),
                self.y_field,
                ys.len()
            )));
        }
        let weight = match &self.weight {
            Some(field) => event.number_field(field)?,
            None => 1.0,
        };
        for (x, y) in xs.iter().zip(&ys) {
            self.histogram.fill_weighted(*x, *y, weight);
        }
        self.tracer.trace(event.number(), || format!("filled {} pair(s)", xs.len()));
        Ok(Flow::Continue)
    }

    fn finalize(&mut self, sink: &mut dyn OutputSink) -> Result<(), ProcessorError> {
        sink.write_entry(&OutputEntry::Histogram2d(self.histogram.clone()))?;
        Ok(())
    }
}
