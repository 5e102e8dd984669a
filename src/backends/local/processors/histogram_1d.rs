// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{ParameterKind, ParameterSet, ParameterSpec};
use crate::engine::Event;
use crate::errors::ProcessorError;
use crate::io::OutputEntry;
use crate::traits::{Flow, OutputSink, Processor};
use crate::utils::{Axis, Histogram1D};

use super::common::{debug_parameter, invalid, string_or, Tracer};

/// Fills a 1D histogram from a numeric field and writes it at finalize.
///
/// Array fields fill once per element. With `weight` set, every fill uses
/// that field's value as its weight.
pub struct Histogram1DProcessor {
    field: String,
    weight: Option<String>,
    skip_missing: bool,
    histogram: Histogram1D,
    tracer: Tracer,
}

impl Histogram1DProcessor {
    pub const TYPE_TAG: &'static str = "Histogram1DProcessor";

    pub fn schema() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("field", ParameterKind::String, "Numeric field to histogram"),
            ParameterSpec::required("bins", ParameterKind::Int, "Number of bins"),
            ParameterSpec::required("min", ParameterKind::Float, "Lower edge"),
            ParameterSpec::required("max", ParameterKind::Float, "Upper edge"),
            ParameterSpec::optional("weight", ParameterKind::String, "", "Field holding the fill weight"),
            ParameterSpec::optional("histogram", ParameterKind::String, "", "Histogram name, default <name>_<field>"),
            ParameterSpec::optional("title", ParameterKind::String, "", "Histogram title, default the name"),
            ParameterSpec::optional("skip_missing", ParameterKind::Int, 0, "Ignore records without the field"),
            debug_parameter(),
        ]
    }

    pub fn create(name: &str, params: &ParameterSet) -> Result<Box<dyn Processor>, ProcessorError> {
        let field = params.get_string("field")?;
        let axis = axis_from(params, "bins", "min", "max")?;
        let histogram_name = string_or(params, "histogram", &format!("{}_{}", name, field))?;
        let title = string_or(params, "title", &histogram_name)?;
        let weight = params.get_string("weight")?;

        Ok(Box::new(Self {
            field,
            weight: (!weight.is_empty()).then_some(weight),
            skip_missing: params.get_int("skip_missing")? != 0,
            histogram: Histogram1D::new(histogram_name, title, axis),
            tracer: Tracer::new(name, params)?,
        }))
    }
}

/// Build an axis from three bound parameters.
pub(crate) fn axis_from(params: &ParameterSet, bins: &str, min: &str, max: &str) -> Result<Axis, ProcessorError> {
    let count = params.get_int(bins)?;
    let count = usize::try_from(count)
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| invalid(bins, format!("must be a positive bin count, got {}", count)))?;
    Axis::new(count, params.get_float(min)?, params.get_float(max)?).map_err(|e| invalid(bins, e.to_string()))
}

impl Processor for Histogram1DProcessor {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn process(&mut self, event: &mut Event, _sink: &mut dyn OutputSink) -> Result<Flow, ProcessorError> {
        if self.skip_missing && event.field(&self.field).is_none() {
            return Ok(Flow::Continue);
        }
        let values = event.number_values(&self.field)?;
        let weight = match &self.weight {
            Some(field) => event.number_field(field)?,
            None => 1.0,
        };
        for value in &values {
            self.histogram.fill_weighted(*value, weight);
        }
        self.tracer
            .trace(event.number(), || format!("filled {} value(s) of '{}'", values.len(), self.field));
        Ok(Flow::Continue)
    }

    fn finalize(&mut self, sink: &mut dyn OutputSink) -> Result<(), ProcessorError> {
        sink.write_entry(&OutputEntry::Histogram1d(self.histogram.clone()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{bind_parameters, ParameterValue};
    use crate::io::MemorySink;
    use serde_json::{json, Value};

    fn histo(extra: &[(&str, ParameterValue)]) -> Result<Box<dyn Processor>, ProcessorError> {
        let mut supplied = ParameterSet::for_processor("trk");
        supplied.set("field", "chi2");
        supplied.set("bins", 10);
        supplied.set("min", 0);
        supplied.set("max", 10);
        for (key, value) in extra {
            supplied.set(*key, value.clone());
        }
        let params = bind_parameters(&Histogram1DProcessor::schema(), &supplied).unwrap();
        Histogram1DProcessor::create("trk", &params)
    }

    fn fill(p: &mut Box<dyn Processor>, fields: Value) -> Result<Flow, ProcessorError> {
        let mut event = Event::new(0, "run.jsonl", fields.as_object().cloned().unwrap());
        p.process(&mut event, &mut MemorySink::new())
    }

    fn written(p: &mut Box<dyn Processor>) -> Histogram1D {
        let mut sink = MemorySink::new();
        p.finalize(&mut sink).unwrap();
        match sink.entries.pop() {
            Some(OutputEntry::Histogram1d(h)) => h,
            other => panic!("expected a histogram, got {:?}", other),
        }
    }

    #[test]
    fn test_fills_scalars_and_arrays() {
        let mut p = histo(&[]).unwrap();
        fill(&mut p, json!({"chi2": 2.5})).unwrap();
        fill(&mut p, json!({"chi2": [2.1, 7.5, 12]})).unwrap();

        let h = written(&mut p);
        assert_eq!(h.name, "trk_chi2");
        assert_eq!(h.entries, 4);
        assert_eq!(h.bin_content(3), 2.0);
        assert_eq!(h.bin_content(8), 1.0);
        assert_eq!(h.bin_content(11), 1.0);
    }

    #[test]
    fn test_weight_field() {
        let mut p = histo(&[("weight", "w".into()), ("histogram", "chi2_w".into())]).unwrap();
        fill(&mut p, json!({"chi2": 1.5, "w": 0.25})).unwrap();

        let h = written(&mut p);
        assert_eq!(h.name, "chi2_w");
        assert_eq!(h.bin_content(2), 0.25);
    }

    #[test]
    fn test_missing_field() {
        let mut strict = histo(&[]).unwrap();
        assert!(matches!(fill(&mut strict, json!({})), Err(ProcessorError::MissingField { .. })));

        let mut lenient = histo(&[("skip_missing", ParameterValue::Int(1))]).unwrap();
        assert_eq!(fill(&mut lenient, json!({})).unwrap(), Flow::Continue);
        assert_eq!(written(&mut lenient).entries, 0);
    }

    #[test]
    fn test_bad_axis_is_invalid_parameter() {
        for extra in [vec![("bins", ParameterValue::Int(0))], vec![("max", ParameterValue::Float(-1.0))]] {
            assert!(matches!(
                histo(&extra),
                Err(ProcessorError::InvalidParameter { ref key, .. }) if key == "bins"
            ));
        }
    }
}
