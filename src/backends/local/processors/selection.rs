// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use crate::config::{ParameterKind, ParameterSet, ParameterSpec};
use crate::engine::Event;
use crate::errors::ProcessorError;
use crate::io::OutputEntry;
use crate::traits::{Flow, OutputSink, Processor};
use crate::utils::{Axis, Histogram1D};

use super::common::{debug_parameter, invalid, string_or, Tracer};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Comparison {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl Comparison {
    // Two-character operators first so `<=` is not read as `<`.
    const OPERATORS: [(&'static str, Comparison); 6] = [
        ("<=", Comparison::LessEqual),
        (">=", Comparison::GreaterEqual),
        ("==", Comparison::Equal),
        ("!=", Comparison::NotEqual),
        ("<", Comparison::Less),
        (">", Comparison::Greater),
    ];

    fn symbol(&self) -> &'static str {
        Self::OPERATORS
            .iter()
            .find(|(_, c)| c == self)
            .map(|(s, _)| *s)
            .unwrap_or("?")
    }

    fn passes(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Less => value < threshold,
            Comparison::LessEqual => value <= threshold,
            Comparison::Greater => value > threshold,
            Comparison::GreaterEqual => value >= threshold,
            Comparison::Equal => value == threshold,
            Comparison::NotEqual => value != threshold,
        }
    }
}

/// One `field <op> value` requirement.
#[derive(Debug, Clone, PartialEq)]
pub struct Cut {
    field: String,
    comparison: Comparison,
    threshold: f64,
}

impl Cut {
    pub fn parse(text: &str) -> Result<Self, String> {
        let (position, symbol, comparison) = Comparison::OPERATORS
            .iter()
            .filter_map(|(symbol, c)| text.find(symbol).map(|pos| (pos, *symbol, *c)))
            .min_by_key(|(pos, symbol, _)| (*pos, std::cmp::Reverse(symbol.len())))
            .ok_or_else(|| format!("cut '{}' has no comparison operator", text))?;

        let field = text[..position].trim();
        let threshold_text = text[position + symbol.len()..].trim();
        if field.is_empty() {
            return Err(format!("cut '{}' has no field", text));
        }
        let threshold = threshold_text
            .parse::<f64>()
            .map_err(|_| format!("cut '{}' compares against non-numeric '{}'", text, threshold_text))?;

        Ok(Self {
            field: field.to_string(),
            comparison,
            threshold,
        })
    }

    pub fn passes(&self, event: &Event) -> Result<bool, ProcessorError> {
        Ok(self.comparison.passes(event.number_field(&self.field)?, self.threshold))
    }
}

impl fmt::Display for Cut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.comparison.symbol(), self.threshold)
    }
}

/// Applies cuts in order and stops the sequence at the first failure.
///
/// The cut-flow histogram has one bin per stage: bin 1 counts every record,
/// bin `k + 1` counts records passing the first `k` cuts.
pub struct SelectionProcessor {
    cuts: Vec<Cut>,
    cutflow: Histogram1D,
    tracer: Tracer,
}

impl SelectionProcessor {
    pub const TYPE_TAG: &'static str = "SelectionProcessor";

    pub fn schema() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("cuts", ParameterKind::StringList, "Cuts such as 'chi2 < 10'"),
            ParameterSpec::optional("histogram", ParameterKind::String, "", "Cut-flow histogram name, default <name>_cutflow"),
            debug_parameter(),
        ]
    }

    pub fn create(name: &str, params: &ParameterSet) -> Result<Box<dyn Processor>, ProcessorError> {
        let cuts = params
            .get_string_list("cuts")?
            .iter()
            .map(|text| Cut::parse(text))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| invalid("cuts", reason))?;
        if cuts.is_empty() {
            return Err(invalid("cuts", "at least one cut is required"));
        }

        let histogram = string_or(params, "histogram", &format!("{}_cutflow", name))?;
        let stages = cuts.len() + 1;
        let axis = Axis::new(stages, 0.0, stages as f64)?;
        let title = cuts.iter().map(Cut::to_string).collect::<Vec<_>>().join("; ");

        Ok(Box::new(Self {
            cuts,
            cutflow: Histogram1D::new(histogram, title, axis),
            tracer: Tracer::new(name, params)?,
        }))
    }
}

impl Processor for SelectionProcessor {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn process(&mut self, event: &mut Event, _sink: &mut dyn OutputSink) -> Result<Flow, ProcessorError> {
        self.cutflow.fill(0.5);
        for (index, cut) in self.cuts.iter().enumerate() {
            if !cut.passes(event)? {
                self.tracer.trace(event.number(), || format!("failed '{}'", cut));
                return Ok(Flow::Stop);
            }
            self.cutflow.fill(index as f64 + 1.5);
        }
        self.tracer.trace(event.number(), || "passed".to_string());
        Ok(Flow::Continue)
    }

    fn finalize(&mut self, sink: &mut dyn OutputSink) -> Result<(), ProcessorError> {
        sink.write_entry(&OutputEntry::Histogram1d(self.cutflow.clone()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::bind_parameters;
    use crate::io::MemorySink;
    use serde_json::{json, Value};

    fn selection(cuts: Vec<&str>) -> Result<Box<dyn Processor>, ProcessorError> {
        let mut supplied = ParameterSet::for_processor("vtxSel");
        supplied.set("cuts", cuts);
        let params = bind_parameters(&SelectionProcessor::schema(), &supplied).unwrap();
        SelectionProcessor::create("vtxSel", &params)
    }

    fn event(number: u64, fields: Value) -> Event {
        Event::new(number, "run.jsonl", fields.as_object().cloned().unwrap())
    }

    #[test]
    fn test_parse_cuts() {
        struct TestCase {
            text: &'static str,
            expected: Option<(&'static str, Comparison, f64)>,
        }

        let cases = vec![
            TestCase { text: "chi2 < 10", expected: Some(("chi2", Comparison::Less, 10.0)) },
            TestCase { text: "chi2<=10", expected: Some(("chi2", Comparison::LessEqual, 10.0)) },
            TestCase { text: " p >= 0.5 ", expected: Some(("p", Comparison::GreaterEqual, 0.5)) },
            TestCase { text: "nhits == 6", expected: Some(("nhits", Comparison::Equal, 6.0)) },
            TestCase { text: "charge != 0", expected: Some(("charge", Comparison::NotEqual, 0.0)) },
            TestCase { text: "z > -4.3", expected: Some(("z", Comparison::Greater, -4.3)) },
            TestCase { text: "chi2", expected: None },
            TestCase { text: "< 10", expected: None },
            TestCase { text: "chi2 < ten", expected: None },
        ];

        for case in cases {
            let parsed = Cut::parse(case.text).ok();
            let expected = case.expected.map(|(field, comparison, threshold)| Cut {
                field: field.to_string(),
                comparison,
                threshold,
            });
            assert_eq!(parsed, expected, "parsing '{}'", case.text);
        }
    }

    #[test]
    fn test_stops_at_first_failed_cut_and_fills_cutflow() {
        let mut p = selection(vec!["chi2 < 10", "p > 1"]).unwrap();
        let mut sink = MemorySink::new();

        let records = vec![
            json!({"chi2": 2, "p": 2.5}),
            json!({"chi2": 20, "p": 2.5}),
            json!({"chi2": 2, "p": 0.5}),
        ];
        let flows: Vec<Flow> = records
            .into_iter()
            .enumerate()
            .map(|(i, r)| p.process(&mut event(i as u64, r), &mut sink).unwrap())
            .collect();
        assert_eq!(flows, vec![Flow::Continue, Flow::Stop, Flow::Stop]);
        assert!(sink.entries.is_empty());

        p.finalize(&mut sink).unwrap();
        match &sink.entries[..] {
            [OutputEntry::Histogram1d(h)] => {
                assert_eq!(h.name, "vtxSel_cutflow");
                assert_eq!(h.title, "chi2 < 10; p > 1");
                assert_eq!(h.bin_content(1), 3.0);
                assert_eq!(h.bin_content(2), 2.0);
                assert_eq!(h.bin_content(3), 1.0);
            }
            other => panic!("expected one cut-flow histogram, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let mut p = selection(vec!["chi2 < 10"]).unwrap();
        let result = p.process(&mut event(0, json!({"p": 1})), &mut MemorySink::new());
        assert!(matches!(result, Err(ProcessorError::MissingField { ref field }) if field == "chi2"));
    }

    #[test]
    fn test_bad_cut_is_rejected_at_construction() {
        assert!(matches!(
            selection(vec!["chi2 ~ 10"]),
            Err(ProcessorError::InvalidParameter { ref key, .. }) if key == "cuts"
        ));
        assert!(matches!(selection(vec![]), Err(ProcessorError::InvalidParameter { .. })));
    }
}
