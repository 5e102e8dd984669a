// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::{Map, Value};

use crate::config::{ParameterKind, ParameterSet, ParameterSpec};
use crate::engine::Event;
use crate::errors::ProcessorError;
use crate::io::OutputEntry;
use crate::traits::{Flow, OutputSink, Processor};

use super::common::{debug_parameter, string_or, Tracer};

/// Writes one tuple row per record that reaches it.
///
/// With no `branches` configured every field of the record is written.
/// Missing branches are written as `null`.
pub struct TupleProcessor {
    tree: String,
    branches: Vec<String>,
    tracer: Tracer,
}

impl TupleProcessor {
    pub const TYPE_TAG: &'static str = "TupleProcessor";

    pub fn schema() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::optional(
                "branches",
                ParameterKind::StringList,
                Vec::<String>::new(),
                "Fields to write, default all",
            ),
            ParameterSpec::optional("tree", ParameterKind::String, "", "Tree name, default the processor name"),
            debug_parameter(),
        ]
    }

    pub fn create(name: &str, params: &ParameterSet) -> Result<Box<dyn Processor>, ProcessorError> {
        Ok(Box::new(Self {
            tree: string_or(params, "tree", name)?,
            branches: params.get_string_list("branches")?,
            tracer: Tracer::new(name, params)?,
        }))
    }

    fn row(&self, event: &Event) -> Map<String, Value> {
        if self.branches.is_empty() {
            return event.fields.clone();
        }
        self.branches
            .iter()
            .map(|b| (b.clone(), event.field(b).cloned().unwrap_or(Value::Null)))
            .collect()
    }
}

impl Processor for TupleProcessor {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn process(&mut self, event: &mut Event, sink: &mut dyn OutputSink) -> Result<Flow, ProcessorError> {
        let row = self.row(event);
        self.tracer.trace(event.number(), || format!("wrote {} branch(es) to '{}'", row.len(), self.tree));
        sink.write_entry(&OutputEntry::Tuple {
            tree: self.tree.clone(),
            row,
        })?;
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::bind_parameters;
    use crate::io::MemorySink;
    use serde_json::json;

    fn tuple(branches: Vec<&str>) -> Box<dyn Processor> {
        let mut supplied = ParameterSet::for_processor("vtxTuple");
        supplied.set("branches", branches);
        let params = bind_parameters(&TupleProcessor::schema(), &supplied).unwrap();
        TupleProcessor::create("vtxTuple", &params).unwrap()
    }

    fn write(p: &mut Box<dyn Processor>, fields: Value) -> Vec<OutputEntry> {
        let mut event = Event::new(3, "run.jsonl", fields.as_object().cloned().unwrap());
        let mut sink = MemorySink::new();
        assert_eq!(p.process(&mut event, &mut sink).unwrap(), Flow::Continue);
        sink.entries
    }

    #[test]
    fn test_selected_branches_with_null_for_missing() {
        let mut p = tuple(vec!["mass", "z"]);
        let entries = write(&mut p, json!({"mass": 0.1, "chi2": 4}));
        assert_eq!(
            entries,
            vec![OutputEntry::Tuple {
                tree: "vtxTuple".to_string(),
                row: json!({"mass": 0.1, "z": null}).as_object().cloned().unwrap(),
            }]
        );
    }

    #[test]
    fn test_all_fields_by_default() {
        let mut p = tuple(vec![]);
        let fields = json!({"mass": 0.1, "chi2": 4});
        let entries = write(&mut p, fields.clone());
        match &entries[..] {
            [OutputEntry::Tuple { row, .. }] => assert_eq!(Value::Object(row.clone()), fields),
            other => panic!("expected one row, got {:?}", other),
        }
    }
}
