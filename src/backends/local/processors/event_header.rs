// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{ParameterKind, ParameterSet, ParameterSpec};
use crate::engine::Event;
use crate::errors::ProcessorError;
use crate::traits::{Flow, OutputSink, Processor};

use super::common::{debug_parameter, Tracer};

/// Stamps `event_number` and `run_number` onto records that lack them.
pub struct EventHeaderProcessor {
    run_number: i64,
    tracer: Tracer,
}

impl EventHeaderProcessor {
    pub const TYPE_TAG: &'static str = "EventHeaderProcessor";

    pub fn schema() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::optional("run_number", ParameterKind::Int, 0, "Run number stamped on every record"),
            debug_parameter(),
        ]
    }

    pub fn create(name: &str, params: &ParameterSet) -> Result<Box<dyn Processor>, ProcessorError> {
        Ok(Box::new(Self {
            run_number: params.get_int("run_number")?,
            tracer: Tracer::new(name, params)?,
        }))
    }
}

impl Processor for EventHeaderProcessor {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn process(&mut self, event: &mut Event, _sink: &mut dyn OutputSink) -> Result<Flow, ProcessorError> {
        if !event.fields.contains_key("event_number") {
            let number = event.number();
            event.set_field("event_number", number);
        }
        if !event.fields.contains_key("run_number") {
            event.set_field("run_number", self.run_number);
        }
        self.tracer.trace(event.number(), || {
            format!("run {} event {}", event.fields["run_number"], event.fields["event_number"])
        });
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::bind_parameters;
    use crate::io::MemorySink;
    use serde_json::{json, Map};

    fn header(run_number: i64) -> Box<dyn Processor> {
        let mut supplied = ParameterSet::for_processor("header");
        supplied.set("run_number", run_number);
        let params = bind_parameters(&EventHeaderProcessor::schema(), &supplied).unwrap();
        EventHeaderProcessor::create("header", &params).unwrap()
    }

    #[test]
    fn test_stamps_missing_header_fields() {
        let mut p = header(7800);
        let mut event = Event::new(4, "run.jsonl", Map::new());

        assert_eq!(p.process(&mut event, &mut MemorySink::new()).unwrap(), Flow::Continue);
        assert_eq!(event.field("event_number"), Some(&json!(4)));
        assert_eq!(event.field("run_number"), Some(&json!(7800)));
    }

    #[test]
    fn test_keeps_existing_header_fields() {
        let mut p = header(7800);
        let mut fields = Map::new();
        fields.insert("event_number".to_string(), json!(99));
        fields.insert("run_number".to_string(), json!(1));
        let mut event = Event::new(4, "run.jsonl", fields);

        p.process(&mut event, &mut MemorySink::new()).unwrap();
        assert_eq!(event.field("event_number"), Some(&json!(99)));
        assert_eq!(event.field("run_number"), Some(&json!(1)));
    }
}
