// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Test-only processors that record how the sequencer drives them.

use serde_json::{Map, Value};
use std::cell::RefCell;

use crate::config::{Library, ParameterKind, ParameterSet, ParameterSpec, ProcessorRegistration, RunMode};
use crate::engine::Event;
use crate::errors::ProcessorError;
use crate::io::OutputEntry;
use crate::traits::{Flow, JobContext, OutputSink, Processor};

pub const TEST_LIBRARY: &str = "libtest";

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Initialize { job: usize },
    Process { record: u64, poly_order: i64 },
    Finalize { calls: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub processor: String,
    pub stage: Stage,
}

thread_local! {
    static VISITS: RefCell<Vec<Visit>> = const { RefCell::new(Vec::new()) };
}

/// Drain the visits recorded on this thread.
pub fn take_visits() -> Vec<Visit> {
    VISITS.with(|v| std::mem::take(&mut *v.borrow_mut()))
}

fn record(processor: &str, stage: Stage) {
    VISITS.with(|v| {
        v.borrow_mut().push(Visit {
            processor: processor.to_string(),
            stage,
        })
    });
}

/// Records every lifecycle call. Stops or fails on chosen record numbers and
/// writes its call count as a tuple row at finalize.
pub struct RecordingProcessor {
    name: String,
    poly_order: i64,
    stop_on: i64,
    fail_on: i64,
    calls: u64,
}

impl RecordingProcessor {
    pub fn schema() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::optional("poly_order", ParameterKind::Int, 0, "Recorded with every call"),
            ParameterSpec::optional("stop_on", ParameterKind::Int, -1, "Record number to stop on"),
            ParameterSpec::optional("fail_on", ParameterKind::Int, -1, "Record number to fail on"),
        ]
    }

    pub fn create(name: &str, params: &ParameterSet) -> Result<Box<dyn Processor>, ProcessorError> {
        Ok(Box::new(Self {
            name: name.to_string(),
            poly_order: params.get_int("poly_order")?,
            stop_on: params.get_int("stop_on")?,
            fail_on: params.get_int("fail_on")?,
            calls: 0,
        }))
    }
}

impl Processor for RecordingProcessor {
    fn type_tag(&self) -> &'static str {
        "RecordingProcessor"
    }

    fn initialize(&mut self, job: &JobContext<'_>) -> Result<(), ProcessorError> {
        record(&self.name, Stage::Initialize { job: job.job });
        Ok(())
    }

    fn process(&mut self, event: &mut Event, _sink: &mut dyn OutputSink) -> Result<Flow, ProcessorError> {
        self.calls += 1;
        record(
            &self.name,
            Stage::Process {
                record: event.number(),
                poly_order: self.poly_order,
            },
        );
        let number = event.number() as i64;
        if number == self.fail_on {
            return Err(ProcessorError::Failed(format!("told to fail on record {}", number)));
        }
        if number == self.stop_on {
            return Ok(Flow::Stop);
        }
        Ok(Flow::Continue)
    }

    fn finalize(&mut self, sink: &mut dyn OutputSink) -> Result<(), ProcessorError> {
        record(&self.name, Stage::Finalize { calls: self.calls });
        let mut row = Map::new();
        row.insert("calls".to_string(), Value::from(self.calls));
        sink.write_entry(&OutputEntry::Tuple {
            tree: self.name.clone(),
            row,
        })?;
        Ok(())
    }
}

/// Always rejects its parameters at construction.
pub struct BrokenProcessor;

impl BrokenProcessor {
    pub fn create(_name: &str, _params: &ParameterSet) -> Result<Box<dyn Processor>, ProcessorError> {
        Err(ProcessorError::InvalidParameter {
            key: "threshold".to_string(),
            reason: "must be positive".to_string(),
        })
    }
}

pub fn test_library() -> Library {
    Library::new(TEST_LIBRARY)
        .register(ProcessorRegistration {
            type_tag: "RecordingProcessor",
            description: "Records lifecycle calls",
            run_modes: &[RunMode::Event, RunMode::Histogram],
            schema: RecordingProcessor::schema,
            factory: RecordingProcessor::create,
        })
        .register(ProcessorRegistration {
            type_tag: "BrokenProcessor",
            description: "Never constructs",
            run_modes: &[RunMode::Event],
            schema: Vec::new,
            factory: BrokenProcessor::create,
        })
}
