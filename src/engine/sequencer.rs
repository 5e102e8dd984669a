// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Sequential record dispatch.
//!
//! # Execution Model
//!
//! Every output file is opened before the first record is read. Jobs then
//! run one after another:
//!
//! 1. Build a fresh processor instance for every step and `initialize` them
//!    in sequence order.
//! 2. For every record of the job's inputs, call each processor in sequence
//!    order. A [`Flow::Stop`] ends the sequence for that record only.
//! 3. `finalize` every processor in sequence order, then flush and close the
//!    job's output.
//!
//! The event limit counts records across the whole run. Reaching it ends
//! the current job normally and leaves later jobs unrun; no further input
//! is opened for dispatch. The run counts as truncated only when a record
//! was left unread.
//!
//! # Failure Handling
//!
//! * [`FailureStrategy::FailFast`]: the first failing record aborts the run
//!   without finalizing. Buffered output is still flushed on drop.
//! * [`FailureStrategy::SkipRecord`]: the rest of the sequence is skipped
//!   for the failing record and dispatch continues.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::{Job, ParameterSet, ProcessorFactory, RunMode};
use crate::engine::Event;
use crate::errors::{ExecutionError, FailureStrategy, RecordProcessingError};
use crate::io::{load_histograms, OutputFile, RecordReader};
use crate::observability::messages::engine::{
    JobCompleted, JobStarted, MaxEventsReached, RecordSkipped, RunAborted, RunCompleted, RunStarted,
};
use crate::observability::messages::processor::{ProcessorFinalized, ProcessorInitialized};
use crate::observability::messages::StructuredLog;
use crate::traits::{Flow, JobContext, Processor};

/// One resolved entry of the processor sequence.
#[derive(Clone)]
pub struct SequenceStep {
    pub name: String,
    pub type_tag: &'static str,
    pub parameters: ParameterSet,
    pub factory: ProcessorFactory,
}

impl fmt::Debug for SequenceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceStep")
            .field("name", &self.name)
            .field("type_tag", &self.type_tag)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Per-step dispatch counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepSummary {
    pub name: String,
    pub type_tag: String,
    pub calls: u64,
    pub stops: u64,
    pub failures: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSummary {
    pub path: PathBuf,
    pub entries: u64,
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Records handed to the sequence
    pub records_read: u64,
    /// Records every step returned `Continue` for
    pub records_completed: u64,
    /// Records a step ended early with `Stop`
    pub records_stopped: u64,
    /// Records dropped after a failure under `SkipRecord`
    pub records_skipped: u64,
    pub steps: Vec<StepSummary>,
    pub outputs: Vec<OutputSummary>,
    /// The event limit left at least one record unread
    pub truncated: bool,
    pub duration: Duration,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run summary")?;
        writeln!(
            f,
            "  records: {} read, {} completed, {} stopped, {} skipped{}",
            self.records_read,
            self.records_completed,
            self.records_stopped,
            self.records_skipped,
            if self.truncated { " (event limit reached)" } else { "" }
        )?;
        for step in &self.steps {
            writeln!(
                f,
                "  {:<20} {:<24} calls={} stops={} failures={}",
                step.name, step.type_tag, step.calls, step.stops, step.failures
            )?;
        }
        for output in &self.outputs {
            writeln!(f, "  wrote {} entries to {}", output.entries, output.path.display())?;
        }
        write!(f, "  elapsed: {:?}", self.duration)
    }
}

/// Runs a resolved processor sequence over a set of jobs.
#[derive(Debug, Clone)]
pub struct Sequencer {
    steps: Vec<SequenceStep>,
    jobs: Vec<Job>,
    run_mode: RunMode,
    max_events: Option<u64>,
    failure_strategy: FailureStrategy,
}

struct Instance {
    name: String,
    processor: Box<dyn Processor>,
}

impl Sequencer {
    pub fn new(
        steps: Vec<SequenceStep>,
        jobs: Vec<Job>,
        run_mode: RunMode,
        max_events: Option<u64>,
        failure_strategy: FailureStrategy,
    ) -> Self {
        Self {
            steps,
            jobs,
            run_mode,
            max_events,
            failure_strategy,
        }
    }

    pub fn steps(&self) -> &[SequenceStep] {
        &self.steps
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn run(&self) -> Result<RunSummary, ExecutionError> {
        let started = Instant::now();
        let run_mode = self.run_mode.to_string();
        let start = RunStarted {
            run_mode: &run_mode,
            processor_count: self.steps.len(),
            job_count: self.jobs.len(),
            max_events: self.max_events,
        };
        let _run_span = start.span("sequencer_run").entered();
        start.log();

        let outputs = self
            .jobs
            .iter()
            .map(|job| OutputFile::create(&job.output))
            .collect::<Result<Vec<_>, _>>()?;

        let mut summary = RunSummary {
            steps: self
                .steps
                .iter()
                .map(|s| StepSummary {
                    name: s.name.clone(),
                    type_tag: s.type_tag.to_string(),
                    ..StepSummary::default()
                })
                .collect(),
            ..RunSummary::default()
        };

        for (position, (job, output)) in self.jobs.iter().zip(outputs).enumerate() {
            if self.limit_reached(&summary) {
                summary.truncated |= self.jobs[position..].iter().any(|job| self.has_unread(&job.inputs));
                break;
            }
            self.run_job(job, output, &mut summary)?;
        }

        if summary.truncated {
            if let Some(limit) = self.max_events {
                let done = summary.outputs.len();
                MaxEventsReached {
                    limit,
                    remaining_jobs: self.jobs.len().saturating_sub(done),
                }
                .log();
            }
        }

        summary.duration = started.elapsed();
        RunCompleted {
            records: summary.records_read,
            skipped: summary.records_skipped,
            truncated: summary.truncated,
            duration: summary.duration,
        }
        .log();

        Ok(summary)
    }

    fn limit_reached(&self, summary: &RunSummary) -> bool {
        self.max_events.is_some_and(|limit| summary.records_read >= limit)
    }

    /// Whether any of `inputs` still holds a record. Inputs that cannot be
    /// opened hold none; in histogram mode every input is one record.
    fn has_unread(&self, inputs: &[PathBuf]) -> bool {
        match self.run_mode {
            RunMode::Event => inputs
                .iter()
                .any(|input| RecordReader::open(input).is_ok_and(|mut records| records.next().is_some())),
            RunMode::Histogram => !inputs.is_empty(),
        }
    }

    fn run_job(&self, job: &Job, mut output: OutputFile, summary: &mut RunSummary) -> Result<(), ExecutionError> {
        let start = JobStarted {
            job: job.index,
            input_count: job.inputs.len(),
            output: &job.output,
        };
        let _job_span = start.span("job").entered();
        start.log();
        let records_before = summary.records_read;

        let ctx = JobContext {
            job: job.index,
            run_mode: self.run_mode,
            inputs: &job.inputs,
            output: &job.output,
        };

        let mut instances = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let mut processor = (step.factory)(&step.name, &step.parameters).map_err(|source| {
                ExecutionError::Initialize {
                    processor: step.name.clone(),
                    source,
                }
            })?;
            processor.initialize(&ctx).map_err(|source| ExecutionError::Initialize {
                processor: step.name.clone(),
                source,
            })?;
            ProcessorInitialized {
                processor: &step.name,
                job: job.index,
            }
            .log();
            instances.push(Instance {
                name: step.name.clone(),
                processor,
            });
        }

        for (position, input) in job.inputs.iter().enumerate() {
            if self.limit_reached(summary) {
                summary.truncated |= self.has_unread(&job.inputs[position..]);
                break;
            }
            match self.run_mode {
                RunMode::Event => {
                    let mut records = RecordReader::open(input)?;
                    while !self.limit_reached(summary) {
                        let Some(record) = records.next() else {
                            break;
                        };
                        let mut event = Event::new(summary.records_read, input.clone(), record?);
                        self.dispatch(&mut instances, &mut event, &mut output, summary)?;
                    }
                    if self.limit_reached(summary) && records.next().is_some() {
                        summary.truncated = true;
                    }
                }
                RunMode::Histogram => {
                    let histograms = load_histograms(input)?;
                    let mut event = Event::with_histograms(summary.records_read, input.clone(), histograms);
                    self.dispatch(&mut instances, &mut event, &mut output, summary)?;
                }
            }
        }

        for (index, instance) in instances.iter_mut().enumerate() {
            instance
                .processor
                .finalize(&mut output)
                .map_err(|source| ExecutionError::Finalize {
                    processor: instance.name.clone(),
                    source,
                })?;
            ProcessorFinalized {
                processor: &instance.name,
                calls: summary.steps[index].calls,
            }
            .log();
        }

        let entries = output.finish()?;
        JobCompleted {
            job: job.index,
            records: summary.records_read - records_before,
            entries_written: entries,
            output: &job.output,
        }
        .log();
        summary.outputs.push(OutputSummary {
            path: job.output.clone(),
            entries,
        });

        Ok(())
    }

    fn dispatch(
        &self,
        instances: &mut [Instance],
        event: &mut Event,
        output: &mut OutputFile,
        summary: &mut RunSummary,
    ) -> Result<(), ExecutionError> {
        summary.records_read += 1;

        for (index, instance) in instances.iter_mut().enumerate() {
            summary.steps[index].calls += 1;
            match instance.processor.process(event, output) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Stop) => {
                    summary.steps[index].stops += 1;
                    summary.records_stopped += 1;
                    return Ok(());
                }
                Err(source) => {
                    summary.steps[index].failures += 1;
                    let error = RecordProcessingError {
                        processor: instance.name.clone(),
                        record: event.number(),
                        source,
                    };
                    match self.failure_strategy {
                        FailureStrategy::FailFast => {
                            RunAborted {
                                record: error.record,
                                processor: &error.processor,
                                error: &error.source,
                            }
                            .log();
                            return Err(error.into());
                        }
                        FailureStrategy::SkipRecord => {
                            RecordSkipped {
                                record: error.record,
                                processor: &error.processor,
                                error: &error.source,
                            }
                            .log();
                            summary.records_skipped += 1;
                            return Ok(());
                        }
                    }
                }
            }
        }

        summary.records_completed += 1;
        Ok(())
    }
}
