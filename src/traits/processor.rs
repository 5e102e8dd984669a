// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

use crate::config::RunMode;
use crate::engine::Event;
use crate::errors::ProcessorError;
use crate::traits::OutputSink;

/// What the sequencer should do with the current record after a processor ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Hand the record to the next processor in the sequence
    Continue,
    /// Skip the rest of the sequence for this record; not an error
    Stop,
}

/// The job a processor instance is about to run in.
#[derive(Debug, Clone, Copy)]
pub struct JobContext<'a> {
    pub job: usize,
    pub run_mode: RunMode,
    pub inputs: &'a [PathBuf],
    pub output: &'a Path,
}

/// A unit of work in a processing sequence.
///
/// Instances are created fresh for every job, so state accumulated in
/// `process` (histograms, counters) belongs to exactly one output. The
/// sequencer calls `initialize` once, `process` once per record until the
/// job's inputs are exhausted or the event limit is hit, then `finalize`.
pub trait Processor {
    /// The registered type tag this instance was built from.
    fn type_tag(&self) -> &'static str;

    fn initialize(&mut self, _job: &JobContext<'_>) -> Result<(), ProcessorError> {
        Ok(())
    }

    fn process(&mut self, event: &mut Event, sink: &mut dyn OutputSink) -> Result<Flow, ProcessorError>;

    /// Write end-of-job results.
    fn finalize(&mut self, _sink: &mut dyn OutputSink) -> Result<(), ProcessorError> {
        Ok(())
    }
}
