// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for sequencer lifecycle and dispatch events.
//!
//! This module contains message types for logging events related to:
//! * Run start and completion
//! * Job (output file) start and completion
//! * Per-record failures and the event limit

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;
use tracing::Span;

/// Sequencer run started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunStarted<'a> {
    pub run_mode: &'a str,
    pub processor_count: usize,
    pub job_count: usize,
    pub max_events: Option<u64>,
}

impl Display for RunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting {} run: {} processors, {} job(s)",
            self.run_mode, self.processor_count, self.job_count
        )?;
        match self.max_events {
            Some(limit) => write!(f, ", max_events={}", limit),
            None => Ok(()),
        }
    }
}

impl StructuredLog for RunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            run_mode = self.run_mode,
            processor_count = self.processor_count,
            job_count = self.job_count,
            max_events = ?self.max_events,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run",
            span_name = name,
            run_mode = self.run_mode,
            processor_count = self.processor_count,
            job_count = self.job_count,
        )
    }
}

/// Sequencer run completed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunCompleted {
    pub records: u64,
    pub skipped: u64,
    pub truncated: bool,
    pub duration: Duration,
}

impl Display for RunCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Run completed: {} records ({} skipped) in {:?}",
            self.records, self.skipped, self.duration
        )?;
        if self.truncated {
            write!(f, ", stopped at event limit")?;
        }
        Ok(())
    }
}

impl StructuredLog for RunCompleted {
    fn log(&self) {
        tracing::info!(
            records = self.records,
            skipped = self.skipped,
            truncated = self.truncated,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}

/// A job (one output file with its inputs) started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct JobStarted<'a> {
    pub job: usize,
    pub input_count: usize,
    pub output: &'a Path,
}

impl Display for JobStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Job {}: {} input file(s) -> {}",
            self.job,
            self.input_count,
            self.output.display()
        )
    }
}

impl StructuredLog for JobStarted<'_> {
    fn log(&self) {
        tracing::info!(
            job = self.job,
            input_count = self.input_count,
            output = %self.output.display(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "job",
            span_name = name,
            job = self.job,
            output = %self.output.display(),
        )
    }
}

/// A job finished and its output was closed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct JobCompleted<'a> {
    pub job: usize,
    pub records: u64,
    pub entries_written: u64,
    pub output: &'a Path,
}

impl Display for JobCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Job {} completed: {} records, {} entries written to {}",
            self.job,
            self.records,
            self.entries_written,
            self.output.display()
        )
    }
}

impl StructuredLog for JobCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            job = self.job,
            records = self.records,
            entries_written = self.entries_written,
            output = %self.output.display(),
            "{}", self
        );
    }
}

/// The configured event limit was reached.
///
/// # Log Level
/// `info!` - Important operational event
pub struct MaxEventsReached {
    pub limit: u64,
    pub remaining_jobs: usize,
}

impl Display for MaxEventsReached {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Reached max_events={}, {} remaining job(s) not run",
            self.limit, self.remaining_jobs
        )
    }
}

impl StructuredLog for MaxEventsReached {
    fn log(&self) {
        tracing::info!(
            limit = self.limit,
            remaining_jobs = self.remaining_jobs,
            "{}", self
        );
    }
}

/// A record failed and was skipped under the skip-record policy.
///
/// # Log Level
/// `warn!` - Degraded but continuing
pub struct RecordSkipped<'a> {
    pub record: u64,
    pub processor: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for RecordSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Skipping record {} after processor '{}' failed: {}",
            self.record, self.processor, self.error
        )
    }
}

impl StructuredLog for RecordSkipped<'_> {
    fn log(&self) {
        tracing::warn!(
            record = self.record,
            processor = self.processor,
            error = %self.error,
            "{}", self
        );
    }
}

/// A record failed and the run is aborting under the fail-fast policy.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct RunAborted<'a> {
    pub record: u64,
    pub processor: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for RunAborted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Aborting run at record {}: processor '{}' failed: {}",
            self.record, self.processor, self.error
        )
    }
}

impl StructuredLog for RunAborted<'_> {
    fn log(&self) {
        tracing::error!(
            record = self.record,
            processor = self.processor,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "run_aborted",
            span_name = name,
            record = self.record,
            processor = self.processor,
        )
    }
}
