// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for processor resolution and lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Type tag resolution against loaded libraries
//! * Parameter binding
//! * Processor initialization and finalization

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// A processor's type tag resolved to a library registration.
///
/// # Log Level
/// `debug!` - Diagnostic detail
///
/// # Example
/// ```
/// use hpstr::observability::messages::processor::ProcessorResolved;
///
/// let msg = ProcessorResolved {
///     processor: "sel",
///     type_tag: "SelectionProcessor",
///     library: "libprocessors",
/// };
///
/// assert_eq!(msg.to_string(), "Resolved processor 'sel' as SelectionProcessor from libprocessors");
/// ```
pub struct ProcessorResolved<'a> {
    pub processor: &'a str,
    pub type_tag: &'a str,
    pub library: &'a str,
}

impl Display for ProcessorResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolved processor '{}' as {} from {}",
            self.processor, self.type_tag, self.library
        )
    }
}

impl StructuredLog for ProcessorResolved<'_> {
    fn log(&self) {
        tracing::debug!(
            processor = self.processor,
            type_tag = self.type_tag,
            library = self.library,
            "{}", self
        );
    }
}

/// A processor's parameters were bound against its schema.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ProcessorBound<'a> {
    pub processor: &'a str,
    pub parameter_count: usize,
}

impl Display for ProcessorBound<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Bound {} parameter(s) for processor '{}'",
            self.parameter_count, self.processor
        )
    }
}

impl StructuredLog for ProcessorBound<'_> {
    fn log(&self) {
        tracing::debug!(
            processor = self.processor,
            parameter_count = self.parameter_count,
            "{}", self
        );
    }
}

/// A supplied parameter is not declared by the processor's schema.
///
/// # Log Level
/// `warn!` - Probably a typo in the configuration
pub struct UnknownParameterIgnored<'a> {
    pub processor: &'a str,
    pub key: &'a str,
}

impl Display for UnknownParameterIgnored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' does not declare parameter '{}', ignoring it",
            self.processor, self.key
        )
    }
}

impl StructuredLog for UnknownParameterIgnored<'_> {
    fn log(&self) {
        tracing::warn!(processor = self.processor, key = self.key, "{}", self);
    }
}

/// A processor instance was created and initialized for a job.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ProcessorInitialized<'a> {
    pub processor: &'a str,
    pub job: usize,
}

impl Display for ProcessorInitialized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Initialized processor '{}' for job {}", self.processor, self.job)
    }
}

impl StructuredLog for ProcessorInitialized<'_> {
    fn log(&self) {
        tracing::debug!(processor = self.processor, job = self.job, "{}", self);
    }
}

/// A processor wrote its end-of-job results.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ProcessorFinalized<'a> {
    pub processor: &'a str,
    pub calls: u64,
}

impl Display for ProcessorFinalized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Finalized processor '{}' after {} call(s)",
            self.processor, self.calls
        )
    }
}

impl StructuredLog for ProcessorFinalized<'_> {
    fn log(&self) {
        tracing::debug!(processor = self.processor, calls = self.calls, "{}", self);
    }
}

/// A processor-specific per-record diagnostic, raised to `debug!` only when the
/// processor's `debug` parameter is set.
pub struct ProcessorTrace<'a> {
    pub processor: &'a str,
    pub record: u64,
    pub detail: &'a str,
}

impl Display for ProcessorTrace<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "[{}] record {}: {}", self.processor, self.record, self.detail)
    }
}

impl StructuredLog for ProcessorTrace<'_> {
    fn log(&self) {
        tracing::debug!(processor = self.processor, record = self.record, "{}", self);
    }
}

/// A histogram a processor expected was absent from the record.
///
/// # Log Level
/// `warn!` - The processor continues without it
pub struct HistogramMissing<'a> {
    pub processor: &'a str,
    pub histogram: &'a str,
}

impl Display for HistogramMissing<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' found no histogram named '{}'",
            self.processor, self.histogram
        )
    }
}

impl StructuredLog for HistogramMissing<'_> {
    fn log(&self) {
        tracing::warn!(processor = self.processor, histogram = self.histogram, "{}", self);
    }
}
