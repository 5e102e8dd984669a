// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Helpers shared by the built-in processors.

use crate::config::{ParameterKind, ParameterSet, ParameterSpec};
use crate::errors::ProcessorError;
use crate::observability::messages::processor::ProcessorTrace;
use crate::observability::messages::StructuredLog;

pub fn debug_parameter() -> ParameterSpec {
    ParameterSpec::optional("debug", ParameterKind::Int, 0, "Log per-record detail when non-zero")
}

/// A string parameter, or `fallback` when it is empty.
pub fn string_or(params: &ParameterSet, key: &str, fallback: &str) -> Result<String, ProcessorError> {
    let value = params.get_string(key)?;
    if value.is_empty() {
        Ok(fallback.to_string())
    } else {
        Ok(value)
    }
}

pub fn invalid(key: &str, reason: impl Into<String>) -> ProcessorError {
    ProcessorError::InvalidParameter {
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Per-record trace, only emitted when the processor's `debug` parameter is set.
pub struct Tracer {
    processor: String,
    enabled: bool,
}

impl Tracer {
    pub fn new(processor: &str, params: &ParameterSet) -> Result<Self, ProcessorError> {
        Ok(Self {
            processor: processor.to_string(),
            enabled: params.get_int("debug")? != 0,
        })
    }

    pub fn trace(&self, record: u64, detail: impl FnOnce() -> String) {
        if self.enabled {
            let detail = detail();
            ProcessorTrace {
                processor: &self.processor,
                record,
                detail: &detail,
            }
            .log();
        }
    }
}
