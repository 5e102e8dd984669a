// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for processor resolution, parameter binding and per-record processing.

use crate::config::ParameterKind;
use crate::errors::{HistogramError, OutputError};
use thiserror::Error;

/// A processor's type tag is not provided by any loaded library.
#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "Processor '{processor}' has type '{type_tag}' which is not provided by any loaded library [{}]",
    .libraries.join(", ")
)]
pub struct UnresolvedProcessorError {
    pub processor: String,
    pub type_tag: String,
    pub libraries: Vec<String>,
}

/// A parameter value cannot be coerced to the kind the processor expects.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Parameter '{key}' of processor '{processor}' expects {expected}, found {found}")]
pub struct ParameterTypeError {
    pub processor: String,
    pub key: String,
    pub expected: ParameterKind,
    pub found: ParameterKind,
}

/// Failures reported by a processor instance.
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// A field the processor reads is absent from the record
    #[error("Record has no field '{field}'")]
    MissingField { field: String },

    /// A field exists but does not hold the expected kind of value
    #[error("Field '{field}' is not {expected}")]
    FieldType {
        field: String,
        expected: &'static str,
    },

    /// A bound parameter was rejected while building the processor
    #[error("Invalid parameter '{key}': {reason}")]
    InvalidParameter { key: String, reason: String },

    /// Reading a bound parameter failed
    #[error(transparent)]
    Parameter(#[from] ParameterTypeError),

    /// A histogram could not be built or transformed
    #[error(transparent)]
    Histogram(#[from] HistogramError),

    /// Writing to the output sink failed
    #[error(transparent)]
    Output(#[from] OutputError),

    /// Any other processing failure
    #[error("{0}")]
    Failed(String),
}
