// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use thiserror::Error;

use crate::errors::{InputError, OutputError, ProcessorError};

/// How the sequencer reacts when a processor fails on a record.
///
/// Neither strategy retries: processors fill histograms and write rows, so
/// running a record twice would double count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    /// Abort the whole run on the first failing record
    #[default]
    FailFast,
    /// Log the failure, drop the rest of the sequence for that record and move on
    SkipRecord,
}

impl std::fmt::Display for FailureStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureStrategy::FailFast => write!(f, "fail_fast"),
            FailureStrategy::SkipRecord => write!(f, "skip_record"),
        }
    }
}

/// A processor failed while handling a specific record.
#[derive(Error, Debug)]
#[error("Processor '{processor}' failed on record {record}: {source}")]
pub struct RecordProcessingError {
    pub processor: String,
    pub record: u64,
    #[source]
    pub source: ProcessorError,
}

/// Errors raised while a sequencer is dispatching records.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error(transparent)]
    Record(#[from] RecordProcessingError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Output(#[from] OutputError),

    /// A processor could not be created or initialized at job start
    #[error("Processor '{processor}' failed to initialize: {source}")]
    Initialize {
        processor: String,
        #[source]
        source: ProcessorError,
    },

    /// A processor failed while writing its end-of-job results
    #[error("Processor '{processor}' failed to finalize: {source}")]
    Finalize {
        processor: String,
        #[source]
        source: ProcessorError,
    },
}
