// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod execution;
mod histogram;
mod io;
mod processor;

use thiserror::Error;

pub use config::ConfigurationError;
pub use execution::{ExecutionError, FailureStrategy, RecordProcessingError};
pub use histogram::HistogramError;
pub use io::{InputError, OutputError};
pub use processor::{ParameterTypeError, ProcessorError, UnresolvedProcessorError};

/// Top-level error for a complete configure-build-run cycle.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Unresolved(#[from] UnresolvedProcessorError),

    #[error(transparent)]
    ParameterType(#[from] ParameterTypeError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl PipelineError {
    /// Process exit code for this error.
    ///
    /// Anything caught before dispatch exits with 2, failures during the run with 1.
    /// Outputs are all created before the first record, so a create failure
    /// counts as a setup error.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Configuration(_)
            | PipelineError::Unresolved(_)
            | PipelineError::ParameterType(_)
            | PipelineError::Execution(ExecutionError::Output(OutputError::Create { .. })) => 2,
            PipelineError::Execution(_) => 1,
        }
    }
}
