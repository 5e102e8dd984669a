// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{bind_parameters, Process, Registry};
use crate::engine::{SequenceStep, Sequencer};
use crate::errors::{ConfigurationError, PipelineError, ProcessorError};
use crate::observability::messages::processor::{ProcessorBound, ProcessorResolved};
use crate::observability::messages::StructuredLog;

/// Resolves a [`Process`] against a [`Registry`] into a ready-to-run [`Sequencer`].
///
/// Everything that can be checked without reading a record is checked here,
/// in this order:
///
/// 1. the sequence is non-empty
/// 2. every loaded library is known
/// 3. every type tag resolves in a loaded library
/// 4. every processor supports the run mode
/// 5. parameters bind against the registration schema
/// 6. every processor can be constructed from its bound parameters
/// 7. input and output files pair up into jobs
///
/// # Examples
///
/// ```
/// use hpstr::config::{Process, ProcessorSpec, Registry, RuntimeBuilder};
/// use hpstr::errors::PipelineError;
///
/// let mut process = Process::new();
/// process.add_library("libprocessors.so");
/// process
///     .set_sequence(vec![ProcessorSpec::new("track", "TrackingProcessor")])
///     .unwrap();
///
/// let err = RuntimeBuilder::build(&process, &Registry::builtin()).unwrap_err();
/// assert!(matches!(err, PipelineError::Unresolved(_)));
/// assert_eq!(err.exit_code(), 2);
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    pub fn build(process: &Process, registry: &Registry) -> Result<Sequencer, PipelineError> {
        if process.sequence().is_empty() {
            return Err(ConfigurationError::EmptySequence.into());
        }
        registry.check_libraries(process.libraries())?;

        let mut steps = Vec::with_capacity(process.sequence().len());
        for spec in process.sequence() {
            let (library, registration) = registry.resolve(process.libraries(), spec.name(), spec.type_tag())?;
            ProcessorResolved {
                processor: spec.name(),
                type_tag: registration.type_tag,
                library: library.name(),
            }
            .log();

            if !registration.supports(process.run_mode()) {
                return Err(ConfigurationError::UnsupportedRunMode {
                    processor: spec.name().to_string(),
                    type_tag: registration.type_tag.to_string(),
                    run_mode: process.run_mode().to_string(),
                }
                .into());
            }

            let parameters = bind_parameters(&(registration.schema)(), spec.parameters())?;
            ProcessorBound {
                processor: spec.name(),
                parameter_count: parameters.len(),
            }
            .log();

            // Trial construction; the instance is discarded and rebuilt per job.
            (registration.factory)(spec.name(), &parameters).map_err(|e| construction_error(spec.name(), e))?;

            steps.push(SequenceStep {
                name: spec.name().to_string(),
                type_tag: registration.type_tag,
                parameters,
                factory: registration.factory,
            });
        }

        let jobs = process.jobs()?;

        Ok(Sequencer::new(
            steps,
            jobs,
            process.run_mode(),
            process.max_events(),
            process.failure_strategy(),
        ))
    }
}

fn construction_error(processor: &str, error: ProcessorError) -> PipelineError {
    match error {
        ProcessorError::Parameter(e) => PipelineError::ParameterType(e),
        ProcessorError::InvalidParameter { key, reason } => ConfigurationError::InvalidParameter {
            processor: processor.to_string(),
            key,
            reason,
        }
        .into(),
        other => ConfigurationError::Instantiation {
            processor: processor.to_string(),
            reason: other.to_string(),
        }
        .into(),
    }
}
