// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural validation of a loaded configuration.
//!
//! These checks only look at the config itself. Anything that needs the
//! registry (type tags, run mode support, parameter schemas) is checked when
//! the runtime is built.
//!
//! The checks run in this order and every failure is collected:
//!
//! 1. **Sequence**: at least one processor is scheduled
//! 2. **Uniqueness**: processor names are unique
//! 3. **References**: every sequence entry names a defined processor
//! 4. **Options**: every `${name}` parameter refers to a declared option
//!    and every option default has its declared type

use std::collections::HashSet;

use crate::config::options::option_reference;
use crate::config::Config;
use crate::errors::ConfigurationError;

/// Validate a configuration, returning every problem found.
pub fn validate_config(cfg: &Config) -> Result<(), Vec<ConfigurationError>> {
    let mut errors = Vec::new();

    let sequence = cfg.sequence_names();
    if sequence.is_empty() {
        errors.push(ConfigurationError::EmptySequence);
    }

    let mut seen = HashSet::new();
    for processor in &cfg.processors {
        if !seen.insert(processor.name.as_str()) {
            errors.push(ConfigurationError::DuplicateProcessorName {
                name: processor.name.clone(),
            });
        }
    }

    let mut scheduled = HashSet::new();
    for name in &sequence {
        if !seen.contains(name) {
            errors.push(ConfigurationError::UnknownSequenceEntry { name: name.to_string() });
        } else if !scheduled.insert(*name) && cfg.sequence.is_some() {
            errors.push(ConfigurationError::DuplicateProcessorName { name: name.to_string() });
        }
    }

    for processor in &cfg.processors {
        for value in processor.parameters.values() {
            if let Some(option) = option_reference(value) {
                if !cfg.options.contains_key(option) {
                    errors.push(ConfigurationError::UnknownOption {
                        name: option.to_string(),
                    });
                }
            }
        }
    }

    for (name, spec) in &cfg.options {
        if let Some(default) = &spec.default {
            if default.coerce(spec.kind).is_none() {
                errors.push(ConfigurationError::InvalidOptionValue {
                    name: name.clone(),
                    value: default.to_string(),
                    expected: spec.kind.to_string(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
