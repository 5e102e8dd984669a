// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, validating or assembling a process configuration.
///
/// Every variant is fatal and surfaces before the first record is read.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// The configuration file could not be read
    #[error("Failed to read configuration '{}': {reason}", .path.display())]
    Io { path: PathBuf, reason: String },

    /// The configuration file is not valid YAML/TOML for the expected schema
    #[error("Failed to parse configuration '{}': {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    /// The configuration file extension is not one we know how to parse
    #[error("Unsupported configuration format '{}': expected .yaml, .yml or .toml", .path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The processor sequence has no entries
    #[error("Processor sequence is empty")]
    EmptySequence,

    /// Two processors share the same name
    #[error("Duplicate processor name: '{name}'")]
    DuplicateProcessorName { name: String },

    /// The sequence names a processor that is not defined
    #[error("Sequence entry '{name}' does not match any defined processor")]
    UnknownSequenceEntry { name: String },

    /// A library name does not match any known library
    #[error("Unknown library '{name}'")]
    UnknownLibrary { name: String },

    /// A required parameter was not supplied and has no default
    #[error("Processor '{processor}' is missing required parameter '{key}'")]
    MissingParameter { processor: String, key: String },

    /// A parameter value was well typed but rejected by the processor
    #[error("Processor '{processor}' rejected parameter '{key}': {reason}")]
    InvalidParameter {
        processor: String,
        key: String,
        reason: String,
    },

    /// A processor type does not support the configured run mode
    #[error("Processor '{processor}' ({type_tag}) does not support run mode '{run_mode}'")]
    UnsupportedRunMode {
        processor: String,
        type_tag: String,
        run_mode: String,
    },

    /// An option referenced on the command line or in a parameter is not declared
    #[error("Unknown option '{name}'")]
    UnknownOption { name: String },

    /// An option value could not be parsed into its declared type
    #[error("Option '{name}' expects {expected}, got '{value}'")]
    InvalidOptionValue {
        name: String,
        value: String,
        expected: String,
    },

    /// An option is referenced but has neither a default nor an override
    #[error("Option '{name}' has no default and was not set")]
    UnsetOption { name: String },

    /// Trial construction of a processor failed for a reason other than a parameter
    #[error("Processor '{processor}' could not be constructed: {reason}")]
    Instantiation { processor: String, reason: String },

    /// No input files were configured or supplied
    #[error("No input files configured")]
    NoInputFiles,

    /// No output files were configured or derived
    #[error("No output files configured")]
    NoOutputFiles,

    /// Output files cannot be paired with input files
    #[error("Cannot pair {outputs} output file(s) with {inputs} input file(s): expected {inputs} or 1")]
    MismatchedFiles { inputs: usize, outputs: usize },

    /// Two jobs would write the same output file
    #[error("Output '{}' is used by more than one job", .path.display())]
    DuplicateOutput { path: PathBuf },

    /// An output path template could not be expanded
    #[error("Output template '{template}' is invalid: {reason}")]
    Template { template: String, reason: String },

    /// Validation found several problems at once
    #[error("Configuration validation failed:\n{}", format_errors(.errors))]
    Validation { errors: Vec<ConfigurationError> },
}

fn format_errors(errors: &[ConfigurationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_lists_every_error() {
        let err = ConfigurationError::Validation {
            errors: vec![
                ConfigurationError::EmptySequence,
                ConfigurationError::DuplicateProcessorName {
                    name: "track".to_string(),
                },
            ],
        };

        let message = err.to_string();
        assert!(message.starts_with("Configuration validation failed:"));
        assert!(message.contains("  - Processor sequence is empty"));
        assert!(message.contains("  - Duplicate processor name: 'track'"));
    }
}
