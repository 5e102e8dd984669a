// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration loading and validation.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

/// A configuration file was parsed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ConfigurationLoaded<'a> {
    pub path: &'a Path,
    pub processor_count: usize,
}

impl Display for ConfigurationLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded configuration '{}' with {} processor(s)",
            self.path.display(),
            self.processor_count
        )
    }
}

impl StructuredLog for ConfigurationLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = %self.path.display(),
            processor_count = self.processor_count,
            "{}", self
        );
    }
}

/// Validation started.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ValidationStarted {
    pub processor_count: usize,
}

impl Display for ValidationStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Validating configuration with {} processor(s)", self.processor_count)
    }
}

impl StructuredLog for ValidationStarted {
    fn log(&self) {
        tracing::debug!(processor_count = self.processor_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "validation",
            span_name = name,
            processor_count = self.processor_count,
        )
    }
}

/// Validation passed.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ValidationCompleted {
    pub processor_count: usize,
}

impl Display for ValidationCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Configuration valid: {} processor(s)", self.processor_count)
    }
}

impl StructuredLog for ValidationCompleted {
    fn log(&self) {
        tracing::debug!(processor_count = self.processor_count, "{}", self);
    }
}

/// Validation found errors.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ValidationFailed {
    pub error_count: usize,
}

impl Display for ValidationFailed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Configuration validation failed with {} error(s)", self.error_count)
    }
}

impl StructuredLog for ValidationFailed {
    fn log(&self) {
        tracing::error!(error_count = self.error_count, "{}", self);
    }
}
