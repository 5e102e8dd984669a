// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message is a small struct with a `Display` implementation for the
//! human-readable line and a [`StructuredLog`] implementation that emits it
//! with typed fields at the right level.
//!
//! * `engine` - sequencer run, job and record events
//! * `processor` - processor resolution, binding and lifecycle events
//! * `validation` - configuration loading and validation events
//!
//! # Usage Pattern
//!
//! ```rust
//! use hpstr::observability::messages::engine::RunStarted;
//! use hpstr::observability::messages::StructuredLog;
//!
//! let msg = RunStarted {
//!     run_mode: "event",
//!     processor_count: 6,
//!     job_count: 1,
//!     max_events: Some(1000),
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod engine;
pub mod processor;
pub mod validation;

/// Emit a message as a structured tracing event, or open a span carrying its fields.
pub trait StructuredLog {
    fn log(&self);

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("hpstr", span_name = name)
    }
}
