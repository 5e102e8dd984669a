// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::OutputError;
use crate::io::OutputEntry;

/// Destination for the entries a processor produces.
///
/// The sequencer hands every processor the sink of the job it is running,
/// so all processors in a job write into the same output.
pub trait OutputSink {
    fn write_entry(&mut self, entry: &OutputEntry) -> Result<(), OutputError>;
}
