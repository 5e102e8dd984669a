// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Record input and result output.
//!
//! Inputs are JSON Lines files of records. Outputs are JSON Lines files of
//! [`OutputEntry`] values, which histogram-mode runs read back in.

mod input;
mod output;

pub use input::{load_histograms, read_entries, RecordReader};
pub use output::{MemorySink, OutputEntry, OutputFile};
