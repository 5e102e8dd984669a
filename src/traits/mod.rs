// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod processor;
pub mod sink;

pub use processor::{Flow, JobContext, Processor};
pub use sink::OutputSink;
