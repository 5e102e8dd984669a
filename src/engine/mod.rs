// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod event;
pub mod sequencer;

pub use event::Event;
pub use sequencer::{OutputSummary, RunSummary, SequenceStep, Sequencer, StepSummary};
