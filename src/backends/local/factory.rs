// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::BUILTIN_LIBRARY;
use crate::config::{Library, ProcessorRegistration, RunMode};
use super::processors::*;

const EVENT: &[RunMode] = &[RunMode::Event];
const HISTOGRAM: &[RunMode] = &[RunMode::Histogram];

/// The processors compiled into the binary, published as `libprocessors`.
pub struct LocalLibrary;

impl LocalLibrary {
    /// Build the built-in library.
    ///
    /// Type tags are the processor struct names:
    /// - `EventHeaderProcessor` stamps event and run numbers
    /// - `SelectionProcessor` applies cuts and books a cut flow
    /// - `DerivedFieldProcessor` computes a field from others
    /// - `Histogram1DProcessor` and `Histogram2DProcessor` fill histograms
    /// - `TupleProcessor` writes rows
    /// - `ProfileFitProcessor` fits histogram slices (histogram mode)
    pub fn library() -> Library {
        Library::new(BUILTIN_LIBRARY)
            .register(ProcessorRegistration {
                type_tag: EventHeaderProcessor::TYPE_TAG,
                description: "Stamps event_number and run_number on each record",
                run_modes: EVENT,
                schema: EventHeaderProcessor::schema,
                factory: EventHeaderProcessor::create,
            })
            .register(ProcessorRegistration {
                type_tag: SelectionProcessor::TYPE_TAG,
                description: "Applies cuts in order and stops failing records",
                run_modes: EVENT,
                schema: SelectionProcessor::schema,
                factory: SelectionProcessor::create,
            })
            .register(ProcessorRegistration {
                type_tag: DerivedFieldProcessor::TYPE_TAG,
                description: "Combines numeric fields into a new field",
                run_modes: EVENT,
                schema: DerivedFieldProcessor::schema,
                factory: DerivedFieldProcessor::create,
            })
            .register(ProcessorRegistration {
                type_tag: Histogram1DProcessor::TYPE_TAG,
                description: "Fills a 1D histogram from a field",
                run_modes: EVENT,
                schema: Histogram1DProcessor::schema,
                factory: Histogram1DProcessor::create,
            })
            .register(ProcessorRegistration {
                type_tag: Histogram2DProcessor::TYPE_TAG,
                description: "Fills a 2D histogram from two fields",
                run_modes: EVENT,
                schema: Histogram2DProcessor::schema,
                factory: Histogram2DProcessor::create,
            })
            .register(ProcessorRegistration {
                type_tag: TupleProcessor::TYPE_TAG,
                description: "Writes selected fields as tuple rows",
                run_modes: EVENT,
                schema: TupleProcessor::schema,
                factory: TupleProcessor::create,
            })
            .register(ProcessorRegistration {
                type_tag: ProfileFitProcessor::TYPE_TAG,
                description: "Profiles 2D histograms with iterative Gaussian fits",
                run_modes: HISTOGRAM,
                schema: ProfileFitProcessor::schema,
                factory: ProfileFitProcessor::create,
            })
    }

    /// Every built-in type tag.
    pub fn list_available_implementations() -> Vec<&'static str> {
        Self::library().registrations().iter().map(|r| r.type_tag).collect()
    }

    pub fn is_implementation_available(type_tag: &str) -> bool {
        Self::list_available_implementations().contains(&type_tag)
    }
}
