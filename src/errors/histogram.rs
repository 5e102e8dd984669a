// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Failures building or transforming histograms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistogramError {
    #[error("Invalid axis: {bins} bins over [{min}, {max})")]
    InvalidAxis { bins: usize, min: f64, max: f64 },

    #[error("Cannot rebin {bins} bins by a factor of {factor}")]
    Rebin { bins: usize, factor: usize },

    #[error("Bin {bin} is out of range for an axis with {bins} bins")]
    BinOutOfRange { bin: usize, bins: usize },

    #[error("Cannot add histogram '{name}': axes differ")]
    IncompatibleAxes { name: String },

    #[error("Histogram '{name}' has {found} {what} values, expected {expected}")]
    BinCount {
        name: String,
        what: &'static str,
        expected: usize,
        found: usize,
    },
}
