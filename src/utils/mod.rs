// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod fitting;
pub mod histogram;

pub use fitting::{iterative_gauss, profile_y, GaussEstimate, GaussFitOptions};
pub use histogram::{Axis, Histogram1D, Histogram2D, HistogramSet};
