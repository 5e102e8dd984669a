// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod common;

pub mod derived_field;
pub mod event_header;
pub mod histogram_1d;
pub mod histogram_2d;
pub mod profile_fit;
pub mod selection;
pub mod tuple;

pub use derived_field::DerivedFieldProcessor;
pub use event_header::EventHeaderProcessor;
pub use histogram_1d::Histogram1DProcessor;
pub use histogram_2d::Histogram2DProcessor;
pub use profile_fit::ProfileFitProcessor;
pub use selection::{Cut, SelectionProcessor};
pub use tuple::TupleProcessor;
