// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Processor implementations.
//!
//! # Available Backends
//!
//! ## Local Backend
//! The built-in processors, compiled in and published through the
//! registry as `libprocessors`:
//! - **Event mode**: event header stamping, selections with cut flows,
//!   derived fields, 1D and 2D histogram filling, tuple writing
//! - **Histogram mode**: profile fitting of 2D histograms
//!
//! ## Stub Backend (Test-Only)
//! Processors that record their lifecycle calls, or refuse to construct,
//! for driving the sequencer in tests. Not available in production builds.
//!
//! # Architecture
//!
//! ```text
//! Config → Registry → Library → ProcessorRegistration → factory → Processor → Sequencer
//! ```
//!
//! A registration pairs a type tag with its parameter schema and a factory
//! function. Factories receive parameters already bound against the schema.
//!
//! # Examples
//!
//! ```rust
//! use hpstr::backends::local::LocalLibrary;
//! use hpstr::config::{bind_parameters, ParameterSet};
//!
//! let library = LocalLibrary::library();
//! let registration = library.find("TupleProcessor").unwrap();
//!
//! let mut supplied = ParameterSet::for_processor("vtxTuple");
//! supplied.set("branches", vec!["mass", "z"]);
//! let params = bind_parameters(&(registration.schema)(), &supplied).unwrap();
//!
//! let processor = (registration.factory)("vtxTuple", &params).unwrap();
//! assert_eq!(processor.type_tag(), "TupleProcessor");
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;
