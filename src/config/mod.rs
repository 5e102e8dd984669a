// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod naming;
mod options;
mod parameters;
mod process;
mod registry;
mod runtime;
mod validation;

pub mod consts;

pub use loader::{load_and_validate_config, load_config, Config, ProcessorConfig};
pub use naming::{expand_output_template, NamingContext};
pub use options::{option_reference, parse_override, OptionSpec, RunOptions};
pub use parameters::{bind_parameters, ParameterKind, ParameterSet, ParameterSpec, ParameterValue};
pub use process::{IoOverrides, Job, Process, ProcessorSpec, RunMode};
pub use registry::{normalize_library_name, Library, ProcessorFactory, ProcessorRegistration, Registry};
pub use runtime::RuntimeBuilder;
pub use validation::validate_config;
