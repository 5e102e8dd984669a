// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // built-in processors
pub mod config;     // config, options, registry
pub mod engine;     // record dispatch
pub mod errors;     // error handling
pub mod io;         // record input, entry output
pub mod observability;
pub mod traits;     // processor and sink abstractions
pub mod utils;      // histograms and fitting
