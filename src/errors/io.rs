// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading input record files.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to open input '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read input '{}' at line {line}: {source}", .path.display())]
    Read {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record in '{}' at line {line}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record in '{}' at line {line} is not a JSON object", .path.display())]
    NotAnObject { path: PathBuf, line: usize },

    #[error("Invalid histogram in '{}' at line {line}: {source}", .path.display())]
    InvalidHistogram {
        path: PathBuf,
        line: usize,
        #[source]
        source: crate::errors::HistogramError,
    },
}

/// Failures while creating or writing output files.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output '{}': {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode output entry: {0}")]
    Encode(#[from] serde_json::Error),
}
