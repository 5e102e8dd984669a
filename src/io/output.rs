// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::errors::OutputError;
use crate::traits::OutputSink;
use crate::utils::{Histogram1D, Histogram2D};

/// One line of an output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputEntry {
    Tuple { tree: String, row: Map<String, Value> },
    Histogram1d(Histogram1D),
    Histogram2d(Histogram2D),
}

/// A buffered JSON Lines output file.
///
/// Dropping the file flushes whatever is buffered; [`OutputFile::finish`]
/// does the same but reports the flush error.
#[derive(Debug)]
pub struct OutputFile {
    path: PathBuf,
    writer: BufWriter<File>,
    entries_written: u64,
}

impl OutputFile {
    /// Create (or truncate) `path`, creating missing parent directories.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, OutputError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| OutputError::Create {
                path: path.clone(),
                source,
            })?;
        }
        let file = File::create(&path).map_err(|source| OutputError::Create {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            entries_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries_written(&self) -> u64 {
        self.entries_written
    }

    /// Flush and close, returning the number of entries written.
    pub fn finish(mut self) -> Result<u64, OutputError> {
        self.writer.flush().map_err(|source| OutputError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.entries_written)
    }
}

impl OutputSink for OutputFile {
    fn write_entry(&mut self, entry: &OutputEntry) -> Result<(), OutputError> {
        serde_json::to_writer(&mut self.writer, entry)?;
        self.writer
            .write_all(b"\n")
            .map_err(|source| OutputError::Write {
                path: self.path.clone(),
                source,
            })?;
        self.entries_written += 1;
        Ok(())
    }
}

/// In-memory sink, handy for driving processors directly.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub entries: Vec<OutputEntry>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputSink for MemorySink {
    fn write_entry(&mut self, entry: &OutputEntry) -> Result<(), OutputError> {
        self.entries.push(entry.clone());
        Ok(())
    }
}
