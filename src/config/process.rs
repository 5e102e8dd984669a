// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The assembled run: run mode, libraries, processor sequence, files and limits.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::consts::{DEFAULT_OUTPUT_DIR, DEFAULT_OUTPUT_TEMPLATE};
use crate::config::naming::{expand_output_template, NamingContext};
use crate::config::{Config, ParameterSet, ParameterValue, RunOptions};
use crate::errors::{ConfigurationError, FailureStrategy};

/// What a record is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Each line of each input file is a record
    #[default]
    Event,
    /// Each input file is one record whose histograms come from a previous run
    Histogram,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Event => write!(f, "event"),
            RunMode::Histogram => write!(f, "histogram"),
        }
    }
}

/// A named processor instance: type tag plus parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorSpec {
    name: String,
    type_tag: String,
    parameters: ParameterSet,
}

impl ProcessorSpec {
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            parameters: ParameterSet::for_processor(name.clone()),
            name,
            type_tag: type_tag.into(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.set_parameter(key, value);
        self
    }

    /// Store a parameter; the last write for a key wins.
    pub fn set_parameter(&mut self, key: impl Into<String>, value: impl Into<ParameterValue>) {
        self.parameters.set(key, value);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }
}

/// One output file and the inputs that feed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub index: usize,
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
}

/// Command-line replacements for the file and limit settings of a config.
#[derive(Debug, Clone, Default)]
pub struct IoOverrides {
    pub inputs: Vec<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub max_events: Option<i64>,
}

/// A configured run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Process {
    run_mode: RunMode,
    libraries: Vec<String>,
    sequence: Vec<ProcessorSpec>,
    input_files: Vec<PathBuf>,
    output_files: Vec<PathBuf>,
    max_events: Option<u64>,
    failure_strategy: FailureStrategy,
}

impl Process {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a process from a loaded config.
    ///
    /// `${name}` parameters are replaced from `options`. When the config lists
    /// no output files, or inputs come from `overrides`, one output per input
    /// is derived from the output template.
    pub fn from_config(
        cfg: &Config,
        options: &RunOptions,
        overrides: &IoOverrides,
    ) -> Result<Self, ConfigurationError> {
        let mut process = Process::new();
        process.set_run_mode(cfg.run_mode);
        process.set_failure_strategy(cfg.failure_strategy);
        for library in &cfg.libraries {
            process.add_library(library.clone());
        }

        let mut sequence = Vec::new();
        for name in cfg.sequence_names() {
            let pc = cfg
                .processor(name)
                .ok_or_else(|| ConfigurationError::UnknownSequenceEntry { name: name.to_string() })?;
            let mut spec = ProcessorSpec::new(pc.name.clone(), pc.type_tag.clone());
            for (key, value) in &pc.parameters {
                spec.set_parameter(key.clone(), options.substitute(value)?);
            }
            sequence.push(spec);
        }
        process.set_sequence(sequence)?;

        let inputs = if overrides.inputs.is_empty() {
            cfg.input_files.clone()
        } else {
            overrides.inputs.clone()
        };

        let out_dir = overrides
            .out_dir
            .clone()
            .or_else(|| cfg.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let outputs = if cfg.output_files.is_empty() || !overrides.inputs.is_empty() {
            let template = cfg.output_template.as_deref().unwrap_or(DEFAULT_OUTPUT_TEMPLATE);
            inputs
                .iter()
                .map(|input| {
                    expand_output_template(
                        template,
                        &NamingContext {
                            input: input.as_path(),
                            out_dir: out_dir.as_path(),
                            run_mode: cfg.run_mode,
                            options,
                        },
                    )
                })
                .collect::<Result<Vec<_>, _>>()?
        } else {
            match &overrides.out_dir {
                Some(dir) => cfg.output_files.iter().map(|p| rebase(p, dir)).collect(),
                None => cfg.output_files.clone(),
            }
        };

        process.set_input_files(inputs);
        process.set_output_files(outputs);
        process.set_max_events(
            overrides
                .max_events
                .or(cfg.max_events)
                .and_then(|n| u64::try_from(n).ok()),
        );

        Ok(process)
    }

    pub fn add_library(&mut self, name: impl Into<String>) {
        self.libraries.push(name.into());
    }

    /// Replace the execution order. The sequence must be non-empty with unique names.
    pub fn set_sequence(&mut self, sequence: Vec<ProcessorSpec>) -> Result<(), ConfigurationError> {
        if sequence.is_empty() {
            return Err(ConfigurationError::EmptySequence);
        }
        let mut seen = HashSet::new();
        for spec in &sequence {
            if !seen.insert(spec.name()) {
                return Err(ConfigurationError::DuplicateProcessorName {
                    name: spec.name().to_string(),
                });
            }
        }
        self.sequence = sequence;
        Ok(())
    }

    pub fn set_input_files(&mut self, files: Vec<PathBuf>) {
        self.input_files = files;
    }

    pub fn set_output_files(&mut self, files: Vec<PathBuf>) {
        self.output_files = files;
    }

    pub fn set_run_mode(&mut self, run_mode: RunMode) {
        self.run_mode = run_mode;
    }

    /// `None` means no limit.
    pub fn set_max_events(&mut self, max_events: Option<u64>) {
        self.max_events = max_events;
    }

    pub fn set_failure_strategy(&mut self, strategy: FailureStrategy) {
        self.failure_strategy = strategy;
    }

    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }

    pub fn sequence(&self) -> &[ProcessorSpec] {
        &self.sequence
    }

    pub fn input_files(&self) -> &[PathBuf] {
        &self.input_files
    }

    pub fn output_files(&self) -> &[PathBuf] {
        &self.output_files
    }

    pub fn max_events(&self) -> Option<u64> {
        self.max_events
    }

    pub fn failure_strategy(&self) -> FailureStrategy {
        self.failure_strategy
    }

    /// Multi-line description of the assembled run, as printed before dispatch.
    pub fn summary(&self) -> String {
        self.to_string()
    }

    /// Pair inputs with outputs: one job per pair, or one merged job when a
    /// single output is configured. Every job needs its own output file.
    pub fn jobs(&self) -> Result<Vec<Job>, ConfigurationError> {
        if self.input_files.is_empty() {
            return Err(ConfigurationError::NoInputFiles);
        }
        if self.output_files.is_empty() {
            return Err(ConfigurationError::NoOutputFiles);
        }

        let mut seen = HashSet::new();
        if let Some(path) = self.output_files.iter().find(|p| !seen.insert(p.as_path())) {
            return Err(ConfigurationError::DuplicateOutput { path: path.clone() });
        }

        if self.output_files.len() == self.input_files.len() {
            Ok(self
                .input_files
                .iter()
                .zip(&self.output_files)
                .enumerate()
                .map(|(index, (input, output))| Job {
                    index,
                    inputs: vec![input.clone()],
                    output: output.clone(),
                })
                .collect())
        } else if self.output_files.len() == 1 {
            Ok(vec![Job {
                index: 0,
                inputs: self.input_files.clone(),
                output: self.output_files[0].clone(),
            }])
        } else {
            Err(ConfigurationError::MismatchedFiles {
                inputs: self.input_files.len(),
                outputs: self.output_files.len(),
            })
        }
    }
}

fn rebase(path: &Path, dir: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => dir.join(name),
        None => dir.to_path_buf(),
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Process")?;
        writeln!(f, "  run mode:         {}", self.run_mode)?;
        writeln!(f, "  failure strategy: {}", self.failure_strategy)?;
        match self.max_events {
            Some(n) => writeln!(f, "  max events:       {}", n)?,
            None => writeln!(f, "  max events:       unlimited")?,
        }
        writeln!(f, "  libraries:        [{}]", self.libraries.join(", "))?;
        writeln!(f, "  sequence:")?;
        for (i, spec) in self.sequence.iter().enumerate() {
            writeln!(f, "    {}. {} ({})", i + 1, spec.name, spec.type_tag)?;
            for (key, value) in spec.parameters.iter() {
                writeln!(f, "         {} = {}", key, value)?;
            }
        }
        writeln!(f, "  input files:")?;
        for path in &self.input_files {
            writeln!(f, "    {}", path.display())?;
        }
        writeln!(f, "  output files:")?;
        for path in &self.output_files {
            writeln!(f, "    {}", path.display())?;
        }
        Ok(())
    }
}
