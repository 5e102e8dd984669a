// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::consts::BUILTIN_LIBRARY;
use crate::config::{OptionSpec, ParameterValue, RunMode};
use crate::errors::{ConfigurationError, FailureStrategy};
use crate::observability::messages::validation::{
    ConfigurationLoaded, ValidationCompleted, ValidationFailed, ValidationStarted,
};
use crate::observability::messages::StructuredLog;

/// A process configuration file.
///
/// # Example
/// ```yaml
/// run_mode: event
/// libraries: [libprocessors.so]
/// max_events: 1000
/// failure_strategy: skip_record
/// options:
///   mass: { type: int, default: 145, help: "A' mass in MeV" }
/// processors:
///   - name: header
///     type: EventHeaderProcessor
///   - name: sel
///     type: SelectionProcessor
///     parameters:
///       cuts: ["chi2 < 10", "p > ${mass}"]
/// input_files: [run01.jsonl]
/// output_template: "{out_dir}/{stem}_m{mass}.jsonl"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub run_mode: RunMode,
    #[serde(default = "default_libraries")]
    pub libraries: Vec<String>,
    #[serde(default)]
    pub failure_strategy: FailureStrategy,
    /// Negative means unlimited
    #[serde(default)]
    pub max_events: Option<i64>,
    #[serde(default)]
    pub options: BTreeMap<String, OptionSpec>,
    pub processors: Vec<ProcessorConfig>,
    /// Execution order by processor name; declaration order when omitted
    #[serde(default)]
    pub sequence: Option<Vec<String>>,
    #[serde(default)]
    pub input_files: Vec<PathBuf>,
    #[serde(default)]
    pub output_files: Vec<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub output_template: Option<String>,
}

fn default_libraries() -> Vec<String> {
    vec![BUILTIN_LIBRARY.to_string()]
}

/// One processor instance in a configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProcessorConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterValue>,
}

impl Config {
    /// Processor names in execution order.
    pub fn sequence_names(&self) -> Vec<&str> {
        match &self.sequence {
            Some(names) => names.iter().map(String::as_str).collect(),
            None => self.processors.iter().map(|p| p.name.as_str()).collect(),
        }
    }

    pub fn processor(&self, name: &str) -> Option<&ProcessorConfig> {
        self.processors.iter().find(|p| p.name == name)
    }
}

/// Load a config from a YAML (`.yaml`, `.yml`) or TOML (`.toml`) file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigurationError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ConfigurationError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let parse_error = |reason: String| ConfigurationError::Parse {
        path: path.to_path_buf(),
        reason,
    };

    let cfg: Config = match extension.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        Some("toml") => toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        _ => {
            return Err(ConfigurationError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    ConfigurationLoaded {
        path,
        processor_count: cfg.processors.len(),
    }
    .log();

    Ok(cfg)
}

/// Load a config and validate its structure.
///
/// Every validation problem is collected; a single problem is returned as
/// is, several are wrapped in [`ConfigurationError::Validation`].
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigurationError> {
    let cfg = load_config(path)?;

    let started = ValidationStarted {
        processor_count: cfg.processors.len(),
    };
    let _span = started.span("validate_config").entered();
    started.log();

    if let Err(mut errors) = crate::config::validate_config(&cfg) {
        ValidationFailed {
            error_count: errors.len(),
        }
        .log();
        if errors.len() == 1 {
            return Err(errors.remove(0));
        }
        return Err(ConfigurationError::Validation { errors });
    }

    ValidationCompleted {
        processor_count: cfg.processors.len(),
    }
    .log();

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParameterKind;

    fn write_config(dir: &tempfile::TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
run_mode: histogram
max_events: -1
options:
  rebin: { type: int, default: 2 }
processors:
  - name: vtx
    type: ProfileFitProcessor
    parameters:
      rebin: ${rebin}
      selections: [vtxSelection]
input_files: [ana.jsonl]
"#;

        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.run_mode, RunMode::Histogram);
        assert_eq!(cfg.libraries, vec!["libprocessors"]);
        assert_eq!(cfg.failure_strategy, FailureStrategy::FailFast);
        assert_eq!(cfg.max_events, Some(-1));
        assert_eq!(cfg.options["rebin"].kind, ParameterKind::Int);
        assert_eq!(cfg.processors[0].parameters["rebin"], ParameterValue::from("${rebin}"));
        assert_eq!(cfg.sequence_names(), vec!["vtx"]);
    }

    #[test]
    fn test_toml_and_yaml_agree() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = write_config(
            &dir,
            "p.yaml",
            "libraries: [libprocessors.so]\nprocessors:\n  - name: sel\n    type: SelectionProcessor\n    parameters:\n      cuts: [\"chi2 < 10\"]\n      debug: 1\n",
        );
        let toml = write_config(
            &dir,
            "p.toml",
            "libraries = [\"libprocessors.so\"]\n\n[[processors]]\nname = \"sel\"\ntype = \"SelectionProcessor\"\n\n[processors.parameters]\ncuts = [\"chi2 < 10\"]\ndebug = 1\n",
        );

        assert_eq!(load_config(&yaml).unwrap(), load_config(&toml).unwrap());
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let json = write_config(&dir, "p.json", "{}");
        let broken = write_config(&dir, "broken.yaml", "processors: [");

        assert!(matches!(load_config(&json), Err(ConfigurationError::UnsupportedFormat { .. })));
        assert!(matches!(load_config(&broken), Err(ConfigurationError::Parse { .. })));
        assert!(matches!(
            load_config(dir.path().join("missing.yaml")),
            Err(ConfigurationError::Io { .. })
        ));
    }

    #[test]
    fn test_load_and_validate_collects_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "dup.yaml",
            r#"
processors:
  - { name: a, type: TupleProcessor }
  - { name: a, type: TupleProcessor }
sequence: [a, b]
"#,
        );

        match load_and_validate_config(&path) {
            Err(ConfigurationError::Validation { errors }) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.contains(&ConfigurationError::DuplicateProcessorName { name: "a".to_string() }));
                assert!(errors.contains(&ConfigurationError::UnknownSequenceEntry { name: "b".to_string() }));
            }
            other => panic!("expected aggregated validation errors, got {:?}", other),
        }
    }

    #[test]
    fn test_load_and_validate_single_error_is_unwrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "empty.yaml", "processors: []\n");

        assert_eq!(load_and_validate_config(&path), Err(ConfigurationError::EmptySequence));
    }
}
