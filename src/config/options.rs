// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Run options: typed, named values declared by a configuration and
//! overridable from the command line.
//!
//! Options are resolved once into a [`RunOptions`] value that is passed
//! explicitly into process assembly and output naming.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::config::{ParameterKind, ParameterValue};
use crate::errors::ConfigurationError;

/// Declaration of one run option.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptionSpec {
    #[serde(rename = "type")]
    pub kind: ParameterKind,
    #[serde(default)]
    pub default: Option<ParameterValue>,
    #[serde(default)]
    pub help: String,
}

/// Resolved option values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    values: BTreeMap<String, ParameterValue>,
    declared: Vec<String>,
}

impl RunOptions {
    /// Resolve declared options against `KEY=VALUE` style overrides.
    ///
    /// Overrides are parsed into the declared kind; string lists are comma
    /// separated. Later overrides of the same key win.
    pub fn resolve(
        specs: &BTreeMap<String, OptionSpec>,
        overrides: &[(String, String)],
    ) -> Result<Self, ConfigurationError> {
        let mut values = BTreeMap::new();

        for (name, spec) in specs {
            if let Some(default) = &spec.default {
                let coerced = default
                    .coerce(spec.kind)
                    .ok_or_else(|| ConfigurationError::InvalidOptionValue {
                        name: name.clone(),
                        value: default.to_string(),
                        expected: spec.kind.to_string(),
                    })?;
                values.insert(name.clone(), coerced);
            }
        }

        for (name, text) in overrides {
            let spec = specs.get(name).ok_or_else(|| ConfigurationError::UnknownOption { name: name.clone() })?;
            values.insert(name.clone(), parse_option_value(name, spec.kind, text)?);
        }

        Ok(Self {
            values,
            declared: specs.keys().cloned().collect(),
        })
    }

    /// Options that are not declared by any config, for programmatic use.
    pub fn from_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParameterValue>,
    {
        let values: BTreeMap<String, ParameterValue> =
            values.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        let declared = values.keys().cloned().collect();
        Self { values, declared }
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    /// Look up an option, distinguishing undeclared names from unset ones.
    pub fn require(&self, name: &str) -> Result<&ParameterValue, ConfigurationError> {
        match self.values.get(name) {
            Some(value) => Ok(value),
            None if self.declared.iter().any(|d| d == name) => {
                Err(ConfigurationError::UnsetOption { name: name.to_string() })
            }
            None => Err(ConfigurationError::UnknownOption { name: name.to_string() }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParameterValue)> {
        self.values.iter()
    }

    /// Replace a parameter of the exact form `${name}` with the option's value.
    pub fn substitute(&self, value: &ParameterValue) -> Result<ParameterValue, ConfigurationError> {
        match option_reference(value) {
            Some(name) => self.require(name).cloned(),
            None => Ok(value.clone()),
        }
    }
}

/// The option name when `value` is exactly `${name}`.
pub fn option_reference(value: &ParameterValue) -> Option<&str> {
    match value {
        ParameterValue::String(s) => s
            .strip_prefix("${")
            .and_then(|rest| rest.strip_suffix('}'))
            .filter(|name| !name.is_empty()),
        _ => None,
    }
}

/// Split a `KEY=VALUE` command-line override.
pub fn parse_override(text: &str) -> Result<(String, String), String> {
    match text.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", text)),
    }
}

fn parse_option_value(name: &str, kind: ParameterKind, text: &str) -> Result<ParameterValue, ConfigurationError> {
    let invalid = || ConfigurationError::InvalidOptionValue {
        name: name.to_string(),
        value: text.to_string(),
        expected: kind.to_string(),
    };
    let trimmed = text.trim();

    match kind {
        ParameterKind::Int => trimmed.parse::<i64>().map(ParameterValue::Int).map_err(|_| invalid()),
        ParameterKind::Float => trimmed.parse::<f64>().map(ParameterValue::Float).map_err(|_| invalid()),
        ParameterKind::String => Ok(ParameterValue::String(text.to_string())),
        ParameterKind::StringList => Ok(ParameterValue::StringList(
            trimmed
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )),
    }
}
