// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Typed processor parameters.
//!
//! Parameters are stored untyped-at-set-time in a [`ParameterSet`] and checked
//! against a registration's schema when the processor is bound. The rules for
//! reading a value as a given [`ParameterKind`] are:
//!
//! | kind          | accepts                         |
//! |---------------|---------------------------------|
//! | `int`         | int                             |
//! | `float`       | float, int (widened)            |
//! | `string`      | string                          |
//! | `string_list` | string list, string (one item)  |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{ConfigurationError, ParameterTypeError, PipelineError, ProcessorError};
use crate::observability::messages::processor::UnknownParameterIgnored;
use crate::observability::messages::StructuredLog;

/// The declared type of a parameter or run option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Int,
    Float,
    String,
    StringList,
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterKind::Int => "int",
            ParameterKind::Float => "float",
            ParameterKind::String => "string",
            ParameterKind::StringList => "string_list",
        };
        write!(f, "{}", name)
    }
}

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Int(i64),
    Float(f64),
    String(String),
    StringList(Vec<String>),
}

impl ParameterValue {
    pub fn kind(&self) -> ParameterKind {
        match self {
            ParameterValue::Int(_) => ParameterKind::Int,
            ParameterValue::Float(_) => ParameterKind::Float,
            ParameterValue::String(_) => ParameterKind::String,
            ParameterValue::StringList(_) => ParameterKind::StringList,
        }
    }

    /// Convert this value to `kind`, or `None` if the conversion is not allowed.
    pub fn coerce(&self, kind: ParameterKind) -> Option<ParameterValue> {
        match (self, kind) {
            (ParameterValue::Int(v), ParameterKind::Int) => Some(ParameterValue::Int(*v)),
            (ParameterValue::Int(v), ParameterKind::Float) => Some(ParameterValue::Float(*v as f64)),
            (ParameterValue::Float(v), ParameterKind::Float) => Some(ParameterValue::Float(*v)),
            (ParameterValue::String(s), ParameterKind::String) => {
                Some(ParameterValue::String(s.clone()))
            }
            (ParameterValue::String(s), ParameterKind::StringList) => {
                Some(ParameterValue::StringList(vec![s.clone()]))
            }
            (ParameterValue::StringList(items), ParameterKind::StringList) => {
                Some(ParameterValue::StringList(items.clone()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Int(v) => write!(f, "{}", v),
            ParameterValue::Float(v) => write!(f, "{}", v),
            ParameterValue::String(s) => write!(f, "'{}'", s),
            ParameterValue::StringList(items) => {
                let quoted: Vec<String> = items.iter().map(|s| format!("'{}'", s)).collect();
                write!(f, "[{}]", quoted.join(", "))
            }
        }
    }
}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        ParameterValue::Int(v)
    }
}

impl From<i32> for ParameterValue {
    fn from(v: i32) -> Self {
        ParameterValue::Int(v as i64)
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        ParameterValue::Float(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        ParameterValue::String(v.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(v: String) -> Self {
        ParameterValue::String(v)
    }
}

impl From<Vec<String>> for ParameterValue {
    fn from(v: Vec<String>) -> Self {
        ParameterValue::StringList(v)
    }
}

impl From<Vec<&str>> for ParameterValue {
    fn from(v: Vec<&str>) -> Self {
        ParameterValue::StringList(v.into_iter().map(str::to_string).collect())
    }
}

/// Parameter mapping owned by one processor.
///
/// `set` never type checks and the last write for a key wins. The typed
/// getters apply the coercion rules from the module docs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    owner: String,
    values: BTreeMap<String, ParameterValue>,
}

impl ParameterSet {
    /// Create an empty set owned by the processor named `owner`
    pub fn for_processor(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParameterValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParameterValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get_int(&self, key: &str) -> Result<i64, ProcessorError> {
        match self.typed(key, ParameterKind::Int)? {
            ParameterValue::Int(v) => Ok(v),
            other => Err(self.type_error(key, ParameterKind::Int, &other).into()),
        }
    }

    pub fn get_float(&self, key: &str) -> Result<f64, ProcessorError> {
        match self.typed(key, ParameterKind::Float)? {
            ParameterValue::Float(v) => Ok(v),
            other => Err(self.type_error(key, ParameterKind::Float, &other).into()),
        }
    }

    pub fn get_string(&self, key: &str) -> Result<String, ProcessorError> {
        match self.typed(key, ParameterKind::String)? {
            ParameterValue::String(v) => Ok(v),
            other => Err(self.type_error(key, ParameterKind::String, &other).into()),
        }
    }

    pub fn get_string_list(&self, key: &str) -> Result<Vec<String>, ProcessorError> {
        match self.typed(key, ParameterKind::StringList)? {
            ParameterValue::StringList(v) => Ok(v),
            other => Err(self.type_error(key, ParameterKind::StringList, &other).into()),
        }
    }

    fn typed(&self, key: &str, kind: ParameterKind) -> Result<ParameterValue, ProcessorError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ProcessorError::InvalidParameter {
                key: key.to_string(),
                reason: "parameter is not set".to_string(),
            })?;
        value
            .coerce(kind)
            .ok_or_else(|| self.type_error(key, kind, value).into())
    }

    fn type_error(&self, key: &str, expected: ParameterKind, found: &ParameterValue) -> ParameterTypeError {
        ParameterTypeError {
            processor: self.owner.clone(),
            key: key.to_string(),
            expected,
            found: found.kind(),
        }
    }
}

/// Schema entry for one parameter a processor understands.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub key: &'static str,
    pub kind: ParameterKind,
    pub default: Option<ParameterValue>,
    pub help: &'static str,
}

impl ParameterSpec {
    pub fn required(key: &'static str, kind: ParameterKind, help: &'static str) -> Self {
        Self {
            key,
            kind,
            default: None,
            help,
        }
    }

    pub fn optional(
        key: &'static str,
        kind: ParameterKind,
        default: impl Into<ParameterValue>,
        help: &'static str,
    ) -> Self {
        Self {
            key,
            kind,
            default: Some(default.into()),
            help,
        }
    }
}

/// Bind supplied parameters against a schema.
///
/// The result holds exactly the schema's keys, each coerced to its declared
/// kind or filled from its default. Keys the schema does not declare are
/// logged and dropped.
pub fn bind_parameters(schema: &[ParameterSpec], supplied: &ParameterSet) -> Result<ParameterSet, PipelineError> {
    let mut bound = ParameterSet::for_processor(supplied.owner());

    for spec in schema {
        match supplied.get(spec.key) {
            Some(value) => {
                let coerced = value.coerce(spec.kind).ok_or_else(|| ParameterTypeError {
                    processor: supplied.owner().to_string(),
                    key: spec.key.to_string(),
                    expected: spec.kind,
                    found: value.kind(),
                })?;
                bound.set(spec.key, coerced);
            }
            None => match &spec.default {
                Some(default) => bound.set(spec.key, default.clone()),
                None => {
                    return Err(ConfigurationError::MissingParameter {
                        processor: supplied.owner().to_string(),
                        key: spec.key.to_string(),
                    }
                    .into())
                }
            },
        }
    }

    for (key, _) in supplied.iter() {
        if !schema.iter().any(|spec| spec.key == key) {
            UnknownParameterIgnored {
                processor: supplied.owner(),
                key,
            }
            .log();
        }
    }

    Ok(bound)
}
