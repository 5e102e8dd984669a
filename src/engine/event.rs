// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::errors::ProcessorError;
use crate::utils::HistogramSet;

/// The per-record context shared by every processor in the sequence.
///
/// Processors read the fields and histograms earlier processors left and
/// may add their own for later ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    number: u64,
    source: PathBuf,
    pub fields: Map<String, Value>,
    pub histograms: HistogramSet,
}

impl Event {
    pub fn new(number: u64, source: impl Into<PathBuf>, fields: Map<String, Value>) -> Self {
        Self {
            number,
            source: source.into(),
            fields,
            histograms: HistogramSet::new(),
        }
    }

    pub fn with_histograms(number: u64, source: impl Into<PathBuf>, histograms: HistogramSet) -> Self {
        Self {
            number,
            source: source.into(),
            fields: Map::new(),
            histograms,
        }
    }

    /// Zero-based position of this record across the whole run.
    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// A numeric field. Booleans read as 0 or 1.
    pub fn number_field(&self, name: &str) -> Result<f64, ProcessorError> {
        let value = self.fields.get(name).ok_or_else(|| ProcessorError::MissingField {
            field: name.to_string(),
        })?;
        as_number(value).ok_or_else(|| ProcessorError::FieldType {
            field: name.to_string(),
            expected: "a number",
        })
    }

    /// A numeric field, or every element of a numeric array field.
    pub fn number_values(&self, name: &str) -> Result<Vec<f64>, ProcessorError> {
        let value = self.fields.get(name).ok_or_else(|| ProcessorError::MissingField {
            field: name.to_string(),
        })?;
        let type_error = || ProcessorError::FieldType {
            field: name.to_string(),
            expected: "a number or an array of numbers",
        };
        match value {
            Value::Array(items) => items.iter().map(|v| as_number(v).ok_or_else(type_error)).collect(),
            other => as_number(other).map(|v| vec![v]).ok_or_else(type_error),
        }
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(fields: Value) -> Event {
        match fields {
            Value::Object(map) => Event::new(0, "run.jsonl", map),
            _ => panic!("fields must be an object"),
        }
    }

    #[test]
    fn test_number_field() {
        let e = event(json!({"chi2": 3, "ok": true, "name": "trk", "hits": [1, 2.5]}));

        assert_eq!(e.number_field("chi2").unwrap(), 3.0);
        assert_eq!(e.number_field("ok").unwrap(), 1.0);
        assert!(matches!(e.number_field("missing"), Err(ProcessorError::MissingField { .. })));
        assert!(matches!(e.number_field("name"), Err(ProcessorError::FieldType { .. })));
        assert!(matches!(e.number_field("hits"), Err(ProcessorError::FieldType { .. })));
    }

    #[test]
    fn test_number_values_flattens_arrays() {
        let e = event(json!({"hits": [1, 2.5], "chi2": 4, "bad": [1, "x"]}));

        assert_eq!(e.number_values("hits").unwrap(), vec![1.0, 2.5]);
        assert_eq!(e.number_values("chi2").unwrap(), vec![4.0]);
        assert!(e.number_values("bad").is_err());
    }
}
