// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::errors::InputError;
use crate::io::OutputEntry;
use crate::utils::HistogramSet;

/// Streams the records of one JSON Lines file.
///
/// Blank lines and lines starting with `#` are skipped. Every other line
/// must be a JSON object; the first that is not ends the stream with an
/// error naming the file and line.
pub struct RecordReader {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line: usize,
}

impl RecordReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| InputError::Open {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            lines: BufReader::new(file).lines(),
            line: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for RecordReader {
    type Item = Result<Map<String, Value>, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(source) => {
                    return Some(Err(InputError::Read {
                        path: self.path.clone(),
                        line: self.line + 1,
                        source,
                    }))
                }
            };
            self.line += 1;

            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let parsed = serde_json::from_str::<Value>(trimmed).map_err(|source| InputError::Malformed {
                path: self.path.clone(),
                line: self.line,
                source,
            });
            return Some(parsed.and_then(|value| match value {
                Value::Object(fields) => Ok(fields),
                _ => Err(InputError::NotAnObject {
                    path: self.path.clone(),
                    line: self.line,
                }),
            }));
        }
    }
}

/// Read every entry of an output file written by a previous run.
///
/// Histograms whose axes or bin storage are inconsistent are rejected.
pub fn read_entries(path: impl AsRef<Path>) -> Result<Vec<OutputEntry>, InputError> {
    let mut reader = RecordReader::open(path)?;
    let mut entries = Vec::new();

    while let Some(record) = reader.next() {
        let fields = record?;
        let entry: OutputEntry =
            serde_json::from_value(Value::Object(fields)).map_err(|source| InputError::Malformed {
                path: reader.path.clone(),
                line: reader.line,
                source,
            })?;
        let checked = match &entry {
            OutputEntry::Histogram1d(h) => h.validate(),
            OutputEntry::Histogram2d(h) => h.validate(),
            OutputEntry::Tuple { .. } => Ok(()),
        };
        checked.map_err(|source| InputError::InvalidHistogram {
            path: reader.path.clone(),
            line: reader.line,
            source,
        })?;
        entries.push(entry);
    }

    Ok(entries)
}

/// Load the histograms of a previous run's output; tuple rows are ignored.
pub fn load_histograms(path: impl AsRef<Path>) -> Result<HistogramSet, InputError> {
    let mut set = HistogramSet::new();
    for entry in read_entries(path)? {
        match entry {
            OutputEntry::Histogram1d(h) => set.insert_1d(h),
            OutputEntry::Histogram2d(h) => set.insert_2d(h),
            OutputEntry::Tuple { .. } => {}
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HistogramError;
    use crate::io::OutputFile;
    use crate::traits::OutputSink;
    use crate::utils::{Axis, Histogram2D};

    fn write(dir: &tempfile::TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_reader_skips_blank_and_comment_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "run.jsonl", "# header\n{\"a\": 1}\n\n   \n{\"a\": 2}\n");

        let records: Vec<_> = RecordReader::open(&path).unwrap().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["a"], 2);
    }

    #[test]
    fn test_reader_reports_line_of_bad_record() {
        struct TestCase {
            text: &'static str,
            line: usize,
            not_object: bool,
        }

        let cases = vec![
            TestCase { text: "{\"a\": 1}\n{oops\n", line: 2, not_object: false },
            TestCase { text: "\n\n[1, 2]\n", line: 3, not_object: true },
        ];

        let dir = tempfile::tempdir().unwrap();
        for (i, case) in cases.iter().enumerate() {
            let path = write(&dir, &format!("bad{}.jsonl", i), case.text);
            let err = RecordReader::open(&path)
                .unwrap()
                .find_map(Result::err)
                .expect("an error");
            match err {
                InputError::Malformed { line, .. } => {
                    assert!(!case.not_object);
                    assert_eq!(line, case.line);
                }
                InputError::NotAnObject { line, .. } => {
                    assert!(case.not_object);
                    assert_eq!(line, case.line);
                }
                other => panic!("unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn test_missing_input_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RecordReader::open(dir.path().join("missing.jsonl")),
            Err(InputError::Open { .. })
        ));
    }

    #[test]
    fn test_inconsistent_histogram_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let axis = r#"{"bins": 2, "min": 0.0, "max": 1.0}"#;
        let truncated = format!(
            r#"{{"kind": "histogram2d", "name": "vtxSel_z", "title": "", "x_axis": {axis}, "y_axis": {axis}, "entries": 3, "contents": [], "sumw2": []}}"#
        );
        let tuple = r#"{"kind": "tuple", "tree": "t", "row": {}}"#;
        let path = write(&dir, "ana.jsonl", &format!("{}\n{}\n", tuple, truncated));

        match load_histograms(&path) {
            Err(InputError::InvalidHistogram { line, source, .. }) => {
                assert_eq!(line, 2);
                assert!(matches!(source, HistogramError::BinCount { found: 0, .. }));
            }
            other => panic!("expected an invalid histogram, got {:?}", other),
        }

        let bad_axis = r#"{"kind": "histogram1d", "name": "h", "title": "", "axis": {"bins": 0, "min": 0.0, "max": 1.0}, "entries": 0, "contents": [0.0, 0.0], "sumw2": [0.0, 0.0]}"#;
        let path = write(&dir, "axis.jsonl", bad_axis);
        assert!(matches!(
            read_entries(&path),
            Err(InputError::InvalidHistogram { source: HistogramError::InvalidAxis { .. }, .. })
        ));
    }

    #[test]
    fn test_load_histograms_reads_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ana.jsonl");

        let mut h = Histogram2D::new(
            "vtxSel_z",
            "vtxSel_z",
            Axis::new(2, 0.0, 1.0).unwrap(),
            Axis::new(2, 0.0, 1.0).unwrap(),
        );
        h.fill(0.2, 0.7);

        let mut out = OutputFile::create(&path).unwrap();
        out.write_entry(&OutputEntry::Histogram2d(h.clone())).unwrap();
        out.write_entry(&OutputEntry::Tuple {
            tree: "t".to_string(),
            row: Map::new(),
        })
        .unwrap();
        out.finish().unwrap();

        let set = load_histograms(&path).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get_2d("vtxSel_z"), Some(&h));
    }
}
