// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Output path templates.
//!
//! A template is a path with `{placeholder}` holes. The built-in
//! placeholders are `out_dir`, `stem`, `ext`, `input` and `run_mode`; every
//! resolved run option is available under its own name. Expansion only
//! depends on its arguments.

use std::path::{Path, PathBuf};

use crate::config::{ParameterValue, RunMode, RunOptions};
use crate::errors::ConfigurationError;

/// Everything a template may refer to for one input file.
pub struct NamingContext<'a> {
    pub input: &'a Path,
    pub out_dir: &'a Path,
    pub run_mode: RunMode,
    pub options: &'a RunOptions,
}

impl NamingContext<'_> {
    fn lookup(&self, name: &str) -> Option<String> {
        match name {
            "out_dir" => Some(self.out_dir.display().to_string()),
            "stem" => Some(
                self.input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            ),
            "ext" => Some(
                self.input
                    .extension()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            ),
            "input" => Some(self.input.display().to_string()),
            "run_mode" => Some(self.run_mode.to_string()),
            other => self.options.get(other).map(render_value),
        }
    }
}

fn render_value(value: &ParameterValue) -> String {
    match value {
        ParameterValue::Int(v) => v.to_string(),
        ParameterValue::Float(v) => v.to_string(),
        ParameterValue::String(s) => s.clone(),
        ParameterValue::StringList(items) => items.join("_"),
    }
}

/// Expand `template` for one input.
pub fn expand_output_template(template: &str, ctx: &NamingContext<'_>) -> Result<PathBuf, ConfigurationError> {
    let error = |reason: String| ConfigurationError::Template {
        template: template.to_string(),
        reason,
    };

    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find(['{', '}']) {
        if rest[open..].starts_with('}') {
            return Err(error("unmatched '}'".to_string()));
        }
        expanded.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| error("unclosed '{'".to_string()))?;
        let name = after[..close].trim();
        if name.is_empty() || name.contains('{') {
            return Err(error(format!("malformed placeholder '{{{}}}'", &after[..close])));
        }
        let value = ctx
            .lookup(name)
            .ok_or_else(|| error(format!("unknown placeholder '{{{}}}'", name)))?;
        expanded.push_str(&value);
        rest = &after[close + 1..];
    }
    expanded.push_str(rest);

    if expanded.is_empty() {
        return Err(error("expands to an empty path".to_string()));
    }
    Ok(PathBuf::from(expanded))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> RunOptions {
        RunOptions::from_values([
            ("mass", ParameterValue::Int(145)),
            ("poly", ParameterValue::Int(3)),
            ("win", ParameterValue::Int(11)),
            ("sels", ParameterValue::from(vec!["a", "b"])),
        ])
    }

    fn expand(template: &str, input: &str) -> Result<PathBuf, ConfigurationError> {
        let options = options();
        let ctx = NamingContext {
            input: Path::new(input),
            out_dir: Path::new("results"),
            run_mode: RunMode::Event,
            options: &options,
        };
        expand_output_template(template, &ctx)
    }

    #[test]
    fn test_expansion_table() {
        struct TestCase {
            template: &'static str,
            input: &'static str,
            expected: &'static str,
        }

        let cases = vec![
            TestCase {
                template: "{out_dir}/{stem}.out.jsonl",
                input: "data/run01.jsonl",
                expected: "results/run01.out.jsonl",
            },
            TestCase {
                template: "{out_dir}/bhResSys_m{mass}w{win}p{poly}.jsonl",
                input: "run01.jsonl",
                expected: "results/bhResSys_m145w11p3.jsonl",
            },
            TestCase {
                template: "{stem}_{run_mode}.{ext}",
                input: "/tmp/ana.jsonl",
                expected: "ana_event.jsonl",
            },
            TestCase {
                template: "{out_dir}/{ sels }.jsonl",
                input: "x.jsonl",
                expected: "results/a_b.jsonl",
            },
            TestCase {
                template: "fixed.jsonl",
                input: "x.jsonl",
                expected: "fixed.jsonl",
            },
        ];

        for case in cases {
            assert_eq!(
                expand(case.template, case.input).unwrap(),
                PathBuf::from(case.expected),
                "template {}",
                case.template
            );
        }
    }

    #[test]
    fn test_expansion_is_deterministic() {
        let template = "{out_dir}/bhResSys_m{mass}w{win}p{poly}.jsonl";
        let first = expand(template, "run01.jsonl").unwrap();
        for _ in 0..5 {
            assert_eq!(expand(template, "run01.jsonl").unwrap(), first);
        }
    }

    #[test]
    fn test_bad_templates() {
        for template in ["{out_dir}/{colour}.jsonl", "{stem", "stem}", "{}.jsonl", ""] {
            assert!(
                matches!(expand(template, "run01.jsonl"), Err(ConfigurationError::Template { .. })),
                "template '{}' should be rejected",
                template
            );
        }
    }
}
