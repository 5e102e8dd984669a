// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Name of the library that carries the built-in processors
pub const BUILTIN_LIBRARY: &str = "libprocessors";
/// Shared-object suffixes accepted (and ignored) on library names
pub const LIBRARY_SUFFIXES: &[&str] = &[".so", ".dylib"];
/// Used when a config neither lists output files nor sets `output_template`
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "{out_dir}/{stem}.out.jsonl";
/// Used for `{out_dir}` when neither the config nor the command line sets one
pub const DEFAULT_OUTPUT_DIR: &str = ".";
