// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use clap::Parser;
use std::path::PathBuf;

use hpstr::config::{
    load_and_validate_config, parse_override, IoOverrides, Process, Registry, RunOptions, RuntimeBuilder,
};
use hpstr::errors::PipelineError;
use hpstr::observability::init_tracing;

#[derive(Parser)]
#[command(name = "hpstr")]
#[command(about = "Runs a configured processor sequence over record files")]
struct Args {
    /// Process configuration (.yaml, .yml or .toml)
    #[arg(required_unless_present = "list_processors")]
    config: Option<PathBuf>,

    /// Input file, replacing the configured inputs (repeatable)
    #[arg(short, long = "input")]
    inputs: Vec<PathBuf>,

    /// Directory for derived output files
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Stop after this many records; negative means no limit
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    max_events: Option<i64>,

    /// Override a declared run option (repeatable)
    #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    set: Vec<(String, String)>,

    /// Print the process summary without reading any records
    #[arg(long)]
    dry_run: bool,

    /// List the built-in processors and exit
    #[arg(long)]
    list_processors: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.list_processors {
        list_processors(&Registry::builtin());
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(args: &Args) -> Result<(), PipelineError> {
    let Some(path) = &args.config else {
        return Ok(());
    };

    let cfg = load_and_validate_config(path)?;
    let options = RunOptions::resolve(&cfg.options, &args.set)?;
    let overrides = IoOverrides {
        inputs: args.inputs.clone(),
        out_dir: args.out_dir.clone(),
        max_events: args.max_events,
    };
    let process = Process::from_config(&cfg, &options, &overrides)?;
    print!("{}", process.summary());

    let sequencer = RuntimeBuilder::build(&process, &Registry::builtin())?;
    if args.dry_run {
        println!("Dry run: {} job(s) planned, nothing read", sequencer.jobs().len());
        return Ok(());
    }

    let summary = sequencer.run()?;
    println!("{}", summary);
    Ok(())
}

fn list_processors(registry: &Registry) {
    for library in registry.libraries() {
        println!("{}", library.name());
        for registration in library.registrations() {
            let modes: Vec<String> = registration.run_modes.iter().map(|m| m.to_string()).collect();
            println!(
                "  {:<24} [{}] {}",
                registration.type_tag,
                modes.join(", "),
                registration.description
            );
            for param in (registration.schema)() {
                let default = param
                    .default
                    .as_ref()
                    .map(|d| format!(" = {}", d))
                    .unwrap_or_else(|| " (required)".to_string());
                println!("      {}: {}{}  {}", param.key, param.kind, default, param.help);
            }
        }
    }
}
