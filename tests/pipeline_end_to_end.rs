// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};
use std::process::Command;

use hpstr::config::{load_and_validate_config, IoOverrides, Process, Registry, RunOptions, RuntimeBuilder};
use hpstr::engine::RunSummary;
use hpstr::io::{read_entries, OutputEntry};
use tempfile::TempDir;

fn run_config(config: &str, overrides: IoOverrides) -> (Process, RunSummary) {
    let cfg = load_and_validate_config(config).unwrap();
    let options = RunOptions::resolve(&cfg.options, &[]).unwrap();
    let process = Process::from_config(&cfg, &options, &overrides).unwrap();
    let summary = RuntimeBuilder::build(&process, &Registry::builtin())
        .unwrap()
        .run()
        .unwrap();
    (process, summary)
}

fn into_dir(dir: &Path) -> IoOverrides {
    IoOverrides {
        out_dir: Some(dir.to_path_buf()),
        ..IoOverrides::default()
    }
}

fn histograms_1d(entries: &[OutputEntry]) -> Vec<&hpstr::utils::Histogram1D> {
    entries
        .iter()
        .filter_map(|e| match e {
            OutputEntry::Histogram1d(h) => Some(h),
            _ => None,
        })
        .collect()
}

#[test]
fn vertex_selection_writes_rows_and_histograms() {
    let dir = TempDir::new().unwrap();
    let (process, summary) = run_config("configs/vertex_selection.yaml", into_dir(dir.path()));

    let output = dir.path().join("sample_vertices_m145.jsonl");
    assert_eq!(process.output_files(), &[output.clone()]);
    assert_eq!(summary.records_read, 8);
    assert_eq!(summary.records_completed, 5);
    assert_eq!(summary.records_stopped, 3);
    assert_eq!(summary.outputs[0].entries, 8);

    let entries = read_entries(&output).unwrap();
    let rows: Vec<_> = entries
        .iter()
        .filter_map(|e| match e {
            OutputEntry::Tuple { tree, row } => Some((tree.as_str(), row)),
            _ => None,
        })
        .collect();
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|(tree, row)| *tree == "vtxTuple" && row["run_number"] == 14166));
    let numbers: Vec<u64> = rows.iter().filter_map(|(_, row)| row["event_number"].as_u64()).collect();
    assert_eq!(numbers, vec![0, 3, 4, 5, 7]);

    let histos = histograms_1d(&entries);
    let cutflow = histos.iter().find(|h| h.name == "vtxSel_cutflow").unwrap();
    assert_eq!(
        (cutflow.bin_content(1), cutflow.bin_content(2), cutflow.bin_content(3)),
        (8.0, 6.0, 5.0)
    );
    let chi2 = histos.iter().find(|h| h.name == "vtxSel_chi2").unwrap();
    assert_eq!(chi2.integral(), 5.0);

    match entries.last() {
        Some(OutputEntry::Histogram2d(h)) => {
            assert_eq!(h.name, "vtxSel_z_vs_mass");
            assert_eq!(h.entries, 5);
        }
        other => panic!("expected the 2D histogram last, got {:?}", other),
    }
}

#[test]
fn profile_fit_of_sample_histograms() {
    let dir = TempDir::new().unwrap();
    let (_, summary) = run_config("configs/profile_fit.yaml", into_dir(dir.path()));
    assert_eq!(summary.records_read, 1);

    let entries = read_entries(dir.path().join("sample_histograms_histogram.jsonl")).unwrap();
    let histos = histograms_1d(&entries);
    let mu = histos.iter().find(|h| h.name == "vtxSel_z_vs_mass_mu").unwrap();
    let sigma = histos.iter().find(|h| h.name == "vtxSel_z_vs_mass_sigma").unwrap();

    assert!(mu.bin_content(1).abs() < 1e-9);
    assert!((mu.bin_content(2) - 0.5).abs() < 1e-9);
    assert!((sigma.bin_content(1) - 0.5).abs() < 1e-9);
    assert_eq!(mu.entries, 2);
}

#[test]
fn histogram_mode_reads_event_mode_output() {
    let dir = TempDir::new().unwrap();
    run_config("configs/vertex_selection.yaml", into_dir(dir.path()));
    let event_output = dir.path().join("sample_vertices_m145.jsonl");

    let (process, summary) = run_config(
        "configs/profile_fit.yaml",
        IoOverrides {
            inputs: vec![event_output],
            out_dir: Some(dir.path().to_path_buf()),
            max_events: None,
        },
    );
    let fit_output: PathBuf = dir.path().join("sample_vertices_m145_histogram.jsonl");
    assert_eq!(process.output_files(), &[fit_output.clone()]);
    assert_eq!(summary.records_read, 1);

    // Too few entries per slice to fit, but the results are still written.
    let entries = read_entries(&fit_output).unwrap();
    assert_eq!(entries.len(), 3);
    assert!(histograms_1d(&entries).iter().all(|h| h.entries == 0));
}

fn hpstr_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_hpstr"))
}

#[test]
fn cli_dry_run_reads_nothing() {
    let dir = TempDir::new().unwrap();
    let output = hpstr_bin()
        .args(["configs/vertex_selection.yaml", "--dry-run", "-o"])
        .arg(dir.path())
        .args(["--set", "mass=160"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sample_vertices_m160.jsonl"));
    assert!(stdout.contains("Dry run"));
    assert!(!dir.path().join("sample_vertices_m160.jsonl").exists());
}

#[test]
fn cli_exit_codes() {
    let dir = TempDir::new().unwrap();
    let unknown = dir.path().join("unknown.yaml");
    std::fs::write(
        &unknown,
        "processors:\n  - name: track\n    type: TrackingProcessor\ninput_files: [data/sample_vertices.jsonl]\n",
    )
    .unwrap();

    let status = hpstr_bin().arg(&unknown).status().unwrap();
    assert_eq!(status.code(), Some(2));

    let status = hpstr_bin()
        .args(["configs/vertex_selection.yaml", "--set", "mass=heavy"])
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(2));

    let status = hpstr_bin()
        .args(["configs/vertex_selection.yaml", "-n", "3", "-o"])
        .arg(dir.path())
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(0));
}

#[test]
fn cli_lists_builtin_processors() {
    let output = hpstr_bin().arg("--list-processors").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("libprocessors"));
    assert!(stdout.contains("ProfileFitProcessor"));
    assert!(stdout.contains("cuts: string_list (required)"));
}
