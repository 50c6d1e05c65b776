//! Integration tests for `corpus_compare`.
//
// This suite verifies:
// - Library pipeline (tables, totals, threshold, vocabulary, report rows)
// - Standalone re-runs of the significance test from persisted files
// - CLI behavior for every subcommand, including failure exit codes
//
// Notes:
// - CLI tests run the binary with a per-test working directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::Value as Json;
use tempfile::tempdir;

use corpus_compare::{
    CompareError, CompareOptions, Event, Normalization, WorkspacePaths, prepare_comparison,
    run_significance_test,
};

// --------------------- helpers ---------------------

/// Create a file with content in a temp dir.
fn write_file(dir: &assert_fs::TempDir, name: &str, content: &str) -> PathBuf {
    let f = dir.child(name);
    f.write_str(content).unwrap();
    f.path().to_path_buf()
}

/// Read file to string.
fn read_to_string<P: AsRef<Path>>(p: P) -> String {
    fs::read_to_string(p).unwrap()
}

/// Run CLI successfully with a specific working directory.
fn run_cli_ok_in(dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("corpus_compare").unwrap();
    cmd.current_dir(dir);
    cmd.args(args).assert().success()
}

/// Run CLI expecting failure with a specific working directory.
fn run_cli_fail_in(dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("corpus_compare").unwrap();
    cmd.current_dir(dir);
    cmd.args(args).assert().failure()
}

/// Results CSV as word -> remaining fields.
fn load_results(path: &Path) -> HashMap<String, Vec<String>> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.records()
        .map(|r| {
            let r = r.unwrap();
            let fields: Vec<String> = r.iter().map(String::from).collect();
            (fields[0].clone(), fields[1..].to_vec())
        })
        .collect()
}

/// The two-corpus example: A = {d1: cat cat dog}, B = {d2: dog}.
fn cat_dog(td: &assert_fs::TempDir) -> (PathBuf, PathBuf) {
    let c1 = write_file(td, "c1.txt", "d1 3 cat cat dog\n");
    let c2 = write_file(td, "c2.txt", "d2 1 dog\n");
    (c1, c2)
}

// --------------------- library tests ---------------------

#[test]
fn lib_cat_dog_example() {
    let td = assert_fs::TempDir::new().unwrap();
    let (c1, c2) = cat_dog(&td);
    let paths = WorkspacePaths::in_dir(&td.path().join("out"));
    let mut events = Vec::new();

    let matched =
        prepare_comparison(&c1, &c2, &paths, &CompareOptions::default(), &mut events).unwrap();
    assert_eq!(matched.vocabulary.iter().collect::<Vec<_>>(), vec!["cat", "dog"]);
    assert_eq!(read_to_string(&paths.vocabulary), "cat\ndog\n");

    let summary = run_significance_test(&paths, &mut events).unwrap();
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.degenerate, 0);

    let rows = load_results(&paths.results);
    assert_eq!(rows["cat"][..4], ["2", "0", "2", "undefined"]);
    assert_eq!(rows["dog"][..4], ["1", "1", "0", "0.0"]);
    let stat: f64 = rows["cat"][4].parse().unwrap();
    assert!((stat - 1.0).abs() < 1e-12);
}

#[test]
fn lib_word_once_in_each_corpus_is_tested() {
    let td = assert_fs::TempDir::new().unwrap();
    let c1 = write_file(&td, "c1.txt", "d1 1 dog\n");
    let c2 = write_file(&td, "c2.txt", "d2 1 dog\n");
    let paths = WorkspacePaths::in_dir(td.path());
    prepare_comparison(&c1, &c2, &paths, &CompareOptions::default(), &mut Vec::new()).unwrap();

    let summary = run_significance_test(&paths, &mut Vec::new()).unwrap();
    assert_eq!(summary.degenerate, 0);

    let rows = load_results(&paths.results);
    assert_eq!(rows["dog"][..5], ["1", "1", "0", "0.0", "0.0"]);
    let p: f64 = rows["dog"][5].parse().unwrap();
    assert!((p - 1.0).abs() < 1e-7);
}

#[test]
fn lib_persisted_tables_layout() {
    let td = assert_fs::TempDir::new().unwrap();
    let c1 = write_file(&td, "c1.txt", "a 4 x y x z\nb 2 y y\n");
    let c2 = write_file(&td, "c2.txt", "c 1 x\n");
    let paths = WorkspacePaths::in_dir(td.path());
    prepare_comparison(&c1, &c2, &paths, &CompareOptions::default(), &mut Vec::new()).unwrap();

    // sorted by total_count desc, ties in first-seen order
    assert_eq!(
        read_to_string(&paths.c1_raw),
        ",a,b,total_count\ny,1,2,3\nx,2,0,2\nz,1,0,1\n"
    );
    // cumulative denominators: a -> 4, b -> 6
    let rel = read_to_string(&paths.c1_relative);
    let mut lines = rel.lines();
    assert_eq!(lines.next(), Some(",a,b"));
    let y: Vec<f64> = lines
        .next()
        .unwrap()
        .split(',')
        .skip(1)
        .map(|v| v.parse().unwrap())
        .collect();
    assert_eq!(y, vec![0.25, 2.0 / 6.0]);
}

#[test]
fn lib_document_length_normalization() {
    let td = assert_fs::TempDir::new().unwrap();
    let c1 = write_file(&td, "c1.txt", "a 4 x y x z\nb 2 y y\n");
    let c2 = write_file(&td, "c2.txt", "c 1 x\n");
    let paths = WorkspacePaths::in_dir(td.path());
    let options = CompareOptions {
        threshold: None,
        normalization: Normalization::DocumentLength,
    };
    prepare_comparison(&c1, &c2, &paths, &options, &mut Vec::new()).unwrap();
    let rel = read_to_string(&paths.c1_relative);
    assert!(rel.lines().any(|l| l == "y,0.25,1"));
}

#[test]
fn lib_threshold_filters_each_corpus() {
    let td = assert_fs::TempDir::new().unwrap();
    let c1 = write_file(&td, "c1.txt", "a 3 one two three\n");
    let c2 = write_file(&td, "c2.txt", "b 6 w w w w w z\n");
    let paths = WorkspacePaths::in_dir(td.path());
    let options = CompareOptions {
        threshold: Some(5),
        normalization: Normalization::Cumulative,
    };
    let mut events = Vec::new();
    let matched = prepare_comparison(&c1, &c2, &paths, &options, &mut events).unwrap();

    assert!(matched.c1.raw.is_empty());
    assert_eq!(matched.vocabulary.iter().collect::<Vec<_>>(), vec!["w"]);
    assert_eq!(read_to_string(&paths.c1_raw), ",a,total_count\n");
    assert!(events.contains(&Event::VocabularyFiltered {
        label: "c1".to_string(),
        threshold: Some(5),
        retained: 0,
    }));

    run_significance_test(&paths, &mut events).unwrap();
    let rows = load_results(&paths.results);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows["w"][..4], ["0", "5", "-5", "-100.0"]);
}

#[test]
fn lib_word_filtered_from_both_sides_still_reported() {
    let td = assert_fs::TempDir::new().unwrap();
    let (c1, c2) = cat_dog(&td);
    let paths = WorkspacePaths::in_dir(td.path());
    prepare_comparison(&c1, &c2, &paths, &CompareOptions::default(), &mut Vec::new()).unwrap();

    // a hand-edited vocabulary may name words neither table retained
    fs::write(&paths.vocabulary, "emu\ncat\n").unwrap();
    let mut events = Vec::new();
    let summary = run_significance_test(&paths, &mut events).unwrap();
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.degenerate, 1);

    let rows = load_results(&paths.results);
    assert_eq!(rows["emu"], ["0", "0", "0", "undefined", "-1", "-1"]);
    assert!(events.iter().any(|e| matches!(
        e,
        Event::DegenerateWord { word, .. } if word == "emu"
    )));
}

#[test]
fn lib_rerun_is_byte_identical() {
    let td = assert_fs::TempDir::new().unwrap();
    let c1 = write_file(
        &td,
        "c1.txt",
        "a 5 red red blue green red\nb 3 blue blue red\nc 2 green red\n",
    );
    let c2 = write_file(&td, "c2.txt", "d 3 red green green\ne 2 blue green\n");
    let paths = WorkspacePaths::in_dir(td.path());
    prepare_comparison(&c1, &c2, &paths, &CompareOptions::default(), &mut Vec::new()).unwrap();

    run_significance_test(&paths, &mut Vec::new()).unwrap();
    let first = fs::read(&paths.results).unwrap();
    run_significance_test(&paths, &mut Vec::new()).unwrap();
    let second = fs::read(&paths.results).unwrap();
    assert_eq!(first, second);
}

#[test]
fn lib_empty_corpus_fails() {
    let td = assert_fs::TempDir::new().unwrap();
    let c1 = write_file(&td, "c1.txt", "a 0\n");
    let c2 = write_file(&td, "c2.txt", "b 1 x\n");
    let paths = WorkspacePaths::in_dir(td.path());
    let r = prepare_comparison(&c1, &c2, &paths, &CompareOptions::default(), &mut Vec::new());
    assert!(matches!(r, Err(CompareError::EmptyCorpus(label)) if label == "c1"));
    assert!(!paths.c1_raw.exists());
}

#[test]
fn lib_test_without_prepared_tables_is_missing_file() {
    let td = tempdir().unwrap();
    let paths = WorkspacePaths::in_dir(td.path());
    let r = run_significance_test(&paths, &mut Vec::new());
    assert!(matches!(r, Err(CompareError::MissingFile(p)) if p == paths.c1_relative));
    assert!(!paths.results.exists());
}

// --------------------- CLI tests ---------------------

#[test]
fn cli_compare_writes_all_artifacts() {
    let td = assert_fs::TempDir::new().unwrap();
    let (c1, c2) = cat_dog(&td);

    run_cli_ok_in(
        td.path(),
        &[
            "compare",
            c1.to_str().unwrap(),
            c2.to_str().unwrap(),
            "--out",
            "out",
        ],
    );

    for name in [
        "c1_relative.csv",
        "c2_relative.csv",
        "c1_raw.csv",
        "c2_raw.csv",
        "vocab.txt",
        "results.csv",
    ] {
        td.child("out").child(name).assert(predicate::path::exists());
    }
    td.child("out/results.csv").assert(predicate::str::starts_with(
        "word,c1 total count,c2 total count,difference c1 - c2,% change,wilcoxon statistic,wilcoxon p-value\n",
    ));
}

#[test]
fn cli_prepare_then_test_with_custom_results() {
    let td = assert_fs::TempDir::new().unwrap();
    let (c1, c2) = cat_dog(&td);

    run_cli_ok_in(
        td.path(),
        &[
            "prepare",
            c1.to_str().unwrap(),
            c2.to_str().unwrap(),
            "--out",
            "tables",
            "--threshold",
            "2",
        ],
    );
    td.child("tables/vocab.txt").assert("cat\n");
    td.child("tables/results.csv")
        .assert(predicate::path::missing());

    run_cli_ok_in(
        td.path(),
        &["test", "--out", "tables", "--results", "rerun.csv"],
    );
    let rows = load_results(&td.path().join("rerun.csv"));
    assert_eq!(rows["cat"][..4], ["2", "0", "2", "undefined"]);
}

#[test]
fn cli_json_events_on_stdout() {
    let td = assert_fs::TempDir::new().unwrap();
    let (c1, c2) = cat_dog(&td);

    let out = run_cli_ok_in(
        td.path(),
        &[
            "--events",
            "json",
            "compare",
            c1.to_str().unwrap(),
            c2.to_str().unwrap(),
            "--out",
            "out",
        ],
    )
    .get_output()
    .stdout
    .clone();

    let events: Vec<Json> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid json"))
        .collect();
    let summary = events
        .iter()
        .find(|e| e["event"] == "corpus_summary" && e["label"] == "c1")
        .expect("c1 summary");
    assert_eq!(summary["mean_total_count"], 1.5);
    assert_eq!(events.last().unwrap()["event"], "test_complete");
}

#[test]
fn cli_select_by_list() {
    let td = assert_fs::TempDir::new().unwrap();
    let list = write_file(&td, "list.txt", "b.txt\n");
    let bags = write_file(&td, "bags.txt", "a.txt 1 x\nb.txt 2 y z\n");

    run_cli_ok_in(
        td.path(),
        &[
            "select",
            bags.to_str().unwrap(),
            "picked.txt",
            "--list",
            list.to_str().unwrap(),
        ],
    );
    td.child("picked.txt").assert("b.txt 2 y z\n");
}

#[test]
fn cli_select_random_sample() {
    let td = assert_fs::TempDir::new().unwrap();
    let input = "a.txt 1 x\nb.txt 2 y z\nc.txt 1 w\nd.txt 1 v\n";
    let bags = write_file(&td, "bags.txt", input);

    run_cli_ok_in(
        td.path(),
        &[
            "select",
            bags.to_str().unwrap(),
            "sample.txt",
            "--sample",
            "2",
            "--seed",
            "3",
        ],
    );
    let picked = read_to_string(td.path().join("sample.txt"));
    assert_eq!(picked.lines().count(), 2);
    assert!(picked.lines().all(|l| input.lines().any(|s| s == l)));
}

#[test]
fn cli_select_sample_too_large_fails() {
    let td = assert_fs::TempDir::new().unwrap();
    let bags = write_file(&td, "bags.txt", "a.txt 1 x\n");

    run_cli_fail_in(
        td.path(),
        &["select", bags.to_str().unwrap(), "sample.txt", "--sample", "2"],
    )
    .stderr(predicate::str::contains("Cannot sample 2 documents from 1"));
    td.child("sample.txt").assert(predicate::path::missing());
}

#[test]
fn cli_select_needs_exactly_one_mode() {
    let td = assert_fs::TempDir::new().unwrap();
    let bags = write_file(&td, "bags.txt", "a.txt 1 x\n");
    let list = write_file(&td, "list.txt", "a.txt\n");
    let bags = bags.to_str().unwrap();

    run_cli_fail_in(td.path(), &["select", bags, "out.txt"]);
    run_cli_fail_in(
        td.path(),
        &[
            "select",
            bags,
            "out.txt",
            "--list",
            list.to_str().unwrap(),
            "--sample",
            "1",
        ],
    );
}

#[test]
fn cli_malformed_line_fails() {
    let td = assert_fs::TempDir::new().unwrap();
    let c1 = write_file(&td, "c1.txt", "d1 2 a b\nbroken\n");
    let c2 = write_file(&td, "c2.txt", "d2 1 a\n");

    run_cli_fail_in(
        td.path(),
        &[
            "compare",
            c1.to_str().unwrap(),
            c2.to_str().unwrap(),
            "--out",
            "out",
        ],
    )
    .stderr(predicate::str::contains("c1.txt:2"));
    td.child("out/results.csv").assert(predicate::path::missing());
}

#[test]
fn cli_nonexistent_input_fails() {
    let td = tempdir().unwrap();
    let bad = td.path().join("does_not_exist_here.txt");
    run_cli_fail_in(
        td.path(),
        &[
            "prepare",
            bad.to_str().unwrap(),
            bad.to_str().unwrap(),
            "--out",
            "out",
        ],
    )
    .stderr(predicate::str::contains("File not found"));
}
