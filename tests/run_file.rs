//! Loading runs from TOML files.

#![cfg(feature = "config-file")]

#[macro_use]
mod common;
use common::*;

use std::io::Write;
use tempfile::NamedTempFile;
use workclaim::sequential;
use workclaim::{
    ConfigError, Error, GridError, LockKind, RunFile, RunOverrides, Scheduler, Verdict,
};

fn grid_toml(rows: &[Vec<u32>]) -> String {
    let rows: Vec<String> = rows.iter().map(|row| format!("  {row:?},")).collect();
    format!("grid = [\n{}\n]\n", rows.join("\n"))
}

fn write_file(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tempfile");
    file.write_all(text.as_bytes()).expect("write");
    file
}

#[test]
fn file_run_agrees_with_sequential_check() {
    init_test_logging();
    test_phase!("file_run_agrees_with_sequential_check");

    for (cells, expected) in [
        (solved_9x9(), Verdict::Valid),
        (broken_9x9(), Verdict::Invalid),
    ] {
        let text = format!(
            "{}\n[run]\nthreads = 3\ntask_increment = 4\nlock = \"spin\"\n",
            grid_toml(&cells)
        );
        let file = write_file(&text);

        let (config, grid) = RunFile::from_path(file.path())
            .expect("parse")
            .resolve(&RunOverrides::default())
            .expect("resolve");
        assert_eq!(config.threads, 3);
        assert_eq!(config.dimension, 9);
        assert_eq!(config.task_increment, 4);
        assert_eq!(config.lock, LockKind::Spin);

        let reference = sequential::check_all(&grid, config.dimension);
        let report = Scheduler::new(config, &grid).expect("config").run().expect("run");
        assert_eq!(reference.verdict, expected);
        assert_eq!(report.verdict(), expected);
    }
}

#[test]
fn overrides_beat_file_settings() {
    let text = format!("{}\n[run]\nthreads = 3\n", grid_toml(&solved_4x4()));
    let file = write_file(&text);

    let overrides = RunOverrides {
        threads: Some(7),
        lock: Some(LockKind::BoundedFair),
        ..RunOverrides::default()
    };
    let (config, _) = RunFile::from_path(file.path())
        .expect("parse")
        .resolve(&overrides)
        .expect("resolve");
    assert_eq!(config.threads, 7);
    assert_eq!(config.dimension, 4);
    assert_eq!(config.task_increment, 1);
    assert_eq!(config.lock, LockKind::BoundedFair);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");
    let err = RunFile::from_path(&path).expect_err("missing");
    match err {
        Error::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_inputs_are_rejected() {
    let err = RunFile::from_toml_str("grid = \"not a grid\"").expect_err("bad toml");
    assert!(matches!(err, Error::Parse(_)));

    let err = RunFile::from_toml_str("grid = []\n[run]\nthreads = 2\nbogus = 1\n")
        .expect_err("unknown key");
    assert!(matches!(err, Error::Parse(_)));

    let text = format!("{}\n[run]\ndimension = 9\n", grid_toml(&solved_4x4()));
    let err = RunFile::from_toml_str(&text)
        .expect("parse")
        .resolve(&RunOverrides::default())
        .expect_err("mismatch");
    assert!(matches!(
        err,
        Error::Config(ConfigError::DimensionMismatch { configured: 9, actual: 4 })
    ));

    let mut cells = solved_4x4();
    cells[2][3] = 9;
    let err = RunFile::from_toml_str(&grid_toml(&cells))
        .expect("parse")
        .resolve(&RunOverrides::default())
        .expect_err("out of range");
    assert!(matches!(err, Error::Grid(GridError::ValueOutOfRange { .. })));
}
