mod common;

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{TestWorkspace, declared_types};
use predicates::{prelude::PredicateBooleanExt, str::contains};

#[test]
fn default_paths_load_plays_into_plays_db() {
    let ws = TestWorkspace::new();
    fs::create_dir(ws.path().join("team_data_combined")).expect("create data dir");
    ws.write(
        "team_data_combined/plays.csv",
        "down,yards,desc\n1,10,short pass\n2,-5,sack\n3,3.5,run left\n",
    );

    cargo_bin_cmd!("csv-ingest")
        .current_dir(ws.path())
        .assert()
        .success()
        .stdout(
            "Created plays.db with table 'plays'.\n\
             Imported rows: 3 (from streaming total 3).\n\
             Columns:\n  - down: INTEGER\n  - yards: REAL\n  - desc: TEXT\n",
        );

    assert_eq!(declared_types(&ws.path().join("plays.db"), "plays").len(), 3);
}

#[test]
fn missing_input_exits_non_zero_without_creating_database() {
    let ws = TestWorkspace::new();
    let db = ws.path().join("out.db");

    cargo_bin_cmd!("csv-ingest")
        .args([
            "-i",
            ws.path().join("nope.csv").to_str().unwrap(),
            "-d",
            db.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("CSV not found at").and(contains("nope.csv")));

    assert!(!db.exists());
}

#[test]
fn json_summary_reports_both_counts() {
    let ws = TestWorkspace::new();
    let input = ws.write("plays.csv", "down,desc\n1,a\n2,b\n3,c\n");
    let db = ws.path().join("plays.db");

    let output = cargo_bin_cmd!("csv-ingest")
        .args([
            "-i",
            input.to_str().unwrap(),
            "-d",
            db.to_str().unwrap(),
            "--chunk-size",
            "2",
            "--json",
        ])
        .output()
        .expect("run binary");
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(summary["stored_rows"], 3);
    assert_eq!(summary["streamed_rows"], 3);
    assert_eq!(summary["chunks"], 2);
    assert_eq!(summary["columns"][0]["type"], "INTEGER");
}

#[test]
fn semicolon_delimiter_and_custom_table() {
    let ws = TestWorkspace::new();
    let input = ws.write("drives.txt", "team;points\nKC;7\nSF;3\n");
    let db = ws.path().join("drives.db");

    cargo_bin_cmd!("csv-ingest")
        .args([
            "-i",
            input.to_str().unwrap(),
            "-d",
            db.to_str().unwrap(),
            "-t",
            "drives",
            "--delimiter",
            "semicolon",
        ])
        .assert()
        .success()
        .stdout(contains("with table 'drives'").and(contains("  - points: INTEGER")));
}

#[test]
fn input_encoding_is_honoured() {
    let ws = TestWorkspace::new();
    let input = ws.path().join("latin.csv");
    let (encoded, _, _) = encoding_rs::WINDOWS_1252.encode("team,city\n1,Montr\u{e9}al\n");
    fs::write(&input, &encoded).expect("write encoded input");
    let db = ws.path().join("latin.db");

    cargo_bin_cmd!("csv-ingest")
        .args([
            "-i",
            input.to_str().unwrap(),
            "-d",
            db.to_str().unwrap(),
            "--input-encoding",
            "windows-1252",
        ])
        .assert()
        .success()
        .stdout(contains("Imported rows: 1"));

    let conn = rusqlite::Connection::open(&db).expect("open db");
    let city: String = conn
        .query_row("SELECT city FROM plays", [], |row| row.get(0))
        .expect("read city");
    assert_eq!(city, "Montr\u{e9}al");
}

#[test]
fn invalid_threshold_is_rejected_before_loading() {
    let ws = TestWorkspace::new();
    let input = ws.write("plays.csv", "down\n1\n");
    let db = ws.path().join("plays.db");

    cargo_bin_cmd!("csv-ingest")
        .args([
            "-i",
            input.to_str().unwrap(),
            "-d",
            db.to_str().unwrap(),
            "--threshold",
            "1.5",
        ])
        .assert()
        .failure();

    assert!(!db.exists());
}

#[test]
fn utf16_input_encoding_is_rejected_before_loading() {
    let ws = TestWorkspace::new();
    let input = ws.write("plays.csv", "down\n1\n");
    let db = ws.path().join("plays.db");

    cargo_bin_cmd!("csv-ingest")
        .args([
            "-i",
            input.to_str().unwrap(),
            "-d",
            db.to_str().unwrap(),
            "--input-encoding",
            "utf-16le",
        ])
        .assert()
        .failure()
        .stderr(contains("not ASCII-compatible"));

    assert!(!db.exists());
}
