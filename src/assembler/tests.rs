// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use super::cli::CliConfig;
use super::{format_statement, run_one, statements_json};
use crate::core::error::FrontErrorKind;
use crate::core::scope::Session;
use crate::core::structurer::fetch_statements;

fn config() -> CliConfig {
    CliConfig {
        dump_statements: false,
        dump_json: false,
        lang: "en".to_string(),
        max_alias_depth: 64,
    }
}

fn write_temp_asm(label: &str, content: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join(format!("test-{label}-{}-{nanos}", process::id()));
    fs::create_dir_all(&dir).expect("Create temp dir");
    let path = dir.join("main.asm");
    fs::write(&path, content).expect("Write temp source");
    path
}

#[test]
fn run_one_accepts_a_clean_file() {
    let path = write_temp_asm("clean", "lda #5;\nsta (base), y;\n");
    let report = run_one(&config(), &path).expect("clean run");
    assert_eq!(report.error_count(), 0);
    assert_eq!(report.source_lines().len(), 2);
}

#[test]
fn run_one_rejects_an_empty_file() {
    let path = write_temp_asm("empty", "\n   \n");
    let err = run_one(&config(), &path).unwrap_err();
    assert_eq!(err.kind(), FrontErrorKind::NothingToDo);
}

#[test]
fn run_one_fails_on_missing_file() {
    let err = run_one(&config(), &PathBuf::from("no-such-file.asm")).unwrap_err();
    assert_eq!(err.kind(), FrontErrorKind::Io);
}

#[test]
fn run_one_reports_malformed_source() {
    let path = write_temp_asm("malformed", "(1, 2];\n");
    let err = run_one(&config(), &path).unwrap_err();
    assert_eq!(err.kind(), FrontErrorKind::Structural);
    assert_eq!(err.diagnostics().len(), 1);
}

#[test]
fn run_one_reports_unterminated_source() {
    let path = write_temp_asm("unterminated", "lda (base\n");
    let err = run_one(&config(), &path).unwrap_err();
    assert_eq!(err.kind(), FrontErrorKind::Continuation);
}

#[test]
fn statement_dump_lists_chunks() {
    let session = Session::default();
    let lines = vec!["sta (base), y;".to_string()];
    let result = fetch_statements(&session, &lines, 0, None);
    let text = format_statement(0, &result.statements[0]);
    assert!(text.contains("lines 1-1"));
    assert!(text.contains("level  0"));
}

#[test]
fn json_dump_carries_levels_and_offsets() {
    let session = Session::default();
    let lines = vec!["a = 1;".to_string()];
    let result = fetch_statements(&session, &lines, 0, None);
    let text = statements_json("prog.asm", &result.statements);
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(value["file"], "prog.asm");
    assert_eq!(value["statements"][0]["max_level"], -1);
    assert_eq!(value["statements"][0]["chunks"][0]["tokens"][0]["text"], "a");
}
