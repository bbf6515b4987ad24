//! Fatal error paths: unreadable or malformed captures, unwritable output.

use std::error::Error as _;
use std::fs;

use chrono::{TimeZone, Utc};
use harskill::capture::Capture;
use harskill::codegen::GenerationContext;
use harskill::config::ExportConfig;
use harskill::error::SkillError;
use harskill::export;
use harskill::pipeline::Analyzer;
use tempfile::TempDir;

fn ctx() -> GenerationContext {
    GenerationContext {
        generated_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    }
}

#[test]
fn test_missing_file_is_read_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing.har");

    let err = Capture::load(&path).unwrap_err();
    match &err {
        SkillError::Read { path: p, .. } => assert_eq!(p, &path),
        other => panic!("expected Read, got {:?}", other),
    }
    assert!(err.to_string().contains("missing.har"));
    assert!(err.source().is_some());
}

#[test]
fn test_invalid_json_is_malformed() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.har");
    fs::write(&path, "{\"log\": {\"entries\": [").unwrap();

    let err = Capture::load(&path).unwrap_err();
    assert!(matches!(err, SkillError::MalformedInput { .. }));
    assert!(err.to_string().contains("invalid JSON"));
}

#[test]
fn test_top_level_array_is_malformed() {
    let err = Capture::from_slice("list.har", b"[1, 2, 3]").unwrap_err();
    match err {
        SkillError::MalformedInput { reason, source, .. } => {
            assert!(reason.contains("array"));
            assert!(source.is_none());
        }
        other => panic!("expected MalformedInput, got {:?}", other),
    }
}

#[test]
fn test_top_level_string_is_malformed() {
    let err = Capture::from_slice("s.har", b"\"log\"").unwrap_err();
    assert!(matches!(err, SkillError::MalformedInput { .. }));
}

#[test]
fn test_empty_file_is_malformed() {
    let err = Capture::from_slice("empty.har", b"").unwrap_err();
    assert!(matches!(err, SkillError::MalformedInput { .. }));
}

#[test]
fn test_wrongly_typed_fields_are_tolerated() {
    let capture = Capture::from_slice(
        "odd.har",
        br#"{"log": {"entries": [
            {"request": {"method": 7, "url": "https://example.com/api/x", "headers": "nope"},
             "response": {"status": "200", "content": []},
             "time": "slow"},
            "not an entry",
            {"request": {"url": "https://example.com/api/y"}, "response": {"status": 200}}
        ]}}"#,
    )
    .unwrap();
    assert_eq!(capture.entries.len(), 3);

    let analysis = Analyzer::default().analyze(&capture);
    let paths: Vec<&str> = analysis.endpoints.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["/api/x", "/api/y"]);
    assert_eq!(analysis.endpoints[0].method, "GET");
    assert_eq!(analysis.endpoints[0].response_status, 0);
    assert_eq!(analysis.endpoints[0].timing_ms, 0.0);
}

#[test]
fn test_output_path_is_a_file() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("out");
    fs::write(&blocker, "occupied").unwrap();

    let capture = Capture::from_slice("a.har", br#"{"log": {"entries": []}}"#).unwrap();
    let analysis = Analyzer::default().analyze(&capture);

    let err = export::export_skill(&blocker, &analysis, ctx(), &ExportConfig::default())
        .unwrap_err();
    assert!(matches!(err, SkillError::OutputWrite { .. }));
    assert!(err.to_string().contains("out"));
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "occupied");
}

#[test]
fn test_output_under_a_file_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("file");
    fs::write(&blocker, "x").unwrap();

    let capture = Capture::from_slice("a.har", br#"{"log": {"entries": []}}"#).unwrap();
    let analysis = Analyzer::default().analyze(&capture);

    let result = export::export_skill(
        &blocker.join("nested"),
        &analysis,
        ctx(),
        &ExportConfig::default(),
    );
    assert!(matches!(result, Err(SkillError::OutputWrite { .. })));
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn test_occupied_bundle_entry_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("skill");
    fs::create_dir_all(out.join("endpoints.json")).unwrap();

    let path = format!("{}/tests/fixtures/portal.har", env!("CARGO_MANIFEST_DIR"));
    let analysis = Analyzer::default().analyze(&Capture::load(path).unwrap());

    let err = export::export_skill(&out, &analysis, ctx(), &ExportConfig::default())
        .unwrap_err();
    assert!(matches!(err, SkillError::OutputWrite { .. }));
    assert!(err.to_string().contains("endpoints.json"));

    // neither the client nor the credentials file may be left behind
    let left: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(left, vec!["endpoints.json".to_string()]);
}
