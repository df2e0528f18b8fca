//! Error scenario tests
//!
//! Structural input problems fail the whole call with a descriptive error;
//! thin or flat data is not an error.

use std::fs;

use surge::config::IngestConfig;
use surge::error::{Error, ErrorCategory};
use surge::ingest::{load_events_json, CountTable, InputError};
use surge::pipeline::Pipeline;
use surge::storage::{JsonFileStore, TrendStore};
use tempfile::TempDir;

#[test]
fn test_missing_count_column() {
    let csv = "category,hour\nA,2025-03-01 10:00:00\n";
    let err = CountTable::from_csv_reader(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, InputError::MissingField { field: "count" }));
}

#[test]
fn test_missing_bucket_column() {
    let csv = "category,count\nA,3\n";
    let err = CountTable::from_csv_reader(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, InputError::MissingField { field: "bucket_time" }));
}

#[test]
fn test_bad_timestamp_names_row() {
    let csv = "category,bucket_time,count\nA,2025-03-01T10:00:00Z,1\nA,not-a-time,2\n";
    let err = CountTable::from_csv_reader(csv.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        InputError::InvalidValue { row: 2, field: "bucket_time", .. }
    ));
}

#[test]
fn test_missing_file_is_unreadable() {
    let dir = TempDir::new().unwrap();
    let err = CountTable::from_path(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, InputError::Unreadable { .. }));
}

#[test]
fn test_events_without_category_fail_whole_run() {
    let json = r#"[{"text": "x", "timestamp": "2025-03-01T10:00:00Z"}]"#;
    let err = load_events_json(json, &IngestConfig::default()).unwrap_err();
    assert!(matches!(err, InputError::MissingField { field: "category" }));
}

#[test]
fn test_duplicate_buckets_fail_detection() {
    let csv = "category,bucket_time,count\n\
               A,2025-03-01T10:00:00Z,1\n\
               A,2025-03-01T10:00:00Z,2\n";
    let table = CountTable::from_csv_reader(csv.as_bytes()).unwrap();

    let err: Error = Pipeline::default().detect(&table, None).unwrap_err().into();
    assert_eq!(err.category(), ErrorCategory::Input);
    assert!(err.to_string().contains("'A'"));
}

#[test]
fn test_corrupt_store_is_parsing_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trends.json");
    fs::write(&path, "{not json").unwrap();

    let store = JsonFileStore::new(&path).unwrap();
    let err = store.load_all().unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Parsing);
}
