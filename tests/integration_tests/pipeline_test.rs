//! File-backed pipeline tests: aggregate, detect, and store

use std::fs;

use chrono::{TimeZone, Utc};
use surge::analytics::format_trend_summary;
use surge::config::Config;
use surge::ingest::{load_events_path, CountTable};
use surge::models::{Severity, TrendDirection};
use surge::pipeline::Pipeline;
use surge::storage::{JsonFileStore, TrendStore};
use tempfile::TempDir;

use super::fixtures::{AGGREGATED_CSV, RAW_EVENTS_JSON};

#[test]
fn test_aggregated_csv_detection() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.csv");
    fs::write(&path, AGGREGATED_CSV).unwrap();

    let table = CountTable::from_path(&path).unwrap();
    assert_eq!(table.len(), 10);

    let report = Pipeline::default().detect(&table, None).unwrap();

    assert_eq!(report.count, 1);
    assert_eq!(report.summary.high, 1);
    let trend = &report.trends[0];
    assert_eq!(trend.category, "SIDE_EFFECTS");
    assert_eq!(trend.severity, Severity::High);
    assert_eq!(trend.trend_direction, TrendDirection::Spiking);
    assert_eq!(
        trend.window_end,
        Utc.with_ymd_and_hms(2025, 3, 1, 10, 4, 0).unwrap()
    );
}

#[test]
fn test_raw_events_end_to_end() {
    let dir = TempDir::new().unwrap();
    let events_path = dir.path().join("events.json");
    fs::write(&events_path, RAW_EVENTS_JSON).unwrap();

    let config = Config::default();
    let events = load_events_path(&events_path, &config.ingest).unwrap();
    assert_eq!(events.len(), 18);
    assert_eq!(events[17].text, "No text available");
    assert_eq!(events[17].source, "unknown");

    let pipeline = Pipeline::from_config(&config);
    let table = pipeline.aggregate(&events);

    // round-trip the aggregated table through CSV as the scheduled job does
    let csv_path = dir.path().join("aggregated.csv");
    table.write_csv(fs::File::create(&csv_path).unwrap()).unwrap();
    let reloaded = CountTable::from_path(&csv_path).unwrap();
    assert_eq!(reloaded, table);

    let report = pipeline.detect(&reloaded, Some(events.as_slice())).unwrap();
    assert_eq!(report.count, 1);

    let trend = &report.trends[0];
    assert_eq!(trend.category, "SIDE_EFFECTS");
    assert_eq!(trend.current_count, 8);
    assert_eq!(trend.severity, Severity::High);
    assert_eq!(trend.sample_texts.len(), 5);
    assert_eq!(trend.sample_texts[0], "Safety signal H");

    // pubmed and fda tie at 6; pubmed was seen first
    let sources: Vec<_> = trend
        .top_sources
        .iter()
        .map(|s| (s.source.as_str(), s.count))
        .collect();
    assert_eq!(sources, vec![("pubmed", 6), ("fda", 6), ("rss", 3)]);

    let summary = format_trend_summary(trend);
    assert!(summary.contains("HIGH Alert: Side Effects"));
}

#[test]
fn test_store_keeps_only_latest_batch() {
    let dir = TempDir::new().unwrap();
    let events_path = dir.path().join("events.json");
    fs::write(&events_path, RAW_EVENTS_JSON).unwrap();

    let mut config = Config::default();
    config.storage.trends_path = dir.path().join("store/trends.json");

    let events = load_events_path(&events_path, &config.ingest).unwrap();
    let store = JsonFileStore::new(&config.storage.trends_path).unwrap();
    let pipeline = Pipeline::from_config(&config);

    pipeline.run_and_store(&events, &store).unwrap();
    pipeline.run_and_store(&events, &store).unwrap();

    let stored = store.load_all().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].category, "SIDE_EFFECTS");

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config.storage.trends_path).unwrap()).unwrap();
    assert_eq!(raw[0]["spikeScore"], 2.29);
    assert_eq!(raw[0]["percentIncrease"], 128.6);
}
