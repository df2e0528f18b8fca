//! Common test utilities

use chrono::{DateTime, Duration, TimeZone, Utc};
use surge::models::{AggregatedRow, RawEvent};

/// Fixed reference time for reproducible buckets
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
}

/// Start of the `i`-th minute bucket after [`base_time`]
pub fn minute(i: i64) -> DateTime<Utc> {
    base_time() + Duration::minutes(i)
}

/// Consecutive minute buckets for one category
pub fn series(category: &str, counts: &[u64]) -> Vec<AggregatedRow> {
    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| AggregatedRow::new(category, minute(i as i64), count))
        .collect()
}

/// Raw events for one category, one per `(text, source, minute)`
#[allow(dead_code)]
pub fn events(category: &str, items: &[(&str, &str, i64)]) -> Vec<RawEvent> {
    items
        .iter()
        .map(|&(text, source, m)| RawEvent::new(text, category, source, minute(m)))
        .collect()
}
