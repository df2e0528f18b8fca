//! Bucketing raw events into the aggregated count table

use chrono::{DateTime, TimeZone, Utc};
use std::collections::{BTreeMap, HashMap};

use crate::models::{AggregatedRow, RawEvent};

/// Floor a timestamp to the start of its fixed-width bucket
///
/// Buckets are aligned to the Unix epoch, so 60-second buckets start on the
/// minute.
pub fn floor_to_bucket(timestamp: DateTime<Utc>, bucket_seconds: i64) -> DateTime<Utc> {
    let width = bucket_seconds.max(1);
    let secs = timestamp.timestamp().div_euclid(width) * width;
    Utc.timestamp_opt(secs, 0).single().unwrap_or(timestamp)
}

/// Count events per (category, bucket)
///
/// Categories appear in the order they are first seen; within a category the
/// buckets are ascending. Each (category, bucket) pair yields exactly one row.
pub fn aggregate(events: &[RawEvent], bucket_seconds: i64) -> Vec<AggregatedRow> {
    let mut order: Vec<&str> = Vec::new();
    let mut buckets: HashMap<&str, BTreeMap<DateTime<Utc>, u64>> = HashMap::new();

    for event in events {
        let bucket = floor_to_bucket(event.timestamp, bucket_seconds);
        let per_category = buckets.entry(event.category.as_str()).or_insert_with(|| {
            order.push(event.category.as_str());
            BTreeMap::new()
        });
        *per_category.entry(bucket).or_insert(0) += 1;
    }

    let mut rows = Vec::new();
    for category in order {
        if let Some(per_category) = buckets.remove(category) {
            rows.extend(
                per_category
                    .into_iter()
                    .map(|(bucket_time, count)| AggregatedRow::new(category, bucket_time, count)),
            );
        }
    }

    tracing::debug!(events = events.len(), rows = rows.len(), "Aggregated events into buckets");

    rows
}
