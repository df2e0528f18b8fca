//! Loading the aggregated count table and raw events
//!
//! Both tables may arrive as CSV (with a header row) or as a JSON array of
//! objects. Field presence is checked up front so that a table without, say,
//! a `category` column is rejected as a whole instead of yielding partial
//! results. Rows then deserialize into typed records before validation.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use super::error::{InputError, InputResult};
use super::record::{
    CountRecord, EventRecord, BUCKET_ALIASES, BUCKET_TIME, CATEGORY, COUNT, TIMESTAMP,
    TIMESTAMP_ALIASES,
};
use crate::config::IngestConfig;
use crate::models::{AggregatedRow, RawEvent};

/// Aggregated count table: one row per (category, bucket)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountTable {
    rows: Vec<AggregatedRow>,
}

impl CountTable {
    /// Wrap already-typed rows
    pub fn new(rows: Vec<AggregatedRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[AggregatedRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<AggregatedRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Read a CSV table with a `category,bucket_time,count` header
    ///
    /// The bucket column may also be named `hour` or `bucket`. Extra columns
    /// are ignored.
    pub fn from_csv_reader<R: Read>(reader: R) -> InputResult<Self> {
        let mut reader = csv_reader(reader);
        let headers = reader.headers()?.clone();

        require_column(&headers, &[CATEGORY], CATEGORY)?;
        require_column(&headers, BUCKET_ALIASES, BUCKET_TIME)?;
        require_column(&headers, &[COUNT], COUNT)?;

        let rows = reader
            .deserialize::<CountRecord>()
            .enumerate()
            .map(|(i, record)| record?.into_row(i + 1))
            .collect::<InputResult<Vec<_>>>()?;

        Ok(Self { rows })
    }

    /// Read a CSV table from disk
    pub fn from_csv_path(path: &Path) -> InputResult<Self> {
        Self::from_csv_reader(open(path)?)
    }

    /// Read a JSON array of `{category, bucket_time, count}` objects
    pub fn from_json_str(json: &str) -> InputResult<Self> {
        let objects = json_objects(json)?;

        require_key(&objects, &[CATEGORY], CATEGORY)?;
        require_key(&objects, BUCKET_ALIASES, BUCKET_TIME)?;
        require_key(&objects, &[COUNT], COUNT)?;

        let rows = objects
            .into_iter()
            .enumerate()
            .map(|(i, object)| decode::<CountRecord>(object, i + 1)?.into_row(i + 1))
            .collect::<InputResult<Vec<_>>>()?;

        Ok(Self { rows })
    }

    /// Load a table from disk, choosing the format by file extension
    pub fn from_path(path: &Path) -> InputResult<Self> {
        if is_json(path) {
            Self::from_json_str(&read_to_string(path)?)
        } else {
            Self::from_csv_path(path)
        }
    }

    /// Write the table as CSV with RFC 3339 bucket times
    pub fn write_csv<W: Write>(&self, writer: W) -> InputResult<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record([CATEGORY, BUCKET_TIME, COUNT])?;

        for row in &self.rows {
            let bucket = row.bucket_time.to_rfc3339();
            let count = row.count.to_string();
            writer.write_record([row.category.as_str(), bucket.as_str(), count.as_str()])?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl From<Vec<AggregatedRow>> for CountTable {
    fn from(rows: Vec<AggregatedRow>) -> Self {
        Self::new(rows)
    }
}

/// Read raw events from CSV
///
/// `category` and a timestamp column (`timestamp` or `createdAt`) are
/// required. Missing `text`/`source` columns or empty cells fall back to the
/// configured defaults.
pub fn load_events_csv<R: Read>(reader: R, config: &IngestConfig) -> InputResult<Vec<RawEvent>> {
    let mut reader = csv_reader(reader);
    let headers = reader.headers()?.clone();

    require_column(&headers, &[CATEGORY], CATEGORY)?;
    require_column(&headers, TIMESTAMP_ALIASES, TIMESTAMP)?;

    reader
        .deserialize::<EventRecord>()
        .enumerate()
        .map(|(i, record)| record?.into_event(i + 1, config))
        .collect()
}

/// Read raw events from a JSON array of objects
pub fn load_events_json(json: &str, config: &IngestConfig) -> InputResult<Vec<RawEvent>> {
    let objects = json_objects(json)?;

    require_key(&objects, &[CATEGORY], CATEGORY)?;
    require_key(&objects, TIMESTAMP_ALIASES, TIMESTAMP)?;

    objects
        .into_iter()
        .enumerate()
        .map(|(i, object)| decode::<EventRecord>(object, i + 1)?.into_event(i + 1, config))
        .collect()
}

/// Load raw events from disk, choosing the format by file extension
pub fn load_events_path(path: &Path, config: &IngestConfig) -> InputResult<Vec<RawEvent>> {
    if is_json(path) {
        load_events_json(&read_to_string(path)?, config)
    } else {
        load_events_csv(open(path)?, config)
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader)
}

fn open(path: &Path) -> InputResult<File> {
    File::open(path).map_err(|e| InputError::unreadable(format!("{}: {e}", path.display())))
}

fn read_to_string(path: &Path) -> InputResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| InputError::unreadable(format!("{}: {e}", path.display())))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Fail with `MissingField` when the header has none of the accepted names
fn require_column(
    headers: &csv::StringRecord,
    names: &[&str],
    field: &'static str,
) -> InputResult<()> {
    if headers.iter().any(|h| names.contains(&h)) {
        Ok(())
    } else {
        Err(InputError::MissingField { field })
    }
}

fn json_objects(json: &str) -> InputResult<Vec<Map<String, Value>>> {
    let value: Value = serde_json::from_str(json)?;

    let Value::Array(items) = value else {
        return Err(InputError::unreadable("expected a JSON array of objects"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(InputError::invalid(
                i + 1,
                "row",
                format!("expected an object, got {other}"),
            )),
        })
        .collect()
}

/// Fail with `MissingField` when no row carries any of the accepted keys
fn require_key(
    objects: &[Map<String, Value>],
    keys: &[&str],
    field: &'static str,
) -> InputResult<()> {
    if objects.is_empty() {
        return Ok(());
    }

    let present = objects
        .iter()
        .any(|object| keys.iter().any(|key| object.contains_key(*key)));

    if present {
        Ok(())
    } else {
        Err(InputError::MissingField { field })
    }
}

fn decode<T: DeserializeOwned>(object: Map<String, Value>, row: usize) -> InputResult<T> {
    serde_json::from_value(Value::Object(object))
        .map_err(|e| InputError::invalid(row, "row", e.to_string()))
}
