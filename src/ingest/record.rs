//! Row shapes shared by the CSV and JSON loaders
//!
//! Rows deserialize into plain records first. Timestamp and count cells use
//! [`Cell`], which never fails on a scalar: an unusable value is kept with
//! its reason so the loader can report the exact row and field.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;
use std::marker::PhantomData;

use super::error::{InputError, InputResult};
use crate::config::IngestConfig;
use crate::models::{AggregatedRow, RawEvent};

pub(crate) const CATEGORY: &str = "category";
pub(crate) const BUCKET_TIME: &str = "bucket_time";
pub(crate) const COUNT: &str = "count";
pub(crate) const TIMESTAMP: &str = "timestamp";

/// Accepted column names for the bucket timestamp
pub(crate) const BUCKET_ALIASES: &[&str] = &[BUCKET_TIME, "hour", "bucket"];

/// Accepted column names for a raw event timestamp
pub(crate) const TIMESTAMP_ALIASES: &[&str] = &[TIMESTAMP, "createdAt"];

/// Parse RFC 3339 or naive `YYYY-MM-DD HH:MM[:SS[.f]]` timestamps (naive = UTC)
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    // pandas writes offsets after a space-separated time
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// A decoded cell
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell<T> {
    /// Absent, null, or empty
    Missing,
    Value(T),
    /// Present but unusable, with the reason
    Invalid(String),
}

impl<T> Default for Cell<T> {
    fn default() -> Self {
        Self::Missing
    }
}

impl<T> Cell<T> {
    fn require(self, row: usize, field: &'static str) -> InputResult<T> {
        match self {
            Self::Missing => Err(InputError::MissingValue { row, field }),
            Self::Value(value) => Ok(value),
            Self::Invalid(reason) => Err(InputError::invalid(row, field, reason)),
        }
    }

    fn or(self, fallback: Self) -> Self {
        match self {
            Self::Missing => fallback,
            present => present,
        }
    }
}

/// Scalar types a [`Cell`] can hold
pub(crate) trait CellValue: Sized {
    const EXPECTING: &'static str;

    fn from_text(value: &str) -> Cell<Self>;
    fn from_u64(value: u64) -> Cell<Self>;
    fn from_i64(value: i64) -> Cell<Self>;
    fn from_f64(value: f64) -> Cell<Self>;
}

impl CellValue for u64 {
    const EXPECTING: &'static str = "a non-negative integer";

    fn from_text(value: &str) -> Cell<Self> {
        if let Ok(count) = value.parse::<u64>() {
            return Cell::Value(count);
        }
        match value.parse::<f64>() {
            Ok(f) => Self::from_f64(f),
            Err(_) => Cell::Invalid(format!("expected {}, got {value:?}", Self::EXPECTING)),
        }
    }

    fn from_u64(value: u64) -> Cell<Self> {
        Cell::Value(value)
    }

    fn from_i64(value: i64) -> Cell<Self> {
        u64::try_from(value)
            .map_or_else(|_| Cell::Invalid("must not be negative".into()), Cell::Value)
    }

    fn from_f64(value: f64) -> Cell<Self> {
        // u64::MAX as f64 rounds up to 2^64, which is already out of range
        if value < 0.0 {
            Cell::Invalid("must not be negative".into())
        } else if value.is_finite() && value.fract() == 0.0 && value < u64::MAX as f64 {
            Cell::Value(value as u64)
        } else {
            Cell::Invalid(format!("expected {}, got {value}", Self::EXPECTING))
        }
    }
}

impl CellValue for DateTime<Utc> {
    const EXPECTING: &'static str = "a timestamp or epoch seconds";

    fn from_text(value: &str) -> Cell<Self> {
        parse_timestamp(value).map_or_else(
            || Cell::Invalid(format!("unrecognized timestamp {value:?}")),
            Cell::Value,
        )
    }

    fn from_u64(value: u64) -> Cell<Self> {
        i64::try_from(value).map_or_else(
            |_| Cell::Invalid(format!("invalid epoch seconds {value}")),
            Self::from_i64,
        )
    }

    fn from_i64(value: i64) -> Cell<Self> {
        Utc.timestamp_opt(value, 0).single().map_or_else(
            || Cell::Invalid(format!("invalid epoch seconds {value}")),
            Cell::Value,
        )
    }

    fn from_f64(value: f64) -> Cell<Self> {
        Cell::Invalid(format!("expected {}, got {value}", Self::EXPECTING))
    }
}

struct CellVisitor<T>(PhantomData<T>);

impl<'de, T: CellValue> Visitor<'de> for CellVisitor<T> {
    type Value = Cell<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(T::EXPECTING)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Cell::Missing)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Cell::Missing)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        let value = value.trim();
        if value.is_empty() {
            Ok(Cell::Missing)
        } else {
            Ok(T::from_text(value))
        }
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(T::from_u64(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(T::from_i64(value))
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<Self::Value, E> {
        Ok(Cell::Invalid(format!("{value} is out of range")))
    }

    fn visit_i128<E: de::Error>(self, value: i128) -> Result<Self::Value, E> {
        Ok(Cell::Invalid(format!("{value} is out of range")))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(T::from_f64(value))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(Cell::Invalid(format!("expected {}, got {value}", T::EXPECTING)))
    }
}

impl<'de, T: CellValue> Deserialize<'de> for Cell<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_option(CellVisitor(PhantomData))
    }
}

/// One row of the aggregated count table
#[derive(Debug, Deserialize)]
pub(crate) struct CountRecord {
    #[serde(default)]
    category: Option<String>,

    #[serde(default, alias = "hour", alias = "bucket")]
    bucket_time: Cell<DateTime<Utc>>,

    #[serde(default)]
    count: Cell<u64>,
}

impl CountRecord {
    /// Validate the record as 1-based data row `row`
    pub(crate) fn into_row(self, row: usize) -> InputResult<AggregatedRow> {
        Ok(AggregatedRow {
            category: required_text(self.category, row, CATEGORY)?,
            bucket_time: self.bucket_time.require(row, BUCKET_TIME)?,
            count: self.count.require(row, COUNT)?,
        })
    }
}

/// One raw event
#[derive(Debug, Deserialize)]
pub(crate) struct EventRecord {
    #[serde(default)]
    text: Option<String>,

    #[serde(default)]
    category: Option<String>,

    #[serde(default)]
    source: Option<String>,

    #[serde(default)]
    timestamp: Cell<DateTime<Utc>>,

    #[serde(default, rename = "createdAt")]
    created_at: Cell<DateTime<Utc>>,
}

impl EventRecord {
    /// Validate the record, filling in configured defaults for text and source
    pub(crate) fn into_event(self, row: usize, config: &IngestConfig) -> InputResult<RawEvent> {
        Ok(RawEvent {
            text: non_empty(self.text).unwrap_or_else(|| config.default_text.clone()),
            category: required_text(self.category, row, CATEGORY)?,
            source: non_empty(self.source).unwrap_or_else(|| config.default_source.clone()),
            timestamp: self.timestamp.or(self.created_at).require(row, TIMESTAMP)?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn required_text(value: Option<String>, row: usize, field: &'static str) -> InputResult<String> {
    non_empty(value).ok_or(InputError::MissingValue { row, field })
}
