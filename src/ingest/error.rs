//! Error types for input tables
//!
//! Structural problems with the aggregated table or the raw events are fatal
//! to a detection call. Each variant names the field (and row or category)
//! needed to track the problem down.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type for ingest and validation operations
pub type InputResult<T> = Result<T, InputError>;

/// Errors raised while reading or validating input tables
#[derive(Error, Debug)]
pub enum InputError {
    /// A required column or field is absent
    #[error("Missing required field '{field}'")]
    MissingField { field: &'static str },

    /// A required field is absent from one specific row
    #[error("Row {row}: missing required field '{field}'")]
    MissingValue { row: usize, field: &'static str },

    /// A field is present but cannot be interpreted
    #[error("Row {row}: invalid value for '{field}': {reason}")]
    InvalidValue {
        row: usize,
        field: &'static str,
        reason: String,
    },

    /// More than one row for the same (category, bucket) pair
    #[error("Duplicate bucket {bucket_time} for category '{category}'")]
    DuplicateBucket {
        category: String,
        bucket_time: DateTime<Utc>,
    },

    /// The input could not be read at all
    #[error("Unreadable input: {reason}")]
    Unreadable { reason: String },
}

impl InputError {
    /// Name of the offending field, when the error concerns one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field }
            | Self::MissingValue { field, .. }
            | Self::InvalidValue { field, .. } => Some(*field),
            Self::DuplicateBucket { .. } => Some("bucket_time"),
            Self::Unreadable { .. } => None,
        }
    }

    pub(crate) fn invalid(row: usize, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            row,
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn unreadable(reason: impl std::fmt::Display) -> Self {
        Self::Unreadable {
            reason: reason.to_string(),
        }
    }
}

impl From<csv::Error> for InputError {
    fn from(err: csv::Error) -> Self {
        Self::unreadable(err)
    }
}

impl From<serde_json::Error> for InputError {
    fn from(err: serde_json::Error) -> Self {
        Self::unreadable(err)
    }
}

impl From<std::io::Error> for InputError {
    fn from(err: std::io::Error) -> Self {
        Self::unreadable(err)
    }
}
