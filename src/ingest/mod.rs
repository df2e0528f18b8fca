//! Input tables for trend detection
//!
//! The detector consumes an aggregated count table and, optionally, the raw
//! events behind it. This module reads both from CSV or JSON, validates that
//! the required fields are present, and provides the bucketing step that
//! turns raw events into counts.

pub mod aggregate;
pub mod error;
mod record;
pub mod table;

pub use aggregate::{aggregate, floor_to_bucket};
pub use error::{InputError, InputResult};
pub use record::parse_timestamp;
pub use table::{load_events_csv, load_events_json, load_events_path, CountTable};
