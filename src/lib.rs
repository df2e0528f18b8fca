//! surge - Category trend and spike detection
//!
//! Buckets a stream of categorized events by time, keeps a rolling baseline
//! per category, and flags categories whose latest activity spikes above it,
//! with a severity tier and a direction label.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`models`] - Core data structures and types
//! - [`ingest`] - Loading and bucketing of input tables
//! - [`analytics`] - Rolling baselines, spike detection, and summaries
//! - [`storage`] - Trend batch persistence
//! - [`pipeline`] - End-to-end detection runs
//! - [`error`] - Unified error type
//!
//! # Example
//!
//! ```no_run
//! use surge::analytics::TrendDetector;
//! use surge::config::Config;
//! use surge::ingest::CountTable;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let table = CountTable::from_path("data/events.csv".as_ref())?;
//!     let detector = TrendDetector::new(config.detector);
//!     let trends = detector.detect(table.rows(), None)?;
//!     println!("{} trends", trends.len());
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod storage;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analytics::{DetectionReport, TrendDetector};
    pub use crate::config::{Config, DetectorConfig};
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::ingest::{CountTable, InputError};
    pub use crate::models::{AggregatedRow, RawEvent, Severity, TrendDirection, TrendRecord};
    pub use crate::pipeline::Pipeline;
    pub use crate::storage::{JsonFileStore, TrendStore};
}

// Direct re-exports for convenience
pub use models::{AggregatedRow, RawEvent, Severity, TrendDirection, TrendRecord};
