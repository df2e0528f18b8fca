//! End-to-end detection runs
//!
//! Wires the ingest, detection, and storage steps together the way the
//! scheduled detection job uses them: bucket the raw events, detect trends
//! against the rolling baseline, then replace the stored batch.

use chrono::{DateTime, Utc};

use crate::analytics::{format_trend_summary, DetectionReport, TrendDetector};
use crate::config::{Config, IngestConfig};
use crate::error::Result;
use crate::ingest::{aggregate, CountTable, InputResult};
use crate::models::RawEvent;
use crate::storage::TrendStore;

/// A configured detection run
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    detector: TrendDetector,
    ingest: IngestConfig,
}

impl Pipeline {
    pub fn new(detector: TrendDetector, ingest: IngestConfig) -> Self {
        Self { detector, ingest }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            TrendDetector::new(config.detector.clone()),
            config.ingest.clone(),
        )
    }

    pub fn detector(&self) -> &TrendDetector {
        &self.detector
    }

    /// Bucket raw events into the aggregated count table
    pub fn aggregate(&self, events: &[RawEvent]) -> CountTable {
        CountTable::new(aggregate(events, self.ingest.bucket_seconds))
    }

    /// Detect trends on an aggregated table, optionally enriched by raw events
    pub fn detect(
        &self,
        table: &CountTable,
        events: Option<&[RawEvent]>,
    ) -> InputResult<DetectionReport> {
        self.detect_at(table, events, Utc::now())
    }

    pub fn detect_at(
        &self,
        table: &CountTable,
        events: Option<&[RawEvent]>,
        detected_at: DateTime<Utc>,
    ) -> InputResult<DetectionReport> {
        let trends = self.detector.detect_at(table.rows(), events, detected_at)?;

        for trend in &trends {
            tracing::info!("{}", format_trend_summary(trend));
        }

        Ok(DetectionReport::new(trends))
    }

    /// Aggregate raw events, detect, and return the report
    pub fn run_events(&self, events: &[RawEvent]) -> InputResult<DetectionReport> {
        if events.is_empty() {
            tracing::warn!("No events available for trend detection");
            return Ok(DetectionReport::new(Vec::new()));
        }

        let table = self.aggregate(events);
        tracing::info!(
            events = events.len(),
            buckets = table.len(),
            "Aggregated events into time buckets"
        );

        self.detect(&table, Some(events))
    }

    /// Run on raw events and replace the stored batch with the result
    pub fn run_and_store(
        &self,
        events: &[RawEvent],
        store: &dyn TrendStore,
    ) -> Result<DetectionReport> {
        let report = self.run_events(events)?;

        let cleared = store.replace_all(&report.trends)?;
        tracing::info!(cleared, stored = report.count, "Trend store updated");

        Ok(report)
    }
}
