//! Rolling-baseline trend detection over the aggregated count table
//!
//! For every category the detector orders its buckets in time, computes a
//! trailing moving average of `window_size` buckets, and compares the latest
//! bucket against that baseline:
//!
//! ```text
//! spike_score      = latest_count / latest_mean
//! percent_increase = (latest_count - latest_mean) / latest_mean * 100
//! ```
//!
//! Categories whose spike score reaches the lowest severity threshold produce
//! one [`TrendRecord`]. Categories with too little history, a zero baseline,
//! or a weak score are skipped without error.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use surge::analytics::TrendDetector;
//! use surge::config::DetectorConfig;
//! use surge::models::{AggregatedRow, Severity};
//!
//! let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
//! let rows: Vec<_> = [2, 2, 2, 2, 8]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &c)| AggregatedRow::new("SIDE_EFFECTS", t0 + Duration::minutes(i as i64), c))
//!     .collect();
//!
//! let detector = TrendDetector::new(DetectorConfig::default());
//! let trends = detector.detect(&rows, None).unwrap();
//!
//! assert_eq!(trends.len(), 1);
//! assert_eq!(trends[0].severity, Severity::High);
//! ```

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::enrichment::{sample_texts, top_sources};
use super::rolling::rolling_means;
use crate::config::DetectorConfig;
use crate::ingest::{InputError, InputResult};
use crate::models::{AggregatedRow, RawEvent, Severity, TrendDirection, TrendRecord};

/// Outcome of evaluating a single category
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// The latest bucket is a significant spike
    Trend(Box<TrendRecord>),

    /// Fewer rows than `window_size + 1`
    InsufficientHistory { have: usize, need: usize },

    /// Zero baseline, or a spike score below the lowest threshold
    NoSignal { spike_score: Option<f64> },
}

/// Rolling-baseline spike detector
///
/// Holds no mutable state; one detector can serve any number of snapshots,
/// including concurrently.
#[derive(Debug, Clone, Default)]
pub struct TrendDetector {
    config: DetectorConfig,
}

impl TrendDetector {
    /// Create a detector with the given configuration
    #[must_use]
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Get the detector configuration
    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect trends, stamping each record with the current time
    ///
    /// # Errors
    /// Returns [`InputError`] when a row has an empty category or when a
    /// (category, bucket) pair occurs more than once.
    pub fn detect(
        &self,
        rows: &[AggregatedRow],
        events: Option<&[RawEvent]>,
    ) -> InputResult<Vec<TrendRecord>> {
        self.detect_at(rows, events, Utc::now())
    }

    /// Detect trends with an explicit `detected_at` timestamp
    ///
    /// Records come out in the order their categories first appear in `rows`.
    ///
    /// # Errors
    /// Same as [`TrendDetector::detect`].
    pub fn detect_at(
        &self,
        rows: &[AggregatedRow],
        events: Option<&[RawEvent]>,
        detected_at: DateTime<Utc>,
    ) -> InputResult<Vec<TrendRecord>> {
        if rows.is_empty() {
            tracing::debug!("No aggregated rows, nothing to detect");
            return Ok(Vec::new());
        }

        let groups = group_by_category(rows)?;

        tracing::debug!(
            rows = rows.len(),
            categories = groups.len(),
            window_size = self.config.window_size,
            "Analyzing aggregated counts"
        );

        let mut trends = Vec::new();

        for (category, series) in groups {
            match self.evaluate(category, &series, events, detected_at) {
                Evaluation::Trend(trend) => {
                    tracing::info!(
                        category = %trend.category,
                        severity = %trend.severity,
                        direction = %trend.trend_direction,
                        spike_score = trend.spike_score,
                        current = trend.current_count,
                        baseline = trend.baseline_count,
                        "Trend detected"
                    );
                    trends.push(*trend);
                }
                Evaluation::InsufficientHistory { have, need } => {
                    tracing::debug!(category, have, need, "Insufficient history, skipping");
                }
                Evaluation::NoSignal { spike_score } => {
                    tracing::debug!(category, spike_score = ?spike_score, "No significant spike");
                }
            }
        }

        tracing::info!(trends = trends.len(), "Detection complete");

        Ok(trends)
    }

    /// Evaluate one category's time-ordered series
    ///
    /// `series` must already be sorted by `bucket_time` and belong to
    /// `category`.
    pub fn evaluate(
        &self,
        category: &str,
        series: &[&AggregatedRow],
        events: Option<&[RawEvent]>,
        detected_at: DateTime<Utc>,
    ) -> Evaluation {
        let need = self.config.window_size + 1;
        if series.len() < need {
            return Evaluation::InsufficientHistory {
                have: series.len(),
                need,
            };
        }

        let counts: Vec<u64> = series.iter().map(|row| row.count).collect();
        let points = rolling_means(&counts, self.config.window_size);

        // series.len() >= window_size + 1, so both points exist and have means
        let (Some(latest), Some(previous)) = (points.last(), points.iter().rev().nth(1)) else {
            return Evaluation::NoSignal { spike_score: None };
        };
        let (Some(baseline), Some(spike_score)) = (latest.mean, latest.spike_score()) else {
            return Evaluation::NoSignal { spike_score: None };
        };

        let Some(severity) = self.classify_severity(spike_score) else {
            return Evaluation::NoSignal {
                spike_score: Some(spike_score),
            };
        };

        let trend_direction = self.trend_direction(spike_score, previous.spike_score());
        let percent_increase = (latest.count as f64 - baseline) / baseline * 100.0;

        let window_end = series[series.len() - 1].bucket_time;
        let window_start = window_end - self.config.lookback();

        let (sample_texts, top_sources) = match events {
            Some(events) => (
                sample_texts(events, category, self.config.max_samples),
                top_sources(events, category, self.config.max_sources),
            ),
            None => (Vec::new(), Vec::new()),
        };

        Evaluation::Trend(Box::new(TrendRecord {
            category: category.to_string(),
            spike_score,
            current_count: latest.count,
            baseline_count: baseline,
            percent_increase,
            severity,
            trend_direction,
            window_start,
            window_end,
            window_duration: self.config.window_label.clone(),
            detected_at,
            sample_texts,
            top_sources,
            comparison_period: self.config.comparison_period(),
            is_active: true,
        }))
    }

    /// Map a spike score to a severity tier, strongest first
    ///
    /// Returns `None` below the lowest threshold (and for NaN).
    #[must_use]
    pub fn classify_severity(&self, spike_score: f64) -> Option<Severity> {
        let t = &self.config.thresholds;

        if spike_score >= t.critical {
            Some(Severity::Critical)
        } else if spike_score >= t.high {
            Some(Severity::High)
        } else if spike_score >= t.medium {
            Some(Severity::Medium)
        } else if spike_score >= t.low {
            Some(Severity::Low)
        } else {
            None
        }
    }

    /// Label the direction of a spike
    ///
    /// The top three tiers follow the severity ladder. Below that, a score
    /// weaker than the previous evaluable bucket's is `Declining`; an equal
    /// or stronger one, or a missing previous score, is `Stable`.
    #[must_use]
    pub fn trend_direction(&self, spike_score: f64, previous: Option<f64>) -> TrendDirection {
        let t = &self.config.thresholds;

        if spike_score >= t.critical {
            TrendDirection::Surging
        } else if spike_score >= t.high {
            TrendDirection::Spiking
        } else if spike_score >= t.medium {
            TrendDirection::Elevated
        } else if previous.is_some_and(|prev| spike_score < prev) {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        }
    }
}

/// Detect trends with the default configuration
pub fn detect_trends(
    rows: &[AggregatedRow],
    events: Option<&[RawEvent]>,
) -> InputResult<Vec<TrendRecord>> {
    TrendDetector::default().detect(rows, events)
}

/// Group rows by category in first-seen order, each group sorted by time
fn group_by_category(rows: &[AggregatedRow]) -> InputResult<Vec<(&str, Vec<&AggregatedRow>)>> {
    let mut groups: Vec<(&str, Vec<&AggregatedRow>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (i, row) in rows.iter().enumerate() {
        if row.category.trim().is_empty() {
            return Err(InputError::MissingValue {
                row: i + 1,
                field: "category",
            });
        }

        let slot = *index.entry(row.category.as_str()).or_insert_with(|| {
            groups.push((row.category.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(row);
    }

    for (category, series) in &mut groups {
        series.sort_by_key(|row| row.bucket_time);

        if let Some(pair) = series.windows(2).find(|w| w[0].bucket_time == w[1].bucket_time) {
            return Err(InputError::DuplicateBucket {
                category: (*category).to_string(),
                bucket_time: pair[1].bucket_time,
            });
        }
    }

    Ok(groups)
}
