// Core data structures for surge trend detection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// One row of the aggregated count table: events per (category, bucket)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedRow {
    pub category: String,
    pub bucket_time: DateTime<Utc>,
    pub count: u64,
}

impl AggregatedRow {
    pub fn new(category: impl Into<String>, bucket_time: DateTime<Utc>, count: u64) -> Self {
        Self {
            category: category.into(),
            bucket_time,
            count,
        }
    }
}

/// Raw classified event, used only for sample texts and source attribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub text: String,
    pub category: String,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

impl RawEvent {
    pub fn new(
        text: impl Into<String>,
        category: impl Into<String>,
        source: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            source: source.into(),
            timestamp,
        }
    }
}

/// Trend severity, ordered from weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// Marker used in human-readable summaries
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Low => "🟡",
            Self::Medium => "🟠",
            Self::High => "🔴",
            Self::Critical => "🚨",
        }
    }

    /// All severities, strongest first
    pub fn all() -> [Self; 4] {
        [Self::Critical, Self::High, Self::Medium, Self::Low]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative direction of a detected trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Spike score at or above the critical threshold
    Surging,
    /// Spike score at or above the high threshold
    Spiking,
    /// Spike score at or above the medium threshold
    Elevated,
    /// Below medium and weaker than the previous evaluable bucket
    Declining,
    /// Below medium and not weaker than the previous evaluable bucket
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Surging => "surging",
            Self::Spiking => "spiking",
            Self::Elevated => "elevated",
            Self::Declining => "declining",
            Self::Stable => "stable",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event count contributed by a single source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCount {
    pub source: String,
    pub count: u64,
}

/// A detected trend for one category
///
/// Floating-point fields hold full precision; they are rounded only when
/// serialized (2 decimals for ratios and counts, 1 for percentages).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendRecord {
    pub category: String,
    #[serde(serialize_with = "round2")]
    pub spike_score: f64,
    pub current_count: u64,
    #[serde(serialize_with = "round2")]
    pub baseline_count: f64,
    #[serde(serialize_with = "round1")]
    pub percent_increase: f64,
    pub severity: Severity,
    pub trend_direction: TrendDirection,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub window_duration: String,
    pub detected_at: DateTime<Utc>,
    pub sample_texts: Vec<String>,
    pub top_sources: Vec<SourceCount>,
    pub comparison_period: String,
    pub is_active: bool,
}

impl TrendRecord {
    /// Compare two records ignoring `detected_at`
    pub fn same_detection(&self, other: &Self) -> bool {
        Self {
            detected_at: other.detected_at,
            ..self.clone()
        } == *other
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn round2<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 2))
}

fn round1<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 1))
}
