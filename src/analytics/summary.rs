//! Presentation helpers for detected trends
//!
//! Human-readable summaries for logs and alerts, plus the report shape
//! returned to callers after a detection run.

use serde::{Deserialize, Serialize};

use crate::models::{Severity, TrendRecord};

/// Number of trends per severity tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityBreakdown {
    /// Tally a batch of trends
    pub fn from_trends(trends: &[TrendRecord]) -> Self {
        trends.iter().fold(Self::default(), |mut acc, trend| {
            match trend.severity {
                Severity::Critical => acc.critical += 1,
                Severity::High => acc.high += 1,
                Severity::Medium => acc.medium += 1,
                Severity::Low => acc.low += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

/// Result of one detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub message: String,
    pub count: usize,
    pub trends: Vec<TrendRecord>,
    pub summary: SeverityBreakdown,
}

impl DetectionReport {
    pub fn new(trends: Vec<TrendRecord>) -> Self {
        let message = if trends.is_empty() {
            "No significant trends detected"
        } else {
            "Trend detection complete"
        };

        Self {
            message: message.to_string(),
            count: trends.len(),
            summary: SeverityBreakdown::from_trends(&trends),
            trends,
        }
    }
}

/// Turn `SIDE_EFFECTS` into `Side Effects`
pub fn title_case(category: &str) -> String {
    category
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One-paragraph summary of a trend for logging and alerting
pub fn format_trend_summary(trend: &TrendRecord) -> String {
    format!(
        "{icon} {severity} Alert: {category}\n   \
         {count} events detected ({percent:.0}% above baseline)\n   \
         Trend is {direction} ({spike:.1}x normal activity)",
        icon = trend.severity.icon(),
        severity = trend.severity,
        category = title_case(&trend.category),
        count = trend.current_count,
        percent = trend.percent_increase,
        direction = trend.trend_direction,
        spike = trend.spike_score,
    )
}
