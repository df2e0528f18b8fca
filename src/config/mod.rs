//! Configuration management for surge
//!
//! This module handles loading and validating configuration from environment variables
//! and TOML files. Detector settings are passed explicitly into
//! [`TrendDetector`](crate::analytics::TrendDetector) rather than living in globals.

use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trend detector configuration
    pub detector: DetectorConfig,

    /// Event ingestion and bucketing configuration
    pub ingest: IngestConfig,

    /// Trend store configuration
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Multiplicative spike ratios at which each severity tier starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            low: 1.2,
            medium: 1.5,
            high: 2.0,
            critical: 3.0,
        }
    }
}

/// Trend detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Number of trailing buckets in the rolling baseline
    pub window_size: usize,

    /// Severity cut points
    pub thresholds: SeverityThresholds,

    /// Lookback subtracted from the latest bucket to get `windowStart`
    pub lookback_minutes: i64,

    /// Descriptive label emitted as `windowDuration`
    pub window_label: String,

    /// Maximum sample texts per trend
    pub max_samples: usize,

    /// Maximum top sources per trend
    pub max_sources: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: 4,
            thresholds: SeverityThresholds::default(),
            lookback_minutes: 120,
            window_label: String::from("2h"),
            max_samples: 5,
            max_sources: 3,
        }
    }
}

impl DetectorConfig {
    /// Validate detector settings
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            anyhow::bail!("window_size must be greater than 0");
        }

        let t = &self.thresholds;
        if t.low <= 0.0 {
            anyhow::bail!("severity thresholds must be positive");
        }
        if !(t.low < t.medium && t.medium < t.high && t.high < t.critical) {
            anyhow::bail!(
                "severity thresholds must be strictly increasing (low < medium < high < critical)"
            );
        }

        if self.lookback_minutes < 0 {
            anyhow::bail!("lookback_minutes must not be negative");
        }

        Ok(())
    }

    /// Get lookback as a chrono Duration
    #[must_use]
    pub fn lookback(&self) -> Duration {
        Duration::minutes(self.lookback_minutes)
    }

    /// Label describing the baseline the spike is compared against
    #[must_use]
    pub fn comparison_period(&self) -> String {
        format!("vs last {} buckets average", self.window_size)
    }
}

/// Event ingestion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Bucket width in seconds used when aggregating raw events
    pub bucket_seconds: i64,

    /// Text used for events that carry none
    pub default_text: String,

    /// Source used for events that carry none
    pub default_source: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            bucket_seconds: 60,
            default_text: String::from("No text available"),
            default_source: String::from("unknown"),
        }
    }
}

/// Trend store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding the latest batch of trends
    pub trends_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            trends_path: PathBuf::from("data/trends.json"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl LoggingConfig {
    const LEVELS: [&'static str; 5] = ["trace", "debug", "info", "warn", "error"];
    const FORMATS: [&'static str; 2] = ["text", "json"];

    /// Validate level and format names
    pub fn validate(&self) -> Result<()> {
        if !Self::LEVELS.contains(&self.level.as_str()) {
            anyhow::bail!(
                "logging.level must be one of {:?}, got {:?}",
                Self::LEVELS,
                self.level
            );
        }

        if !Self::FORMATS.contains(&self.format.as_str()) {
            anyhow::bail!(
                "logging.format must be one of {:?}, got {:?}",
                Self::FORMATS,
                self.format
            );
        }

        Ok(())
    }

    /// `EnvFilter` directive for this crate; `verbose` forces debug
    pub fn filter_directive(&self, verbose: bool) -> String {
        if verbose {
            String::from("surge=debug,info")
        } else {
            format!("surge={},warn", self.level)
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let window_size = env_parse("SURGE_WINDOW_SIZE")?.unwrap_or(defaults.detector.window_size);

        let lookback_minutes =
            env_parse("SURGE_LOOKBACK_MINUTES")?.unwrap_or(defaults.detector.lookback_minutes);

        let window_label =
            std::env::var("SURGE_WINDOW_LABEL").unwrap_or(defaults.detector.window_label);

        let max_samples = env_parse("SURGE_MAX_SAMPLES")?.unwrap_or(defaults.detector.max_samples);

        let max_sources = env_parse("SURGE_MAX_SOURCES")?.unwrap_or(defaults.detector.max_sources);

        let bucket_seconds =
            env_parse("SURGE_BUCKET_SECONDS")?.unwrap_or(defaults.ingest.bucket_seconds);

        let trends_path = std::env::var("SURGE_TRENDS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage.trends_path);

        let level = std::env::var("SURGE_LOG_LEVEL").unwrap_or(defaults.logging.level);

        let format = std::env::var("SURGE_LOG_FORMAT").unwrap_or(defaults.logging.format);

        Ok(Self {
            detector: DetectorConfig {
                window_size,
                lookback_minutes,
                window_label,
                max_samples,
                max_sources,
                ..defaults.detector
            },
            ingest: IngestConfig {
                bucket_seconds,
                ..defaults.ingest
            },
            storage: StorageConfig { trends_path },
            logging: LoggingConfig { level, format },
        })
    }

    /// Load configuration from a TOML file; missing sections take defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.detector.validate()?;
        self.logging.validate()?;

        if self.ingest.bucket_seconds <= 0 {
            anyhow::bail!("bucket_seconds must be positive");
        }

        Ok(())
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Invalid value for {key}: {value:?}")),
        Err(_) => Ok(None),
    }
}
