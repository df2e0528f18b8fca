//! Trend persistence
//!
//! Each detection run produces a fresh batch of trends. Stores replace the
//! previous batch wholesale; nothing is merged across runs.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{Error, Result};
use crate::models::TrendRecord;

/// Destination for detected trend batches
pub trait TrendStore: Send + Sync {
    /// Replace all stored trends with `trends`, returning how many were dropped
    fn replace_all(&self, trends: &[TrendRecord]) -> Result<usize>;

    /// Load the current batch
    fn load_all(&self) -> Result<Vec<TrendRecord>>;

    /// Number of stored trends still flagged active
    fn active_count(&self) -> Result<usize> {
        Ok(self.load_all()?.iter().filter(|t| t.is_active).count())
    }
}

/// Stores the latest batch as a pretty-printed JSON array
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by `path`, creating parent directories
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::with_source(
                    format!("Failed to create trend store directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl JsonFileStore {
    fn temp_path(&self) -> PathBuf {
        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(".tmp");
        PathBuf::from(temp_name)
    }
}

fn write_batch(path: &Path, trends: &[TrendRecord]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, trends)?;
    writer.flush()?;
    Ok(())
}

impl TrendStore for JsonFileStore {
    fn replace_all(&self, trends: &[TrendRecord]) -> Result<usize> {
        // An unreadable old batch must not block the new one
        let previous = match self.load_all() {
            Ok(batch) => batch.len(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Stored trend batch is unreadable, overwriting it"
                );
                0
            }
        };

        // Write to temp file first, then rename (atomic)
        let temp_path = self.temp_path();
        if let Err(e) = write_batch(&temp_path, trends) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        fs::rename(&temp_path, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            cleared = previous,
            stored = trends.len(),
            "Trend batch replaced"
        );

        Ok(previous)
    }

    fn load_all(&self) -> Result<Vec<TrendRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// In-process store, useful when trends are served straight from memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    trends: RwLock<Vec<TrendRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrendStore for MemoryStore {
    fn replace_all(&self, trends: &[TrendRecord]) -> Result<usize> {
        let mut guard = self
            .trends
            .write()
            .map_err(|_| Error::other("trend store lock poisoned"))?;
        let previous = guard.len();
        *guard = trends.to_vec();
        Ok(previous)
    }

    fn load_all(&self) -> Result<Vec<TrendRecord>> {
        let guard = self
            .trends
            .read()
            .map_err(|_| Error::other("trend store lock poisoned"))?;
        Ok(guard.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Severity, TrendDirection};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn trend(category: &str) -> TrendRecord {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        TrendRecord {
            category: category.to_string(),
            spike_score: 2.5,
            current_count: 10,
            baseline_count: 4.0,
            percent_increase: 150.0,
            severity: Severity::High,
            trend_direction: TrendDirection::Spiking,
            window_start: now,
            window_end: now,
            window_duration: "2h".to_string(),
            detected_at: now,
            sample_texts: vec!["sample".to_string()],
            top_sources: Vec::new(),
            comparison_period: "vs last 4 buckets average".to_string(),
            is_active: true,
        }
    }

    #[test]
    fn test_json_store_replaces_batch() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/trends.json")).unwrap();

        assert!(store.load_all().unwrap().is_empty());

        let cleared = store.replace_all(&[trend("A"), trend("B")]).unwrap();
        assert_eq!(cleared, 0);

        let cleared = store.replace_all(&[trend("C")]).unwrap();
        assert_eq!(cleared, 2);

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].category, "C");
        assert_eq!(store.active_count().unwrap(), 1);
    }

    #[test]
    fn test_json_store_overwrites_corrupt_batch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trends.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::new(&path).unwrap();
        assert!(store.load_all().is_err());

        let cleared = store.replace_all(&[trend("A")]).unwrap();
        assert_eq!(cleared, 0);

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].category, "A");
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.replace_all(&[trend("A")]).unwrap(), 0);
        assert_eq!(store.replace_all(&[]).unwrap(), 1);
        assert!(store.load_all().unwrap().is_empty());
    }
}
