use anyhow::{Context, Result};
use std::path::Path;

use surge::config::Config;
use surge::ingest::{load_events_path, CountTable};
use surge::pipeline::Pipeline;
use surge::storage::{JsonFileStore, TrendStore};

pub fn detect(
    config: &Config,
    counts_path: &Path,
    events_path: Option<&Path>,
    out: Option<&Path>,
    store: bool,
) -> Result<()> {
    let table = CountTable::from_path(counts_path).with_context(|| {
        format!("Failed to load aggregated table from {}", counts_path.display())
    })?;

    let events = events_path
        .map(|path| {
            load_events_path(path, &config.ingest)
                .with_context(|| format!("Failed to load events from {}", path.display()))
        })
        .transpose()?;

    tracing::info!(
        rows = table.len(),
        events = events.as_ref().map_or(0, Vec::len),
        "Running trend detection"
    );

    let report = Pipeline::from_config(config).detect(&table, events.as_deref())?;

    if store {
        let trend_store = JsonFileStore::new(&config.storage.trends_path)?;
        let cleared = trend_store.replace_all(&report.trends)?;
        tracing::info!(
            path = %trend_store.path().display(),
            cleared,
            stored = report.count,
            "Trend store updated"
        );
    }

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;

    match out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            println!("{} trends written to {}", report.count, path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
