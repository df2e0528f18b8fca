use anyhow::Result;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use surge::config::Config;
use surge::ingest::load_events_path;
use surge::pipeline::Pipeline;
use surge::storage::JsonFileStore;

/// Re-run detection on a fixed interval until Ctrl-C or `iterations` runs
///
/// A failed run is logged and retried on the next tick; the stored batch is
/// left untouched until a run succeeds.
pub async fn watch(
    config: &Config,
    events_path: PathBuf,
    interval_secs: u64,
    iterations: Option<NonZeroUsize>,
) -> Result<()> {
    let pipeline = Pipeline::from_config(config);
    let store = JsonFileStore::new(&config.storage.trends_path)?;

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    let mut runs = 0usize;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!(runs, "Interrupted, stopping watch");
                break;
            }
        }

        runs += 1;

        let outcome = load_events_path(&events_path, &config.ingest)
            .map_err(surge::error::Error::from)
            .and_then(|events| pipeline.run_and_store(&events, &store));

        match outcome {
            Ok(report) => tracing::info!(
                run = runs,
                trends = report.count,
                critical = report.summary.critical,
                high = report.summary.high,
                "Detection run complete"
            ),
            Err(e) => tracing::error!(
                run = runs,
                error = %e,
                category = e.category().as_str(),
                "Detection run failed"
            ),
        }

        if iterations.is_some_and(|max| runs >= max.get()) {
            break;
        }
    }

    Ok(())
}
