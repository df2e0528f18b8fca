use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use surge::config::Config;
use surge::ingest::load_events_path;
use surge::pipeline::Pipeline;

pub fn aggregate(config: &Config, events_path: &Path, out: &Path) -> Result<()> {
    let events = load_events_path(events_path, &config.ingest)
        .with_context(|| format!("Failed to load events from {}", events_path.display()))?;

    let table = Pipeline::from_config(config).aggregate(&events);

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let file = File::create(out)
        .with_context(|| format!("Failed to create output file: {}", out.display()))?;
    table.write_csv(BufWriter::new(file))?;

    tracing::info!(
        events = events.len(),
        buckets = table.len(),
        out = %out.display(),
        "Aggregated table written"
    );
    println!(
        "Aggregated {} events into {} buckets: {}",
        events.len(),
        table.len(),
        out.display()
    );

    Ok(())
}
