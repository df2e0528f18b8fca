use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use surge::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "surge",
    version,
    about = "Detect spiking event categories against a rolling baseline",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (defaults come from SURGE_* environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides `logging.format` from the config
    #[arg(long, global = true, value_parser = ["text", "json"])]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bucket raw events into an aggregated count table
    Aggregate {
        /// Raw events file (.csv or .json)
        #[arg(short, long)]
        events: PathBuf,

        /// Output CSV path for the aggregated table
        #[arg(short, long, default_value = "data/events.csv")]
        out: PathBuf,
    },

    /// Detect trends in an aggregated count table
    Detect {
        /// Aggregated table (.csv or .json) with category, bucket_time, count
        #[arg(long)]
        counts: PathBuf,

        /// Raw events used for sample texts and top sources
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Replace the stored trend batch with this run's trends
        #[arg(long, default_value = "false")]
        store: bool,
    },

    /// Periodically re-aggregate raw events, detect, and store trends
    Watch {
        /// Raw events file (.csv or .json), re-read on every run
        #[arg(short, long)]
        events: PathBuf,

        /// Seconds between detection runs
        #[arg(short, long, default_value = "7200")]
        interval_secs: u64,

        /// Stop after this many runs (at least 1)
        #[arg(long)]
        iterations: Option<NonZeroUsize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    // Initialize tracing/logging
    let log_format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    setup_tracing(log_format, &config.logging.filter_directive(cli.verbose))?;

    tracing::info!("surge starting");

    match cli.command {
        Commands::Aggregate { events, out } => {
            tracing::info!(
                events = %events.display(),
                out = %out.display(),
                "Starting aggregate command"
            );
            commands::aggregate(&config, &events, &out)?;
        }

        Commands::Detect {
            counts,
            events,
            out,
            store,
        } => {
            tracing::info!(
                counts = %counts.display(),
                events = ?events,
                out = ?out,
                store = %store,
                "Starting detect command"
            );
            commands::detect(&config, &counts, events.as_deref(), out.as_deref(), store)?;
        }

        Commands::Watch {
            events,
            interval_secs,
            iterations,
        } => {
            tracing::info!(
                events = %events.display(),
                interval_secs = %interval_secs,
                iterations = ?iterations,
                "Starting watch command"
            );
            commands::watch(&config, events, interval_secs, iterations).await?;
        }
    }

    tracing::info!("surge completed successfully");
    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env().context("Failed to load configuration from environment")?,
    };

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn setup_tracing(format: &str, directive: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::new(directive);

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
