//! CrUX CLI
//!
//! Command-line interface for the CrUX collector.
//!
//! # Usage
//!
//! ```bash
//! crux --help
//! crux run --urls-file urls.json
//! crux fetch https://example.com --metrics largest_contentful_paint
//! crux normalize response.json
//! ```

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use collector::config::parse_metric_list;
use collector::{Config, MetricFetcher};
use shared::models::{default_metric_names, MetricRecord};
use shared::normalize::normalize;
use std::path::{Path, PathBuf};

/// CrUX CLI - Core Web Vitals collection from the Chrome UX Report API
#[derive(Parser)]
#[command(name = "crux")]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Report API endpoint
    #[arg(long, env = "CRUX_API_URL")]
    api_url: Option<String>,

    /// Report API key
    #[arg(short = 'k', long, env = "CRUX_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Metrics to request, comma separated
    #[arg(short, long, value_delimiter = ',', global = true)]
    metrics: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect every origin in the origin list and store the rows
    Run {
        /// Origin list file
        #[arg(short, long)]
        urls_file: Option<PathBuf>,
    },
    /// Fetch and print the metrics of a single origin
    Fetch {
        /// The origin to query
        origin: String,
    },
    /// Normalize a saved report response
    Normalize {
        /// File holding the raw API response
        file: PathBuf,
    },
}

impl Cli {
    /// Applies the command line overrides on top of `config`.
    fn apply(&self, config: &mut Config) {
        if let Some(ref api_url) = self.api_url {
            config.api_url.clone_from(api_url);
        }
        if let Some(ref api_key) = self.api_key {
            config.api_key.clone_from(api_key);
        }
        let metrics = self.metric_overrides();
        if !metrics.is_empty() {
            config.metrics = metrics;
        }
        if let Commands::Run {
            urls_file: Some(ref urls_file),
        } = self.command
        {
            config.urls_file.clone_from(urls_file);
        }
    }

    fn metric_overrides(&self) -> Vec<String> {
        self.metrics
            .iter()
            .map(|metric| metric.trim().to_string())
            .filter(|metric| !metric.is_empty())
            .collect()
    }

    /// Metrics for offline normalization: `--metrics`, then `CRUX_METRICS`,
    /// then the defaults. Nothing else from the environment is read.
    fn offline_metrics(&self, env_metrics: Option<&str>) -> Vec<String> {
        let metrics = self.metric_overrides();
        if !metrics.is_empty() {
            return metrics;
        }
        env_metrics
            .map(parse_metric_list)
            .filter(|metrics| !metrics.is_empty())
            .unwrap_or_else(default_metric_names)
    }

    fn load_config(&self) -> Result<Config> {
        let mut config = Config::from_env()?;
        self.apply(&mut config);
        Ok(config)
    }
}

/// Normalizes the report response stored in `path`.
fn normalize_file(path: &Path, metrics: &[String]) -> Result<Vec<MetricRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(normalize(&raw, metrics))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "No .env file loaded");
    }

    match cli.command {
        Commands::Run { .. } => {
            let config = cli.load_config()?;
            let summary = collector::run_collection_with_config(config).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Fetch { ref origin } => {
            let config = cli.load_config()?;
            let fetcher = MetricFetcher::from_config(&config)?;
            let records = fetcher
                .fetch(origin, &config.api_key, &config.metrics)
                .await
                .with_context(|| format!("Failed to fetch metrics for {origin}"))?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Normalize { ref file } => {
            let env_metrics = std::env::var("CRUX_METRICS").ok();
            let metrics = cli.offline_metrics(env_metrics.as_deref());
            let records = normalize_file(file, &metrics)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }

    Ok(())
}
