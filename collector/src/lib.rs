//! CrUX Collector
//!
//! This crate fetches Core Web Vitals for a list of origins from the Chrome
//! UX Report API and writes one row per origin and metric to `ClickHouse`.
//!
//! # Architecture
//!
//! - [`fetcher`] issues one `records:queryRecord` request per origin and
//!   normalizes the response with [`shared::normalize`]
//! - [`pipeline`] runs the origins in sequence and records what happened to each
//! - [`config`] and [`db`] load settings from the environment
//!
//! # Example
//!
//! ```no_run
//! use collector::run_collection;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let summary = run_collection().await?;
//!     println!("stored {} rows", summary.rows_stored());
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod db;
pub mod error;
pub mod fetcher;
pub mod pipeline;

pub use config::Config;
pub use db::{Database, DatabaseConfig};
pub use error::FetchError;
pub use fetcher::MetricFetcher;
pub use pipeline::{collect, OriginOutcome, OriginReport, RunSummary};

use anyhow::{Context, Result};
use shared::sources::read_origins;
use shared::storage::ClickHouseRecordStore;

/// Runs a collection with configuration from environment variables.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The database cannot be reached
pub async fn run_collection() -> Result<RunSummary> {
    let config = Config::from_env()?;
    run_collection_with_config(config).await
}

/// Runs a collection with the provided configuration.
///
/// Only an unreachable database aborts the run; origin and row failures are
/// reported in the returned summary.
///
/// # Errors
///
/// Returns an error if the database cannot be reached or the HTTP client
/// cannot be built.
pub async fn run_collection_with_config(config: Config) -> Result<RunSummary> {
    tracing::info!(
        api_url = %config.api_url,
        urls_file = %config.urls_file.display(),
        metrics = ?config.metrics,
        "CrUX collection starting"
    );

    let database = Database::new(&config.database);
    database
        .ping()
        .await
        .with_context(|| format!("Database at {} is unreachable", config.database.url()))?;

    let store = ClickHouseRecordStore::new(database.client());
    let fetcher = MetricFetcher::from_config(&config).context("Failed to build HTTP client")?;
    let origins = read_origins(&config.urls_file);

    if origins.is_empty() {
        tracing::warn!("No origins to collect");
    }

    Ok(collect(&fetcher, &store, &config.api_key, &origins, &config.metrics).await)
}

/// Initializes the tracing subscriber used by the binaries.
///
/// The filter is taken from `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
