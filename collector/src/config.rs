//! Collector configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use crate::db::DatabaseConfig;
use anyhow::{ensure, Context, Result};
use shared::models::default_metric_names;
use std::path::PathBuf;
use std::time::Duration;

/// Default report endpoint of the Chrome UX Report API.
pub const DEFAULT_API_URL: &str = "https://chromeuxreport.googleapis.com/v1/records:queryRecord";

/// API key used when `CRUX_API_KEY` is not set.
pub const DEFAULT_API_KEY: &str = "YOUR_DEFAULT_API_KEY";

/// Collector configuration.
///
/// Configuration values can be set via environment variables:
/// - `CRUX_API_KEY`: API key sent as the `key` query parameter (default: "`YOUR_DEFAULT_API_KEY`")
/// - `CRUX_API_URL`: Report endpoint (default: the public CrUX `records:queryRecord` endpoint)
/// - `CRUX_URLS_FILE`: Origin list file (default: "urls.json")
/// - `CRUX_METRICS`: Comma separated metric names (default: LCP, CLS and INP)
/// - `CRUX_TIMEOUT_SECS`: HTTP request timeout in seconds, at least 1 (default: 30)
///
/// Database settings are read by [`DatabaseConfig`].
#[derive(Debug, Clone)]
pub struct Config {
    /// The report API key.
    pub api_key: String,
    /// The report endpoint.
    pub api_url: String,
    /// Path of the origin list file.
    pub urls_file: PathBuf,
    /// Metrics requested for every origin.
    pub metrics: Vec<String>,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Database settings.
    pub database: DatabaseConfig,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `CRUX_TIMEOUT_SECS` is set but is not a positive whole number of seconds
    /// - `DB_PORT` is set but cannot be parsed as a valid port number
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates a configuration from an arbitrary key lookup.
    ///
    /// Unset and empty values fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric setting cannot be parsed or the timeout
    /// is zero.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let timeout_secs = var("CRUX_TIMEOUT_SECS")
            .map(|secs| secs.parse::<u64>())
            .transpose()
            .context("CRUX_TIMEOUT_SECS is not a whole number of seconds")?
            .unwrap_or(30);
        ensure!(timeout_secs > 0, "CRUX_TIMEOUT_SECS must be greater than zero");
        let timeout = Duration::from_secs(timeout_secs);

        let metrics = var("CRUX_METRICS")
            .map(|metrics| parse_metric_list(&metrics))
            .filter(|metrics| !metrics.is_empty())
            .unwrap_or_else(default_metric_names);

        Ok(Self {
            api_key: var("CRUX_API_KEY").unwrap_or_else(|| DEFAULT_API_KEY.to_string()),
            api_url: var("CRUX_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            urls_file: var("CRUX_URLS_FILE").map_or_else(|| PathBuf::from("urls.json"), PathBuf::from),
            metrics,
            timeout,
            database: DatabaseConfig::from_lookup(&lookup)?,
        })
    }
}

/// Splits a comma separated metric list, dropping blank entries.
#[must_use]
pub fn parse_metric_list(metrics: &str) -> Vec<String> {
    metrics
        .split(',')
        .map(str::trim)
        .filter(|metric| !metric.is_empty())
        .map(ToString::to_string)
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            urls_file: PathBuf::from("urls.json"),
            metrics: default_metric_names(),
            timeout: Duration::from_secs(30),
            database: DatabaseConfig::default(),
        }
    }
}
