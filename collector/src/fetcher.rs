//! Chrome UX Report API client.
//!
//! Issues one `records:queryRecord` call per origin and hands the raw
//! response to [`shared::normalize::normalize`].

use crate::config::Config;
use crate::error::FetchError;
use reqwest::Client;
use serde_json::Value;
use shared::models::{MetricRecord, MetricRequest};
use shared::normalize::normalize;
use std::time::Duration;
use tracing::debug;

/// Fetches normalized metric records from the report API.
#[derive(Debug, Clone)]
pub struct MetricFetcher {
    http_client: Client,
    endpoint: String,
}

impl MetricFetcher {
    /// Creates a fetcher posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }

    /// Creates a fetcher from the collector configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(config.api_url.clone(), config.timeout)
    }

    /// Returns the endpoint requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetches the metrics of `origin`.
    ///
    /// Exactly one request is sent; it is never retried.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin is empty, the request fails, the API
    /// answers with any status other than 200 or the body is not JSON.
    pub async fn fetch(
        &self,
        origin: &str,
        api_key: &str,
        desired_metrics: &[String],
    ) -> Result<Vec<MetricRecord>, FetchError> {
        let request = MetricRequest::new(origin, desired_metrics);
        request.validate_request()?;

        debug!(
            origin = %origin,
            metrics = ?request.metrics,
            "Sending report request"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        debug!(
            origin = %origin,
            status = status.as_u16(),
            bytes = body.len(),
            "Report response received"
        );

        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw: Value = serde_json::from_str(&body)?;
        Ok(normalize(&raw, desired_metrics))
    }
}
