//! Common test utilities and helpers for integration tests.
//!
//! This module provides a mock report API and canned responses shared by
//! the collection tests.

use collector::MetricFetcher;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path of the report endpoint on the mock server.
pub const QUERY_PATH: &str = "/v1/records:queryRecord";

/// Creates a fetcher pointed at the mock server.
pub fn test_fetcher(mock_server: &MockServer) -> MetricFetcher {
    MetricFetcher::new(
        format!("{}{QUERY_PATH}", mock_server.uri()),
        Duration::from_secs(5),
    )
    .expect("failed to create fetcher")
}

/// The three default metric names.
pub fn core_web_vitals() -> Vec<String> {
    shared::models::default_metric_names()
}

/// A response as the report API returns it for a well measured origin.
pub fn full_report(origin: &str) -> Value {
    json!({
        "record": {
            "key": { "origin": origin },
            "metrics": {
                "largest_contentful_paint": {
                    "histogram": [
                        { "start": 0, "end": 2500, "density": 0.8 },
                        { "start": 2500, "end": 4000, "density": 0.15 },
                        { "start": 4000, "density": 0.05 }
                    ],
                    "percentiles": { "p75": "2456.1" }
                },
                "cumulative_layout_shift": {
                    "histogram": [
                        { "start": "0.00", "end": "0.10", "density": 0.9 },
                        { "start": "0.10", "end": "0.25", "density": 0.06 },
                        { "start": "0.25", "density": 0.04 }
                    ],
                    "percentiles": { "p75": "0.05" }
                },
                "interaction_to_next_paint": {
                    "histogram": [
                        { "start": 0, "end": 200, "density": 0.85 },
                        { "start": 200, "end": 500, "density": 0.1 },
                        { "start": 500, "density": 0.05 }
                    ],
                    "percentiles": { "p75": 180 }
                },
                "first_contentful_paint": {
                    "percentiles": { "p75": 1500 }
                }
            }
        }
    })
}

/// Mounts a response for requests about `origin`.
pub async fn mount_origin(mock_server: &MockServer, origin: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_partial_json(json!({ "origin": origin })))
        .respond_with(response)
        .expect(1)
        .mount(mock_server)
        .await;
}
