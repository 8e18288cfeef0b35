//! Normalization of raw CrUX report responses into `MetricRecord`s.
//!
//! The report API answers with a loosely typed, metric-dependent shape:
//! percentiles may be numbers or numeric strings, histograms may be missing
//! and bucket fields may be absent. Responses are decoded into a
//! `serde_json::Value` first and then walked with optional accessors, so a
//! single odd entry never rejects the whole response.
//!
//! # Example
//!
//! ```
//! use shared::normalize::normalize;
//! use serde_json::json;
//!
//! let response = json!({
//!     "record": {
//!         "metrics": {
//!             "cumulative_layout_shift": { "percentiles": { "p75": "0.15" } }
//!         }
//!     }
//! });
//!
//! let records = normalize(&response, &["cumulative_layout_shift".to_string()]);
//! assert_eq!(records[0].p75, 0.15);
//! ```

use crate::models::{HistogramBucket, MetricRecord};
use serde_json::Value;
use tracing::{debug, warn};

/// Converts a raw report response into metric records.
///
/// Only metrics named in `desired_metrics` are considered. Entries without a
/// usable `percentiles.p75` are skipped with a warning; every other field
/// falls back to a default. Output order follows the response mapping, not
/// `desired_metrics`.
#[must_use]
pub fn normalize(response: &Value, desired_metrics: &[String]) -> Vec<MetricRecord> {
    let Some(metrics) = response
        .get("record")
        .and_then(|record| record.get("metrics"))
        .and_then(Value::as_object)
    else {
        debug!("Response has no record.metrics mapping");
        return Vec::new();
    };

    metrics
        .iter()
        .filter(|(name, _)| desired_metrics.iter().any(|desired| desired == *name))
        .filter_map(|(name, entry)| normalize_metric(name, entry))
        .collect()
}

/// Normalizes a single `record.metrics` entry.
///
/// Returns `None` when the entry has no `percentiles.p75` or when it is
/// neither a number nor a string.
#[must_use]
pub fn normalize_metric(name: &str, entry: &Value) -> Option<MetricRecord> {
    let Some(raw) = entry
        .get("percentiles")
        .and_then(|percentiles| percentiles.get("p75"))
    else {
        warn!(metric = %name, "p75 not found, skipping metric");
        return None;
    };

    let Some(p75) = coerce_percentile(raw) else {
        warn!(
            metric = %name,
            kind = value_kind(raw),
            "Unexpected p75 type, skipping metric"
        );
        return None;
    };

    Some(MetricRecord::new(name, p75).with_histogram(extract_histogram(entry)))
}

/// Coerces a raw percentile value to `f64`.
///
/// Numbers are used as is. Strings are parsed, and a string that does not
/// hold a finite number becomes `0.0`. Any other JSON type yields `None`.
#[must_use]
pub fn coerce_percentile(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => Some(
            text.parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .unwrap_or(0.0),
        ),
        _ => None,
    }
}

/// Extracts the histogram of a metric entry; absent or non-array is empty.
fn extract_histogram(entry: &Value) -> Vec<HistogramBucket> {
    entry
        .get("histogram")
        .and_then(Value::as_array)
        .map(|buckets| buckets.iter().map(extract_bucket).collect())
        .unwrap_or_default()
}

fn extract_bucket(bucket: &Value) -> HistogramBucket {
    HistogramBucket::new(
        number_field(bucket, "start"),
        number_field(bucket, "end"),
        number_field(bucket, "density"),
    )
}

/// Reads a numeric field, `0.0` when missing or not a number.
fn number_field(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod normalize_test;
