//! Data models for the CrUX collector.
//!
//! This module contains the request sent to the report API and the strict
//! records the raw responses are normalized into.

pub mod record;
pub mod request;

pub use record::{
    default_metric_names, HistogramBucket, MetricRecord, MetricRow, QualityBreakdown,
    CUMULATIVE_LAYOUT_SHIFT, INTERACTION_TO_NEXT_PAINT, LARGEST_CONTENTFUL_PAINT,
};
pub use request::{MetricRequest, RequestValidationError};
