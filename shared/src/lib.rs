//! CrUX Collector Shared Library
//!
//! This crate contains the types and pure logic used across the CrUX
//! collector: the metric record model, normalization of raw report
//! responses, origin list loading and record storage.
//!
//! # Modules
//!
//! - [`models`] - Request and metric record models
//! - [`normalize`] - Raw report response normalization
//! - [`sources`] - Origin list loading
//! - [`storage`] - Storage traits and implementations
//!
//! # Example
//!
//! ```
//! use shared::models::MetricRow;
//! use shared::normalize::normalize;
//! use serde_json::json;
//!
//! let response = json!({
//!     "record": {
//!         "metrics": {
//!             "largest_contentful_paint": {
//!                 "percentiles": { "p75": 2456 },
//!                 "histogram": [
//!                     { "start": 0, "end": 2500, "density": 0.8 },
//!                     { "start": 2500, "end": 4000, "density": 0.15 },
//!                     { "start": 4000, "density": 0.05 }
//!                 ]
//!             }
//!         }
//!     }
//! });
//!
//! let records = normalize(&response, &["largest_contentful_paint".to_string()]);
//! let row = MetricRow::from_record("https://example.com", &records[0]);
//!
//! assert_eq!(row.good, 0.8);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod models;
pub mod normalize;
pub mod sources;
pub mod storage;

/// Re-export common dependencies for convenience.
pub use serde;
pub use serde_json;
pub use validator;
