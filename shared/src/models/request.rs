//! Report request data model.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Body of a `records:queryRecord` call.
///
/// # Example
///
/// ```
/// use shared::models::MetricRequest;
///
/// let request = MetricRequest::new("https://example.com", &["largest_contentful_paint".to_string()]);
/// let body = serde_json::to_string(&request).unwrap();
///
/// assert_eq!(
///     body,
///     r#"{"origin":"https://example.com","metrics":["largest_contentful_paint"]}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MetricRequest {
    /// The origin to query.
    #[validate(length(min = 1, message = "Origin cannot be empty"))]
    pub origin: String,

    /// Metrics to request. Empty requests every metric the API has.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<String>,
}

/// Errors that can occur during request validation.
#[derive(Debug, Error)]
pub enum RequestValidationError {
    /// The origin is empty or whitespace.
    #[error("Origin cannot be empty")]
    EmptyOrigin,

    /// Validation failed with details.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

impl MetricRequest {
    /// Creates a request for `origin` asking for `metrics`.
    #[must_use]
    pub fn new(origin: impl Into<String>, metrics: &[String]) -> Self {
        Self {
            origin: origin.into(),
            metrics: metrics.to_vec(),
        }
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin is empty or only whitespace.
    pub fn validate_request(&self) -> Result<(), RequestValidationError> {
        if self.origin.trim().is_empty() {
            return Err(RequestValidationError::EmptyOrigin);
        }

        self.validate()?;
        Ok(())
    }
}
