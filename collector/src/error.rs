//! Error types for fetching report data.

use shared::models::RequestValidationError;
use thiserror::Error;

/// Errors that end the fetch of a single origin.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestValidationError),

    /// The request could not be sent or its response could not be read.
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The API answered with a status other than 200.
    #[error("API returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// The response body is not valid JSON.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        // The request URL carries the API key.
        Self::Transport(error.without_url())
    }
}
