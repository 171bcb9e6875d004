//! Error types for the news module

use thiserror::Error;

/// Errors that can occur while fetching or decoding upstream feeds
#[derive(Debug, Error)]
pub enum NewsError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Upstream returned a non-success status
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from upstream
        message: String,
    },

    /// Request did not complete in time
    #[error("Timed out after {0} ms")]
    Timeout(u64),

    /// Failed to parse a payload
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
