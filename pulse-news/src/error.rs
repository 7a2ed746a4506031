//! Error types for the news module

use thiserror::Error;

/// Errors that can occur while fetching the news feed
#[derive(Debug, Error)]
pub enum NewsError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Feed endpoint returned an error response
    #[error("Feed error (status {status}): {message}")]
    FeedError {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Failed to parse the feed body
    #[error("Parse error: {0}")]
    ParseError(String),
}
