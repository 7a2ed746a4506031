//! Error types for sentiment classification

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while classifying an article
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The model API call failed
    #[error("API error: {0}")]
    Api(String),

    /// The model response was not parseable JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// The response parsed but violated the verdict contract
    #[error("Invalid verdict: {0}")]
    InvalidVerdict(String),

    /// The call exceeded its deadline
    #[error("Classifier call timed out after {0:?}")]
    Timeout(Duration),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
