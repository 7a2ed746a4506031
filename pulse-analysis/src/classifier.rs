//! Classifier abstraction

use async_trait::async_trait;
use pulse_core::SentimentVerdict;

use crate::error::AnalysisError;

/// Turns a headline/body pair into a structured sentiment verdict.
///
/// The aggregation pipeline only sees this trait; the production
/// implementation is [`OpenAiClassifier`](crate::OpenAiClassifier).
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, headline: &str, body: &str)
        -> Result<SentimentVerdict, AnalysisError>;
}
