//! LLM-backed sentiment classification
//!
//! Sends headline/body pairs to a chat-completion API and parses the
//! structured [`SentimentVerdict`](pulse_core::SentimentVerdict) the model
//! returns. The [`Classifier`] trait is the seam the aggregation pipeline
//! depends on, so tests can substitute a scripted implementation.

pub mod classifier;
pub mod error;
pub mod openai;

pub use classifier::Classifier;
pub use error::AnalysisError;
pub use openai::OpenAiClassifier;
