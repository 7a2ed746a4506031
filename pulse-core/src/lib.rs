//! Core types for the FinPulse dashboard backend
//!
//! This crate defines the shared data structures used across the workspace:
//! news articles, sentiment verdicts, and the fixed sector taxonomy.

pub mod news;
pub mod sentiment;

pub use news::NewsArticle;
pub use sentiment::{
    HistoryPoint, Opportunity, Sector, SentimentLabel, SentimentVerdict, VerdictReasoning,
};
