//! Sentiment aggregation for the FinPulse dashboard
//!
//! This crate is the heart of the backend: [`AnalysisPipeline`] drives
//! classifier calls over a batch of articles and folds every verdict into
//! [`AggregateState`] through its single `merge` entry point.

pub mod pipeline;
pub mod state;

pub use pipeline::{
    AnalysisPipeline, BatchOutcome, PipelineStatus, PipelineUpdate, DEFAULT_BATCH_LIMIT,
};
pub use state::{
    interpret_mood, AggregateSnapshot, AggregateState, SectorAggregate, SectorMood,
    HISTORY_CAPACITY, OPPORTUNITY_CAPACITY,
};
