//! Batch sentiment-aggregation pipeline
//!
//! Drives the classifier over a fetched batch of articles, strictly one
//! call in flight at a time, folding each verdict into the shared
//! [`AggregateState`] as it lands and broadcasting progress updates.
//! A failed classification is recorded and skipped; the batch always runs
//! to the end of its truncated item list.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tokio::time::timeout;
use tracing::{info, instrument, warn};

use pulse_analysis::{AnalysisError, Classifier};
use pulse_core::{NewsArticle, SentimentVerdict};

use crate::state::AggregateState;

/// Articles analyzed per batch unless the caller overrides it; caps
/// external-API cost per fetch cycle.
pub const DEFAULT_BATCH_LIMIT: usize = 10;

const DEFAULT_CLASSIFY_DEADLINE: Duration = Duration::from_secs(60);

/// Where the pipeline currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PipelineStatus {
    Idle,
    Running { percent: u8 },
    Done,
}

/// Counters for one completed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Progress events broadcast while a batch runs
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineUpdate {
    StatusChanged {
        status: PipelineStatus,
    },
    ItemAnalyzed {
        index: usize,
        total: usize,
        percent: u8,
        verdict: SentimentVerdict,
    },
    ItemFailed {
        index: usize,
        total: usize,
        percent: u8,
        error: String,
    },
    BatchCompleted {
        outcome: BatchOutcome,
    },
}

/// Sequential analysis pipeline over a [`Classifier`].
///
/// The aggregate state is the only shared mutable resource; every merge
/// goes through the write lock, so a user-triggered single analysis
/// interleaving with a running batch still produces serialized merges.
pub struct AnalysisPipeline<C: Classifier> {
    classifier: C,
    state: Arc<RwLock<AggregateState>>,
    status: RwLock<PipelineStatus>,
    update_tx: broadcast::Sender<PipelineUpdate>,
    classify_deadline: Duration,
}

impl<C: Classifier> AnalysisPipeline<C> {
    pub fn new(classifier: C) -> Self {
        let (update_tx, _) = broadcast::channel(100);
        Self {
            classifier,
            state: Arc::new(RwLock::new(AggregateState::new())),
            status: RwLock::new(PipelineStatus::Idle),
            update_tx,
            classify_deadline: DEFAULT_CLASSIFY_DEADLINE,
        }
    }

    /// Override the per-call classifier deadline.
    pub fn with_classify_deadline(mut self, deadline: Duration) -> Self {
        self.classify_deadline = deadline;
        self
    }

    /// Handle to the shared aggregate state for read-side consumers.
    pub fn state(&self) -> Arc<RwLock<AggregateState>> {
        Arc::clone(&self.state)
    }

    /// Subscribe to progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<PipelineUpdate> {
        self.update_tx.subscribe()
    }

    pub async fn status(&self) -> PipelineStatus {
        *self.status.read().await
    }

    /// Analyze the first `limit` articles of a fetch, strictly in order.
    ///
    /// Each successful verdict is merged into the shared state before the
    /// next call starts, so a slow batch still shows live aggregates.
    /// A failure is logged, counted and skipped; it never aborts the batch.
    #[instrument(skip(self, articles))]
    pub async fn run_batch(&self, articles: &[NewsArticle], limit: usize) -> BatchOutcome {
        let batch = &articles[..articles.len().min(limit)];
        let total = batch.len();

        if total == 0 {
            return BatchOutcome {
                attempted: 0,
                succeeded: 0,
                failed: 0,
            };
        }

        self.set_status(PipelineStatus::Running { percent: 0 }).await;

        let mut succeeded = 0;
        let mut failed = 0;

        for (index, article) in batch.iter().enumerate() {
            let percent = ((index + 1) as f64 * 100.0 / total as f64).round() as u8;

            match self
                .classify_with_deadline(&article.title, article.analysis_body())
                .await
            {
                Ok(verdict) => {
                    {
                        let mut state = self.state.write().await;
                        state.merge(&verdict);
                    }
                    succeeded += 1;
                    let _ = self.update_tx.send(PipelineUpdate::ItemAnalyzed {
                        index,
                        total,
                        percent,
                        verdict,
                    });
                }
                Err(e) => {
                    warn!("Batch analysis failed for article {}: {}", index, e);
                    failed += 1;
                    let _ = self.update_tx.send(PipelineUpdate::ItemFailed {
                        index,
                        total,
                        percent,
                        error: e.to_string(),
                    });
                }
            }

            self.set_status(PipelineStatus::Running { percent }).await;
        }

        self.set_status(PipelineStatus::Done).await;

        let outcome = BatchOutcome {
            attempted: total,
            succeeded,
            failed,
        };
        info!(
            "Batch complete: {} analyzed, {} failed of {}",
            succeeded, failed, total
        );
        let _ = self
            .update_tx
            .send(PipelineUpdate::BatchCompleted { outcome });

        outcome
    }

    /// Analyze one headline/body pair and merge the verdict.
    ///
    /// Used for user-triggered single-article or custom-text analysis;
    /// failures surface directly to the caller.
    #[instrument(skip(self, body))]
    pub async fn run_single(
        &self,
        headline: &str,
        body: &str,
    ) -> Result<SentimentVerdict, AnalysisError> {
        let verdict = self.classify_with_deadline(headline, body).await?;

        {
            let mut state = self.state.write().await;
            state.merge(&verdict);
        }

        Ok(verdict)
    }

    async fn classify_with_deadline(
        &self,
        headline: &str,
        body: &str,
    ) -> Result<SentimentVerdict, AnalysisError> {
        match timeout(self.classify_deadline, self.classifier.classify(headline, body)).await {
            Ok(result) => result,
            Err(_) => Err(AnalysisError::Timeout(self.classify_deadline)),
        }
    }

    async fn set_status(&self, status: PipelineStatus) {
        {
            let mut current = self.status.write().await;
            *current = status;
        }
        let _ = self
            .update_tx
            .send(PipelineUpdate::StatusChanged { status });
    }
}
