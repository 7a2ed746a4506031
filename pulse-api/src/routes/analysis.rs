//! Sentiment analysis endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use pulse_services::DEFAULT_BATCH_LIMIT;

use crate::AppState;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Body for single-article or custom-text analysis
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub headline: String,
    #[serde(default)]
    pub body: String,
}

/// Query parameters for triggering a batch run
#[derive(Debug, Default, Deserialize)]
pub struct BatchQuery {
    /// Cap on articles analyzed; defaults to [`DEFAULT_BATCH_LIMIT`]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct BatchAccepted {
    /// Articles the batch will attempt
    attempted: usize,
}

/// Create analysis routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analysis", post(analyze_single))
        .route("/analysis/batch", post(run_batch))
}

/// POST /api/analysis - Analyze one headline/body pair
///
/// Failures surface directly to the caller; there is no batch to continue.
async fn analyze_single(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    let body = if req.body.trim().is_empty() {
        req.headline.clone()
    } else {
        req.body.clone()
    };

    match state.pipeline.run_single(&req.headline, &body).await {
        Ok(verdict) => (StatusCode::OK, Json(verdict)).into_response(),
        Err(e) => {
            error!("Analysis failed for '{}': {}", req.headline, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Analysis failed: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// POST /api/analysis/batch - Fetch the latest headlines and run the batch
/// pipeline over them in the background
async fn run_batch(
    State(state): State<AppState>,
    Query(params): Query<BatchQuery>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(DEFAULT_BATCH_LIMIT);

    let articles = match state.news_client.fetch_latest(limit.max(DEFAULT_BATCH_LIMIT)).await {
        Ok(articles) => articles,
        Err(e) => {
            error!("Failed to fetch news for batch analysis: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch news from RSS feed".to_string(),
                }),
            )
                .into_response();
        }
    };

    let attempted = articles.len().min(limit);
    info!("Starting batch analysis over {} articles", attempted);

    // Run in the background; progress is observable via the dashboard
    let pipeline = state.pipeline.clone();
    tokio::spawn(async move {
        pipeline.run_batch(&articles, limit).await;
    });

    (StatusCode::ACCEPTED, Json(BatchAccepted { attempted })).into_response()
}
