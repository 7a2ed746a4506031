//! News feed endpoint

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::error;

use crate::AppState;

/// Headlines returned per fetch unless the caller narrows it
const DEFAULT_NEWS_LIMIT: usize = 30;

/// Query parameters for listing news
#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    /// Maximum number of articles
    pub limit: Option<usize>,
}

/// Create news routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/news", get(get_news))
}

/// GET /api/news - Latest financial headlines from the RSS feed
async fn get_news(
    State(state): State<AppState>,
    Query(params): Query<NewsQuery>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(DEFAULT_NEWS_LIMIT);

    match state.news_client.fetch_latest(limit).await {
        Ok(articles) => (
            StatusCode::OK,
            Json(serde_json::json!({ "articles": articles })),
        )
            .into_response(),
        Err(e) => {
            error!("Error fetching RSS news: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Failed to fetch news from RSS feed"
                })),
            )
                .into_response()
        }
    }
}
