//! Aggregated dashboard state endpoint

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use pulse_services::{AggregateSnapshot, PipelineStatus};

use crate::AppState;

/// Everything the dashboard renders in one response
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub status: PipelineStatus,
    #[serde(flatten)]
    pub aggregates: AggregateSnapshot,
}

/// Create dashboard routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

/// GET /api/dashboard - History, sector heatmap, opportunity radar and
/// mood index, plus where the batch pipeline currently is
async fn get_dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.pipeline.status().await;
    let aggregates = state.pipeline.state().read().await.snapshot();

    Json(DashboardResponse { status, aggregates })
}
