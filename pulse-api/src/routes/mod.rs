//! API route definitions

mod analysis;
mod dashboard;
mod health;
mod news;

use crate::AppState;
use axum::Router;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(news::routes())
        .merge(analysis::routes())
        .merge(dashboard::routes())
        .merge(health::routes())
}
