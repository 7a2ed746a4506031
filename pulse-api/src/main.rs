//! FinPulse API Server
//!
//! HTTP server behind the financial intelligence dashboard: serves the RSS
//! headline feed, runs sentiment analysis through the LLM classifier, and
//! exposes the aggregated dashboard state.

mod routes;

use axum::{
    http::{header, Method},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use pulse_analysis::OpenAiClassifier;
use pulse_news::FinanceNewsClient;
use pulse_services::AnalysisPipeline;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub news_client: Arc<FinanceNewsClient>,
    pub pipeline: Arc<AnalysisPipeline<OpenAiClassifier>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pulse_api=debug")),
        )
        .init();

    info!("Starting FinPulse API");

    // Initialize the news client (no API key required for the RSS feed)
    let news_client = match std::env::var("FINPULSE_FEED_URL") {
        Ok(url) => FinanceNewsClient::with_feed_url(url),
        Err(_) => FinanceNewsClient::new(),
    };
    let news_client = Arc::new(news_client);

    // Initialize the classifier (reads OPENAI_API_KEY from the environment)
    let mut classifier = OpenAiClassifier::new()?;
    if let Ok(model) = std::env::var("FINPULSE_MODEL") {
        info!("Using model override: {}", model);
        classifier = classifier.with_model(&model);
    }

    let pipeline = Arc::new(AnalysisPipeline::new(classifier));

    // Forward pipeline progress into the server log
    let mut update_rx = pipeline.subscribe();
    tokio::spawn(async move {
        while let Ok(update) = update_rx.recv().await {
            if let Ok(json_value) = serde_json::to_value(&update) {
                debug!("pipeline update: {}", json_value);
            }
        }
    });

    // Create app state
    let state = AppState {
        news_client,
        pipeline,
    };

    // Configure CORS for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Build router
    let app = Router::new()
        .nest("/api", routes::api_routes())
        .layer(cors)
        .with_state(state);

    // Start server
    let port = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
