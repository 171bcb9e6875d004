//! Arabic News Aggregator API Server
//!
//! HTTP API server exposing the aggregated feed, the per-category view and
//! a feed relay for the presentation layer.

mod routes;

use akhbar_news::HttpRelay;
use akhbar_services::{AggregatorConfig, NewsAggregator};
use axum::{
    http::{header, Method},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<NewsAggregator<HttpRelay>>,
    /// Relay used by the feed proxy endpoint
    pub relay: Arc<HttpRelay>,
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
                .unwrap_or_else(|_| EnvFilter::new("info,akhbar_api=debug,akhbar_services=debug")),
        )
        .init();

    info!("Starting Arabic News Aggregator API");

    let config = AggregatorConfig::from_env()?;
    if config.news_api_key.is_some() {
        info!(
            "NewsAPI key found, querying countries: {}",
            config.news_api_countries.join(",")
        );
    } else {
        info!("No NewsAPI key found - aggregating RSS feeds only");
    }

    let relay = Arc::new(HttpRelay::new());
    let aggregator = Arc::new(NewsAggregator::with_defaults(Arc::clone(&relay), config));

    let state = AppState { aggregator, relay };

    // Configure CORS for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    // Build router
    let app = Router::new()
        .nest("/api", routes::api_routes())
        .layer(cors)
        .with_state(state);

    // Start server
    let port = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
