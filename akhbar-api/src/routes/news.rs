//! News endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use akhbar_services::{AggregateOptions, CategoryFilter};

use crate::AppState;

/// Largest result cap a caller may ask for
const MAX_LIMIT: usize = 100;

/// Query parameters for the aggregated feed
#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    /// Search terms, used by the search endpoint only
    pub q: Option<String>,
    /// Category name, or "all"
    pub category: Option<String>,
    /// Maximum number of results
    pub limit: Option<usize>,
    /// Freshness window in days
    pub days: Option<i64>,
}

impl NewsQuery {
    fn options(&self) -> Result<AggregateOptions, String> {
        let category = match self.category.as_deref() {
            Some(raw) => raw.parse::<CategoryFilter>().map_err(|e| e.to_string())?,
            None => CategoryFilter::All,
        };
        let mut options = AggregateOptions {
            category,
            ..AggregateOptions::default()
        };
        if let Some(limit) = self.limit {
            options.limit = limit.clamp(1, MAX_LIMIT);
        }
        if let Some(days) = self.days {
            if days <= 0 {
                return Err(format!("days must be positive, got {}", days));
            }
            options.freshness_days = days;
        }
        Ok(options)
    }
}

/// Create news routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/news", get(get_news))
        .route("/news/categories", get(get_news_by_category))
        .route("/news/search", get(search_news))
}

/// GET /api/news - Aggregated, deduplicated feed, newest first.
/// An exhausted result still answers 200 with an empty list and its status.
async fn get_news(
    State(state): State<AppState>,
    Query(params): Query<NewsQuery>,
) -> impl IntoResponse {
    let options = match params.options() {
        Ok(options) => options,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response();
        }
    };

    let result = state.aggregator.aggregate(options).await;
    if result.is_exhausted() {
        warn!("Aggregation exhausted for {:?}", options.category);
    } else {
        info!("Serving {} items for {:?}", result.items.len(), options.category);
    }

    (StatusCode::OK, Json(result)).into_response()
}

/// GET /api/news/categories - Every category in one response
async fn get_news_by_category(
    State(state): State<AppState>,
    Query(params): Query<NewsQuery>,
) -> impl IntoResponse {
    let options = match params.options() {
        Ok(options) => AggregateOptions {
            category: CategoryFilter::All,
            ..options
        },
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response();
        }
    };

    let view = state.aggregator.aggregate_categories(options).await;
    (StatusCode::OK, Json(view)).into_response()
}

/// GET /api/news/search?q= - Free-text search through the JSON news API
async fn search_news(
    State(state): State<AppState>,
    Query(params): Query<NewsQuery>,
) -> impl IntoResponse {
    let query = match params.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => q.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "Query parameter 'q' is required" })),
            )
                .into_response();
        }
    };
    let options = match params.options() {
        Ok(options) => options,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response();
        }
    };

    match state.aggregator.search(&query, options).await {
        Some(result) => (StatusCode::OK, Json(result)).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": "News search is not configured (NEWS_API_KEY missing)" })),
        )
            .into_response(),
    }
}
