//! Health check endpoints

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;

use akhbar_services::{AggregationReport, AggregationStatus};

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    /// Report of the most recent aggregation, if any ran yet
    last_aggregation: Option<AggregationReport>,
}

/// Health check handler
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let report = state.aggregator.last_report();

    let status = match report.as_ref().map(|r| r.status()) {
        None => "starting",
        Some(AggregationStatus::Complete) => "healthy",
        Some(AggregationStatus::Degraded) => "degraded",
        Some(AggregationStatus::Exhausted) => "exhausted",
    };

    let code = if status == "exhausted" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    let response = HealthResponse {
        status: status.to_string(),
        last_aggregation: report,
    };

    (code, Json(response))
}

/// Simple liveness check (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
}
