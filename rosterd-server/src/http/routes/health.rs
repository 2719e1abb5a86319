//! Health check endpoint

use std::time::Duration;

use axum::http::StatusCode;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tokio::time::timeout;

use crate::db;
use crate::state::AppState;

/// Deadline for the health-check ping.
const PING_DEADLINE: Duration = Duration::from_secs(5);

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /health - 200 when the database answers a ping within the
/// deadline, 503 otherwise.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let outcome = match timeout(PING_DEADLINE, db::ping(state.pool())).await {
        Ok(Ok(())) => {
            return (
                StatusCode::OK,
                Json(HealthResponse {
                    status: "ok",
                    database: "connected",
                    message: None,
                }),
            )
        }
        Ok(Err(e)) => format!("database ping failed: {}", e),
        Err(_) => format!(
            "database ping timed out after {} seconds",
            PING_DEADLINE.as_secs()
        ),
    };

    tracing::warn!("health check failed: {}", outcome);
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(HealthResponse {
            status: "error",
            database: "disconnected",
            message: Some(outcome),
        }),
    )
}

/// Health routes
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
