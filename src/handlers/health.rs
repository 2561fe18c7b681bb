use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::error;

use crate::AppState;

/// Liveness probe. Always succeeds while the process is up.
#[utoipa::path(
    get,
    path = "/health",
    summary = "Liveness check",
    responses((status = 200, description = "Service is running"))
)]
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness probe: pings the database.
#[utoipa::path(
    get,
    path = "/health/ready",
    summary = "Readiness check",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Database is unreachable")
    )
)]
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ready", "database": "up" })),
        ),
        Err(e) => {
            error!(error = %e, "readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "down" })),
            )
        }
    }
}
