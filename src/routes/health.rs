use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::json;

use crate::server::AppState;

/// Health check endpoint handler.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/ping`
/// - **Response**: `{"status":"pong"}`
///
/// Used by load balancers and container probes; touches nothing but the
/// process itself.
pub async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "status": "pong" }))
}

/// Database-aware health check (`GET /health`).
///
/// Returns 200 with pool statistics when the database answers, 503 otherwise.
pub async fn health(State(app_state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let Some(db) = app_state.db.as_ref() else {
        return (StatusCode::OK, Json(json!({ "status": "ok", "database": "not configured" })));
    };

    match db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "up", "pool": db.stats() })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {:#}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "down" })),
            )
        }
    }
}
