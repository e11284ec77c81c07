use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::config::config;

/// GET / - Service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Task Tracker API",
            "version": version,
            "endpoints": {
                "health": "/health (public)",
                "tasks": "/api/tasks[/:id] (requires Authorization: Bearer <token>)",
            }
        }
    }))
}

/// GET /health - Liveness plus a storage ping
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let environment = &config().environment;
    let uptime = state.started_at.elapsed().as_secs();

    match state.accessor.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "environment": environment,
                    "uptime": uptime,
                    "storage": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "storage unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "environment": environment,
                        "uptime": uptime,
                        "storage": "unavailable"
                    }
                })),
            )
        }
    }
}
