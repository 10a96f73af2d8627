use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{db, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub version: &'static str,
}

/// Liveness banner at the root path
pub async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "dentalflow-api",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

/// Readiness: verifies database connectivity
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse),
    ),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database = db::ping(&state.db).await;
    let (status, body) = if database {
        (
            StatusCode::OK,
            HealthResponse {
                status: "ok",
                database,
                version: env!("CARGO_PKG_VERSION"),
            },
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthResponse {
                status: "degraded",
                database,
                version: env!("CARGO_PKG_VERSION"),
            },
        )
    };
    (status, Json(body))
}
