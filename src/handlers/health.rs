//! Health check handler

use super::types::HealthResponse;
use crate::AppState;
use axum::{extract::State, response::Json};

/// Health check endpoint
///
/// Reports which resource backend the gate is wired to, so a dev-mode
/// instance running against the in-memory store is recognizable at a glance.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    summary = "Health check",
    description = "Check the gate's health and which resource backend it is wired to",
    responses(
        (status = 200, description = "Server is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend = if state.config.orchestrator_url.is_some() {
        "orchestrator"
    } else {
        "memory"
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dev_mode: state.config.dev_mode,
        backend: backend.to_string(),
    })
}
