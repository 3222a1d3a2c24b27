//! The authenticated devbox operation endpoint.
//!
//! Composes the request path linearly: token validation, operation gate,
//! state transition. Each stage's error carries its own HTTP mapping.

use super::types::{OperationRequest, OperationResponse};
use crate::{
    auth::AuthError,
    operation::{self, GateError},
    orchestrator::transitioner::TransitionError,
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{info, warn};

/// Failures the operation endpoint can answer with
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error("invalid request body: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl IntoResponse for OperationError {
    fn into_response(self) -> Response {
        match self {
            OperationError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "bad_request", "message": message})),
            )
                .into_response(),
            OperationError::Auth(err) => err.into_response(),
            OperationError::Gate(err) => err.into_response(),
            OperationError::Transition(err) => err.into_response(),
        }
    }
}

/// Execute an operation against the devbox named by the token
#[utoipa::path(
    post,
    path = "/api/operation",
    tag = "Operations",
    summary = "Execute a devbox operation",
    description = "Validate the supplied token and transition the devbox it names. \
                   Only the `shutdown` operation is supported.",
    request_body = OperationRequest,
    responses(
        (status = 200, description = "Operation applied", body = OperationResponse),
        (status = 400, description = "Malformed request or unsupported operation"),
        (status = 401, description = "Token rejected"),
        (status = 404, description = "Devbox not found"),
        (status = 500, description = "Transition failed after retry budget"),
        (status = 502, description = "Orchestrator unreachable"),
    )
)]
pub async fn execute_operation(
    State(state): State<AppState>,
    request: Result<Json<OperationRequest>, JsonRejection>,
) -> Result<Json<OperationResponse>, OperationError> {
    let Json(request) =
        request.map_err(|rejection| OperationError::BadRequest(rejection.body_text()))?;

    let claims = state
        .authenticator
        .validate(&request.jwt_token)
        .map_err(|err| {
            warn!(error = %err, "rejected operation token");
            err
        })?;

    let operation = operation::authorize(&request.operation)?;

    info!(
        devbox = %claims.devbox_name,
        namespace = %claims.namespace,
        operation = %operation,
        issuer = claims.iss.as_deref().unwrap_or("-"),
        "executing devbox operation"
    );

    state
        .transitioner
        .transition(
            &claims.namespace,
            &claims.devbox_name,
            operation.target_state(),
        )
        .await?;

    Ok(Json(OperationResponse {
        message: format!("Operation received: {}", operation),
    }))
}
