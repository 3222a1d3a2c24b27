//! Dev-mode token minting.
//!
//! Real deployments receive tokens from an external issuer; this endpoint
//! only exists so a dev-mode instance is usable end to end. Outside dev mode
//! it is indistinguishable from an unknown route.

use super::types::{TokenRequest, TokenResponse};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Duration;
use tracing::info;

/// Mint a devbox operation token (dev mode only)
#[utoipa::path(
    post,
    path = "/api/token",
    tag = "Tokens",
    summary = "Mint a devbox token (dev mode)",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token minted", body = TokenResponse),
        (status = 400, description = "Malformed request"),
        (status = 404, description = "Not available outside dev mode"),
    )
)]
pub async fn mint_token(
    State(state): State<AppState>,
    request: Result<Json<TokenRequest>, JsonRejection>,
) -> Response {
    if !state.config.dev_mode {
        return StatusCode::NOT_FOUND.into_response();
    }

    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            return (StatusCode::BAD_REQUEST, rejection.body_text()).into_response();
        }
    };

    info!(
        devbox = %request.devbox_name,
        namespace = %request.namespace,
        ttl_secs = request.ttl_secs,
        "minting dev token"
    );

    match state.authenticator.issue(
        &request.devbox_name,
        &request.namespace,
        Duration::seconds(request.ttl_secs),
    ) {
        Ok(token) => Json(TokenResponse { token }).into_response(),
        Err(err) => err.into_response(),
    }
}
