//! Route definitions for the gate service

use crate::{handlers, openapi, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // The one authenticated operation
        .route("/operation", post(handlers::execute_operation))
        // Dev-mode token minting
        .route("/token", post(handlers::mint_token))
        // API documentation
        .route("/openapi.json", get(openapi::serve_openapi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AppState, ServiceConfig};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn dev_state() -> AppState {
        let config = ServiceConfig {
            dev_mode: true,
            ..ServiceConfig::default()
        };
        AppState::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_health_check_route() {
        let app = api_routes().with_state(dev_state());

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_openapi_route() {
        let app = api_routes().with_state(dev_state());

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/openapi.json")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
