//! OpenAPI specification for the gate service

use crate::handlers::{
    HealthResponse, OperationRequest, OperationResponse, TokenRequest, TokenResponse,
};
use axum::Json;
use utoipa::OpenApi;

/// Main OpenAPI specification for the devbox gate
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Devbox Gate API",
        version = "0.1.0",
        description = "Authenticated shutdown gate for devbox workloads",
        license(name = "MIT OR Apache-2.0")
    ),
    paths(
        crate::handlers::health_check,
        crate::handlers::execute_operation,
        crate::handlers::mint_token,
    ),
    components(schemas(
        HealthResponse,
        OperationRequest,
        OperationResponse,
        TokenRequest,
        TokenResponse,
    )),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Operations", description = "Authenticated devbox operations"),
        (name = "Tokens", description = "Dev-mode token minting"),
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_includes_the_operation_path() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/operation"));
        assert!(doc.paths.paths.contains_key("/api/health"));
    }
}
