//! Request and response types for the HTTP API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Whether the gate runs in development mode
    pub dev_mode: bool,
    /// Resource backend in use (`orchestrator` or `memory`)
    #[schema(example = "orchestrator")]
    pub backend: String,
}

/// Inbound devbox operation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct OperationRequest {
    /// Signed token naming the target devbox
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub jwt_token: String,
    /// Requested operation
    #[schema(example = "shutdown")]
    pub operation: String,
}

/// Devbox operation response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OperationResponse {
    #[schema(example = "Operation received: shutdown")]
    pub message: String,
}

/// Dev-mode token mint request
#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    /// Name of the devbox the token is scoped to
    #[schema(example = "devbox01")]
    pub devbox_name: String,
    /// Namespace of the devbox
    #[schema(example = "default")]
    pub namespace: String,
    /// Token lifetime in seconds
    #[serde(default = "default_ttl_secs")]
    #[schema(example = 300)]
    pub ttl_secs: i64,
}

fn default_ttl_secs() -> i64 {
    300
}

/// Dev-mode token mint response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}
