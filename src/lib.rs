//! Devbox Gate
//!
//! A small authenticated service that transitions devbox workloads to a
//! stopped state through the cluster orchestrator's resource API. A caller
//! presents a signed token naming the target devbox; the gate verifies the
//! token, checks the requested operation, then performs a conflict-tolerant
//! conditional update of the devbox's desired state.

pub mod auth;
pub mod handlers;
pub mod openapi;
pub mod operation;
pub mod orchestrator;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use server::GateServer;
pub use state::AppState;

use crate::orchestrator::http::ResourceCoordinates;
use crate::orchestrator::transitioner::RetryConfig;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        Method,
    },
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    // The API is token-in-body, so CORS stays permissive and credential-free
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([ACCEPT, CONTENT_TYPE]);

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(64 * 1024)) // requests are a token plus a verb
        .with_state(state)
}

/// Configuration for the gate service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable development mode (in-memory store fallback, token mint endpoint)
    pub dev_mode: bool,
    /// Shared secret used to verify operation tokens
    pub jwt_secret: String,
    /// Base URL of the orchestrator API
    pub orchestrator_url: Option<String>,
    /// Bearer token presented to the orchestrator API
    pub orchestrator_token: Option<String>,
    /// API group of the devbox resource kind
    pub resource_group: String,
    /// API version of the devbox resource kind
    pub resource_version: String,
    /// Plural resource name of the devbox resource kind
    pub resource_plural: String,
    /// Retry policy for conditional updates
    pub retry: RetryConfig,
}

const DEFAULT_JWT_SECRET: &str = "devbox-gate-default-secret-change-in-production";

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8082,
            dev_mode: false,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            orchestrator_url: None,
            orchestrator_token: None,
            resource_group: "devbox.example.com".to_string(),
            resource_version: "v1".to_string(),
            resource_plural: "devboxes".to_string(),
            retry: RetryConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("DEVBOX_GATE_HOST").unwrap_or(defaults.host),
            port: std::env::var("DEVBOX_GATE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            dev_mode: std::env::var("DEVBOX_GATE_DEV_MODE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            jwt_secret: std::env::var("DEVBOX_GATE_JWT_SECRET").unwrap_or(defaults.jwt_secret),
            orchestrator_url: std::env::var("DEVBOX_GATE_ORCHESTRATOR_URL").ok(),
            orchestrator_token: std::env::var("DEVBOX_GATE_ORCHESTRATOR_TOKEN").ok(),
            resource_group: std::env::var("DEVBOX_GATE_RESOURCE_GROUP")
                .unwrap_or(defaults.resource_group),
            resource_version: std::env::var("DEVBOX_GATE_RESOURCE_VERSION")
                .unwrap_or(defaults.resource_version),
            resource_plural: std::env::var("DEVBOX_GATE_RESOURCE_PLURAL")
                .unwrap_or(defaults.resource_plural),
            retry: RetryConfig::default(),
        }
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Coordinates of the devbox resource kind within the orchestrator API
    pub fn resource_coordinates(&self) -> ResourceCoordinates {
        ResourceCoordinates {
            group: self.resource_group.clone(),
            version: self.resource_version.clone(),
            resource: self.resource_plural.clone(),
        }
    }

    /// Whether the service still runs with the built-in placeholder secret
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

/// Error types for the gate service
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for the gate service
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Initialize logging for the service
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devbox_gate=debug,tower_http=debug,axum=debug".into()),
        )
        .init();
}
