//! Application state shared across request handlers

use crate::{
    auth::TokenAuthenticator,
    orchestrator::{
        http::HttpResourceClient, memory::MemoryResourceClient,
        transitioner::ResourceTransitioner, ResourceClient,
    },
    ServiceConfig, ServiceError, ServiceResult,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared state for the gate service.
///
/// Everything in here is immutable after startup; per-request coordination is
/// delegated to the orchestrator's conditional writes.
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: ServiceConfig,
    /// Token validator
    pub authenticator: Arc<TokenAuthenticator>,
    /// Devbox state transitioner
    pub transitioner: Arc<ResourceTransitioner>,
}

impl AppState {
    /// Build state from configuration, constructing the orchestrator client.
    pub fn new(config: ServiceConfig) -> ServiceResult<Self> {
        let client: Arc<dyn ResourceClient> = match &config.orchestrator_url {
            Some(url) => Arc::new(HttpResourceClient::new(
                url.clone(),
                config.resource_coordinates(),
                config.orchestrator_token.clone(),
            )),
            None if config.dev_mode => {
                info!("No orchestrator URL configured; using in-memory resource store");
                Arc::new(MemoryResourceClient::new())
            }
            None => {
                return Err(ServiceError::Config(
                    "DEVBOX_GATE_ORCHESTRATOR_URL is required outside dev mode".to_string(),
                ))
            }
        };

        Ok(Self::with_client(config, client))
    }

    /// Build state around an existing resource client.
    pub fn with_client(config: ServiceConfig, client: Arc<dyn ResourceClient>) -> Self {
        if config.uses_default_secret() && !config.dev_mode {
            warn!("Running with the built-in placeholder JWT secret; set DEVBOX_GATE_JWT_SECRET");
        }

        let authenticator = Arc::new(TokenAuthenticator::new(config.jwt_secret.as_bytes()));
        let transitioner = Arc::new(ResourceTransitioner::with_retry(
            client,
            config.retry.clone(),
        ));

        Self {
            config,
            authenticator,
            transitioner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_orchestrator_url_is_a_config_error() {
        let result = AppState::new(ServiceConfig::default());
        assert!(matches!(result, Err(ServiceError::Config(_))));
    }

    #[test]
    fn dev_mode_falls_back_to_memory_store() {
        let config = ServiceConfig {
            dev_mode: true,
            ..ServiceConfig::default()
        };
        assert!(AppState::new(config).is_ok());
    }
}
