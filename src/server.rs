//! Gate server
//!
//! Main server implementation using Axum.

use crate::{create_app, AppState, ServiceConfig, ServiceError, ServiceResult};
use axum::serve;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Main gate server
pub struct GateServer {
    config: ServiceConfig,
    state: AppState,
}

impl GateServer {
    /// Create a new gate server
    pub fn new(config: ServiceConfig) -> ServiceResult<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Create a server around pre-built state (used by tests)
    pub fn with_state(state: AppState) -> Self {
        Self {
            config: state.config.clone(),
            state,
        }
    }

    /// Start the server
    pub async fn start(self) -> ServiceResult<()> {
        let address = self.config.address();

        info!("Starting devbox gate");
        info!("Server address: http://{}", address);
        info!("Development mode: {}", self.config.dev_mode);

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address)
            .await
            .map_err(ServiceError::Server)?;

        info!("Listening on http://{}", address);

        if let Err(e) = serve(listener, app).await {
            error!("Server error: {}", e);
            return Err(ServiceError::Server(e));
        }

        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Builder for GateServer
pub struct GateServerBuilder {
    config: ServiceConfig,
}

impl GateServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self {
            config: ServiceConfig::from_env(),
        }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Enable development mode
    pub fn dev_mode(mut self, dev_mode: bool) -> Self {
        self.config.dev_mode = dev_mode;
        self
    }

    /// Set the orchestrator API base URL
    pub fn orchestrator_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.orchestrator_url = Some(url.into());
        self
    }

    /// Build the server
    pub fn build(self) -> ServiceResult<GateServer> {
        GateServer::new(self.config)
    }
}

impl Default for GateServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
