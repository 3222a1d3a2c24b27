//! Integration test helpers
//!
//! Spins up a real server on a random port, backed by the in-memory resource
//! store so tests can seed devboxes and inspect what the store ends up with.

use devbox_gate::auth::TokenAuthenticator;
use devbox_gate::orchestrator::memory::MemoryResourceClient;
use devbox_gate::orchestrator::transitioner::RetryConfig;
use devbox_gate::{create_app, AppState, ServiceConfig};
use std::sync::{Arc, LazyLock};
use tokio::net::TcpListener;

#[allow(dead_code)]
pub const TEST_SECRET: &str = "integration-test-secret";

// Initialize tracing once for the whole test binary
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

/// A running test instance
#[allow(dead_code)]
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub store: MemoryResourceClient,
    pub authenticator: TokenAuthenticator,
}

#[allow(dead_code)]
impl TestApp {
    /// Mint a token the running app will accept
    pub fn token_for(&self, devbox_name: &str, namespace: &str) -> String {
        self.authenticator
            .issue(devbox_name, namespace, chrono::Duration::minutes(5))
            .expect("failed to issue token")
    }

    pub async fn post_operation<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .post(format!("{}/api/operation", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_token<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .post(format!("{}/api/token", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_health(&self) -> reqwest::Response {
        self.api_client
            .get(format!("{}/api/health", self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// Spawn the app in dev mode (the common case for tests)
#[allow(dead_code)]
pub async fn spawn_app() -> TestApp {
    spawn_app_with_dev_mode(true).await
}

/// Spawn the app with explicit dev-mode setting
#[allow(dead_code)]
pub async fn spawn_app_with_dev_mode(dev_mode: bool) -> TestApp {
    LazyLock::force(&TRACING);

    let config = ServiceConfig {
        jwt_secret: TEST_SECRET.to_string(),
        dev_mode,
        // keep retries fast; semantics are what the tests care about
        retry: RetryConfig {
            max_attempts: 5,
            initial_delay_ms: 1,
            backoff_multiplier: 2.0,
        },
        ..ServiceConfig::default()
    };

    let store = MemoryResourceClient::new();
    let state = AppState::with_client(config, Arc::new(store.clone()));
    let app = create_app(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind random port");
    let port = listener.local_addr().expect("no local addr").port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server crashed");
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        api_client: reqwest::Client::new(),
        store,
        authenticator: TokenAuthenticator::new(TEST_SECRET.as_bytes()),
    }
}
