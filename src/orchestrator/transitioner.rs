//! Conflict-tolerant devbox state transitions.
//!
//! Each attempt is a full read-modify-write pass: fetch the document, set
//! `spec.state`, submit a conditional update keyed on the fetched version
//! token. A write that loses a version race is never resubmitted as-is; the
//! next attempt re-fetches so the update always carries a token the store has
//! actually served.

use super::{ClientError, DevboxState, ResourceClient};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry policy for the conditional-update loop
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of read-modify-write attempts
    pub max_attempts: usize,
    /// Delay before the second attempt, in milliseconds
    pub initial_delay_ms: u64,
    /// Backoff multiplier applied to the delay after each attempt
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        // 1s, 2s, 4s, 8s between five attempts
        Self {
            max_attempts: 5,
            initial_delay_ms: 1000,
            backoff_multiplier: 2.0,
        }
    }
}

/// Terminal failures of a transition request
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("devbox {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    #[error("orchestrator unreachable: {0}")]
    Unreachable(String),

    #[error("transition failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        attempts: usize,
        last_error: ClientError,
    },
}

impl IntoResponse for TransitionError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            TransitionError::NotFound { .. } => (StatusCode::NOT_FOUND, "devbox_not_found"),
            TransitionError::Unreachable(_) => (StatusCode::BAD_GATEWAY, "orchestrator_unreachable"),
            TransitionError::RetriesExhausted { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "retries_exhausted")
            }
        };

        let body = Json(json!({
            "error": error_code,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Drives devbox desired-state transitions against the orchestrator.
///
/// Holds no state of its own beyond the client handle and retry policy;
/// concurrent requests race at the store and the retry loop resolves the
/// losers.
pub struct ResourceTransitioner {
    client: Arc<dyn ResourceClient>,
    retry: RetryConfig,
}

impl ResourceTransitioner {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self::with_retry(client, RetryConfig::default())
    }

    pub fn with_retry(client: Arc<dyn ResourceClient>, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Drive the devbox's desired state to `target`.
    ///
    /// Idempotent at the domain level: the target state is asserted, so a
    /// devbox already in `target` commits a no-op write and succeeds. A
    /// missing devbox or unreachable orchestrator on the first fetch is
    /// terminal; every later error burns an attempt from the retry budget.
    pub async fn transition(
        &self,
        namespace: &str,
        name: &str,
        target: DevboxState,
    ) -> Result<(), TransitionError> {
        let mut delay = Duration::from_millis(self.retry.initial_delay_ms);
        let mut last_error: Option<ClientError> = None;

        for attempt in 1..=self.retry.max_attempts {
            if attempt > 1 {
                warn!(
                    namespace,
                    name,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying devbox transition"
                );
                sleep(delay).await;
                delay = Duration::from_secs_f64(delay.as_secs_f64() * self.retry.backoff_multiplier);
            }

            // Re-fetch on every pass: a version token that already lost a
            // race can never win a later one.
            let mut resource = match self.client.get(namespace, name).await {
                Ok(resource) => resource,
                Err(ClientError::NotFound) if attempt == 1 => {
                    return Err(TransitionError::NotFound {
                        namespace: namespace.to_string(),
                        name: name.to_string(),
                    });
                }
                Err(ClientError::Unreachable(reason)) if attempt == 1 => {
                    return Err(TransitionError::Unreachable(reason));
                }
                Err(err) => {
                    last_error = Some(err);
                    continue;
                }
            };

            let previous = resource.state();
            if let Err(err) = resource.set_state(target) {
                last_error = Some(err);
                continue;
            }

            match self.client.update(namespace, name, &resource).await {
                Ok(()) => {
                    debug!(
                        namespace,
                        name,
                        attempt,
                        previous = ?previous.ok(),
                        state = %target,
                        "devbox transition committed"
                    );
                    return Ok(());
                }
                Err(ClientError::Conflict) => {
                    debug!(namespace, name, attempt, "conditional update lost a version race");
                    last_error = Some(ClientError::Conflict);
                }
                Err(err) => {
                    last_error = Some(err);
                }
            }
        }

        Err(TransitionError::RetriesExhausted {
            attempts: self.retry.max_attempts,
            last_error: last_error.unwrap_or(ClientError::Conflict),
        })
    }
}
