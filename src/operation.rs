//! Operation gate.
//!
//! Requests name their operation as a string; the gate maps it onto the
//! closed set of supported operations and rejects everything else, so adding
//! an operation later means extending the enum rather than loosening checks.

use crate::orchestrator::DevboxState;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Operations the gate accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Shutdown,
}

impl Operation {
    /// Wire name of the operation
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Shutdown => "shutdown",
        }
    }

    /// Desired state the operation drives the devbox to
    pub fn target_state(&self) -> DevboxState {
        match self {
            Operation::Shutdown => DevboxState::Stopped,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation gate errors
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("operation is required")]
    MissingOperation,
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let error_code = match self {
            GateError::MissingOperation => "missing_operation",
            GateError::UnsupportedOperation(_) => "unsupported_operation",
        };

        let body = Json(json!({
            "error": error_code,
            "message": self.to_string(),
        }));

        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

/// Check a requested operation against the supported set
pub fn authorize(op: &str) -> Result<Operation, GateError> {
    match op {
        "" => Err(GateError::MissingOperation),
        "shutdown" => Ok(Operation::Shutdown),
        other => Err(GateError::UnsupportedOperation(other.to_string())),
    }
}
