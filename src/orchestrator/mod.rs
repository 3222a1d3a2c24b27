//! Orchestrator resource access.
//!
//! The orchestrator owns the authoritative devbox records; this module holds
//! the client seam ([`ResourceClient`]), the typed view over the versioned
//! document ([`DevboxResource`]), and the conflict-tolerant transitioner.

pub mod http;
pub mod memory;
pub mod transitioner;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Desired lifecycle state of a devbox workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DevboxState {
    Running,
    Stopped,
}

impl std::fmt::Display for DevboxState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DevboxState::Running => write!(f, "Running"),
            DevboxState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Errors surfaced by a [`ResourceClient`]
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("resource not found")]
    NotFound,

    #[error("version conflict")]
    Conflict,

    #[error("orchestrator unreachable: {0}")]
    Unreachable(String),

    #[error("orchestrator API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected document shape: {0}")]
    Shape(String),
}

/// A devbox document fetched from the orchestrator.
///
/// Holds the raw versioned document together with its captured version token.
/// Only `spec.state` is ever mutated through this type; every other field
/// rounds back to the store untouched.
#[derive(Debug, Clone)]
pub struct DevboxResource {
    raw: serde_json::Value,
    version: String,
}

impl DevboxResource {
    /// Wrap a fetched document, capturing its version token.
    pub fn from_document(raw: serde_json::Value) -> Result<Self, ClientError> {
        let version = raw
            .pointer("/metadata/resourceVersion")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                ClientError::Shape("metadata.resourceVersion missing or not a string".to_string())
            })?
            .to_string();
        Ok(Self { raw, version })
    }

    /// Version token captured at fetch time, used for conditional writes.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The full document, as the store will receive it on write-back.
    pub fn document(&self) -> &serde_json::Value {
        &self.raw
    }

    /// Current desired state as recorded in `spec.state`.
    pub fn state(&self) -> Result<DevboxState, ClientError> {
        let value = self
            .raw
            .pointer("/spec/state")
            .ok_or_else(|| ClientError::Shape("spec.state missing".to_string()))?;
        serde_json::from_value(value.clone())
            .map_err(|e| ClientError::Shape(format!("spec.state: {}", e)))
    }

    /// Overwrite `spec.state`, leaving the rest of the document intact.
    pub fn set_state(&mut self, state: DevboxState) -> Result<(), ClientError> {
        let spec = self
            .raw
            .get_mut("spec")
            .and_then(|s| s.as_object_mut())
            .ok_or_else(|| ClientError::Shape("spec missing or not an object".to_string()))?;
        spec.insert("state".to_string(), serde_json::json!(state));
        Ok(())
    }
}

/// Get/conditional-update access to devbox documents.
///
/// Updates are conditional on the document's captured version token; a write
/// carrying a superseded token fails with [`ClientError::Conflict`].
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Fetch the current document for `(namespace, name)`.
    async fn get(&self, namespace: &str, name: &str) -> Result<DevboxResource, ClientError>;

    /// Submit `resource` as a conditional update keyed on its version token.
    async fn update(
        &self,
        namespace: &str,
        name: &str,
        resource: &DevboxResource,
    ) -> Result<(), ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> serde_json::Value {
        json!({
            "apiVersion": "devbox.example.com/v1",
            "kind": "Devbox",
            "metadata": {"name": "devbox01", "namespace": "default", "resourceVersion": "7"},
            "spec": {"state": "Running", "cpu": "2"},
        })
    }

    #[test]
    fn captures_version_token() {
        let resource = DevboxResource::from_document(document()).unwrap();
        assert_eq!(resource.version(), "7");
    }

    #[test]
    fn reads_and_writes_state() {
        let mut resource = DevboxResource::from_document(document()).unwrap();
        assert_eq!(resource.state().unwrap(), DevboxState::Running);

        resource.set_state(DevboxState::Stopped).unwrap();
        assert_eq!(resource.state().unwrap(), DevboxState::Stopped);
    }

    #[test]
    fn set_state_leaves_other_fields_alone() {
        let mut resource = DevboxResource::from_document(document()).unwrap();
        resource.set_state(DevboxState::Stopped).unwrap();

        let doc = resource.document();
        assert_eq!(doc["spec"]["cpu"], "2");
        assert_eq!(doc["metadata"]["name"], "devbox01");
        assert_eq!(doc["metadata"]["resourceVersion"], "7");
    }

    #[test]
    fn missing_version_token_is_a_shape_error() {
        let result = DevboxResource::from_document(json!({"spec": {"state": "Running"}}));
        assert!(matches!(result, Err(ClientError::Shape(_))));
    }

    #[test]
    fn missing_state_is_a_shape_error_not_a_panic() {
        let doc = json!({
            "metadata": {"resourceVersion": "1"},
            "spec": {"cpu": "2"},
        });
        let resource = DevboxResource::from_document(doc).unwrap();
        assert!(matches!(resource.state(), Err(ClientError::Shape(_))));
    }

    #[test]
    fn unknown_state_value_is_a_shape_error() {
        let doc = json!({
            "metadata": {"resourceVersion": "1"},
            "spec": {"state": "Hibernating"},
        });
        let resource = DevboxResource::from_document(doc).unwrap();
        assert!(matches!(resource.state(), Err(ClientError::Shape(_))));
    }
}
