//! In-memory resource store.
//!
//! Backs dev mode and tests. Conditional-write semantics match the real
//! orchestrator: a monotonically increasing version token per record, and a
//! conflict whenever an update carries a token the store has superseded.

use super::{ClientError, DevboxResource, DevboxState, ResourceClient};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

struct StoredDocument {
    document: serde_json::Value,
    version: u64,
}

/// Resource client over a process-local store
#[derive(Clone, Default)]
pub struct MemoryResourceClient {
    store: Arc<Mutex<HashMap<(String, String), StoredDocument>>>,
}

impl MemoryResourceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a devbox record; its first version token is `"1"`.
    pub async fn insert(&self, namespace: &str, name: &str, state: DevboxState) {
        let document = json!({
            "apiVersion": "devbox.example.com/v1",
            "kind": "Devbox",
            "metadata": {"name": name, "namespace": namespace},
            "spec": {"state": state},
        });
        let mut store = self.store.lock().await;
        store.insert(
            (namespace.to_string(), name.to_string()),
            StoredDocument {
                document,
                version: 1,
            },
        );
    }

    /// Current stored state of a devbox, if it exists and parses.
    pub async fn stored_state(&self, namespace: &str, name: &str) -> Option<DevboxState> {
        let store = self.store.lock().await;
        let stored = store.get(&(namespace.to_string(), name.to_string()))?;
        serde_json::from_value(stored.document.pointer("/spec/state")?.clone()).ok()
    }

    /// Bump a record's version without changing its content, as a concurrent
    /// writer would. Any update still carrying the old token will conflict.
    pub async fn touch(&self, namespace: &str, name: &str) {
        let mut store = self.store.lock().await;
        if let Some(stored) = store.get_mut(&(namespace.to_string(), name.to_string())) {
            stored.version += 1;
        }
    }
}

#[async_trait]
impl ResourceClient for MemoryResourceClient {
    async fn get(&self, namespace: &str, name: &str) -> Result<DevboxResource, ClientError> {
        let store = self.store.lock().await;
        let stored = store
            .get(&(namespace.to_string(), name.to_string()))
            .ok_or(ClientError::NotFound)?;

        let mut document = stored.document.clone();
        let metadata = document
            .get_mut("metadata")
            .and_then(|m| m.as_object_mut())
            .ok_or_else(|| ClientError::Shape("metadata missing".to_string()))?;
        metadata.insert(
            "resourceVersion".to_string(),
            json!(stored.version.to_string()),
        );
        DevboxResource::from_document(document)
    }

    async fn update(
        &self,
        namespace: &str,
        name: &str,
        resource: &DevboxResource,
    ) -> Result<(), ClientError> {
        let mut store = self.store.lock().await;
        let stored = store
            .get_mut(&(namespace.to_string(), name.to_string()))
            .ok_or(ClientError::NotFound)?;

        if resource.version() != stored.version.to_string() {
            return Err(ClientError::Conflict);
        }

        stored.document = resource.document().clone();
        stored.version += 1;
        Ok(())
    }
}
