//! HTTP client for the orchestrator's resource API.

use super::{ClientError, DevboxResource, ResourceClient};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

/// Coordinates of a resource kind within the orchestrator API
#[derive(Debug, Clone)]
pub struct ResourceCoordinates {
    /// API group, e.g. `devbox.example.com`
    pub group: String,
    /// API version, e.g. `v1`
    pub version: String,
    /// Plural resource name, e.g. `devboxes`
    pub resource: String,
}

impl Default for ResourceCoordinates {
    fn default() -> Self {
        Self {
            group: "devbox.example.com".to_string(),
            version: "v1".to_string(),
            resource: "devboxes".to_string(),
        }
    }
}

/// Resource client backed by the orchestrator's REST API.
///
/// Documents are addressed by group/version/resource plus namespace and name;
/// updates resubmit the full document and rely on the server rejecting stale
/// version tokens with a conflict status.
pub struct HttpResourceClient {
    http: reqwest::Client,
    base_url: String,
    coordinates: ResourceCoordinates,
    bearer_token: Option<String>,
}

impl HttpResourceClient {
    /// Create a new client for the orchestrator at `base_url`
    pub fn new(
        base_url: String,
        coordinates: ResourceCoordinates,
        bearer_token: Option<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            coordinates,
            bearer_token,
        }
    }

    fn resource_url(&self, namespace: &str, name: &str) -> String {
        format!(
            "{}/apis/{}/{}/namespaces/{}/{}/{}",
            self.base_url,
            self.coordinates.group,
            self.coordinates.version,
            namespace,
            self.coordinates.resource,
            name
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound),
            StatusCode::CONFLICT => Err(ClientError::Conflict),
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(ClientError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn get(&self, namespace: &str, name: &str) -> Result<DevboxResource, ClientError> {
        let url = self.resource_url(namespace, name);
        debug!(%url, "fetching devbox document");

        let response = self
            .authorized(self.http.get(&url))
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;
        let response = Self::check(response).await?;

        let document = response
            .json()
            .await
            .map_err(|e| ClientError::Shape(e.to_string()))?;
        DevboxResource::from_document(document)
    }

    async fn update(
        &self,
        namespace: &str,
        name: &str,
        resource: &DevboxResource,
    ) -> Result<(), ClientError> {
        let url = self.resource_url(namespace, name);
        debug!(%url, version = resource.version(), "submitting conditional update");

        let response = self
            .authorized(self.http.put(&url))
            .json(resource.document())
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }
}
