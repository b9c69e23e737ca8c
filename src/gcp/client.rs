//! GCP Client
//!
//! Main client for interacting with GCP APIs, combining authentication
//! and HTTP functionality. One client is built per run and handed to
//! every reporter.

use super::auth::{AccessTokenSource, GcpCredentials};
use super::http::GcpHttpClient;
use crate::config::Endpoints;
use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;

/// Main GCP client
#[derive(Clone)]
pub struct GcpClient {
    pub credentials: GcpCredentials,
    pub http: GcpHttpClient,
    endpoints: Endpoints,
}

impl GcpClient {
    /// Create a new GCP client
    pub fn new(source: Arc<dyn AccessTokenSource>, endpoints: Endpoints) -> Result<Self> {
        Ok(Self::from_parts(
            GcpCredentials::new(source),
            GcpHttpClient::new()?,
            endpoints,
        ))
    }

    pub fn from_parts(credentials: GcpCredentials, http: GcpHttpClient, endpoints: Endpoints) -> Self {
        Self {
            credentials,
            http,
            endpoints,
        }
    }

    /// Get the current access token
    pub async fn get_token(&self) -> Result<String> {
        self.credentials.get_token().await
    }

    /// Make a GET request to a GCP API
    pub async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        let token = self.get_token().await?;
        self.http.get(url, &token, query).await
    }

    /// GET with the token passed as the `access_token` query parameter.
    /// The body is returned whatever the status code.
    pub async fn get_with_query_token(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        let token = self.get_token().await?;
        let mut params = Vec::with_capacity(query.len() + 1);
        params.push(("access_token", token.as_str()));
        params.extend_from_slice(query);
        self.http.get_any_status(url, &params).await
    }

    // =========================================================================
    // Resource Manager API helpers
    // =========================================================================

    /// Build Resource Manager API URL
    pub fn resourcemanager_url(&self, path: &str) -> String {
        format!("{}/v1/{}", base(&self.endpoints.resource_manager), path)
    }

    // =========================================================================
    // Compute Engine API helpers
    // =========================================================================

    /// Build Compute Engine API URL
    pub fn compute_url(&self, project: &str, path: &str) -> String {
        format!(
            "{}/compute/v1/projects/{}/{}",
            base(&self.endpoints.compute),
            urlencoding::encode(project),
            path
        )
    }

    /// Build zonal Compute Engine API URL
    pub fn compute_zonal_url(&self, project: &str, zone: &str, resource: &str) -> String {
        self.compute_url(
            project,
            &format!("zones/{}/{}", urlencoding::encode(zone), resource),
        )
    }

    /// Build regional Compute Engine API URL
    pub fn compute_regional_url(&self, project: &str, region: &str, resource: &str) -> String {
        self.compute_url(
            project,
            &format!("regions/{}/{}", urlencoding::encode(region), resource),
        )
    }

    // =========================================================================
    // Cloud SQL Admin API helpers
    // =========================================================================

    pub fn sql_url(&self, project: &str, path: &str) -> String {
        format!(
            "{}/sql/v1beta4/projects/{}/{}",
            base(&self.endpoints.sql_admin),
            urlencoding::encode(project),
            path
        )
    }

    // =========================================================================
    // Memorystore (Redis) API helpers
    // =========================================================================

    /// Instances of every location use the `-` wildcard
    pub fn redis_instances_url(&self, project: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/-/instances",
            base(&self.endpoints.redis),
            urlencoding::encode(project)
        )
    }

    // =========================================================================
    // API Keys helpers
    // =========================================================================

    pub fn api_keys_url(&self, project: &str) -> String {
        format!(
            "{}/v1/projects/{}/apiKeys",
            base(&self.endpoints.api_keys),
            urlencoding::encode(project)
        )
    }
}

fn base(endpoint: &str) -> &str {
    endpoint.trim_end_matches('/')
}

/// Format a GCP API error for display
pub fn format_gcp_error(error: &anyhow::Error) -> String {
    super::http::format_gcp_error(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcp::auth::StaticToken;

    fn client() -> GcpClient {
        let endpoints = Endpoints {
            compute: "http://localhost:9000/".to_string(),
            ..Endpoints::default()
        };
        GcpClient::new(Arc::new(StaticToken::new("t")), endpoints).unwrap()
    }

    #[test]
    fn test_compute_urls() {
        let client = client();
        assert_eq!(
            client.compute_zonal_url("my-project", "us-central1-a", "instances"),
            "http://localhost:9000/compute/v1/projects/my-project/zones/us-central1-a/instances"
        );
        assert_eq!(
            client.compute_regional_url("my-project", "us-east1", "addresses"),
            "http://localhost:9000/compute/v1/projects/my-project/regions/us-east1/addresses"
        );
        assert_eq!(
            client.compute_url("my-project", "zones"),
            "http://localhost:9000/compute/v1/projects/my-project/zones"
        );
    }

    #[test]
    fn test_default_endpoints() {
        let client = client();
        assert_eq!(
            client.resourcemanager_url("projects"),
            "https://cloudresourcemanager.googleapis.com/v1/projects"
        );
        assert_eq!(
            client.sql_url("p1", "instances"),
            "https://sqladmin.googleapis.com/sql/v1beta4/projects/p1/instances"
        );
        assert_eq!(
            client.redis_instances_url("p1"),
            "https://redis.googleapis.com/v1/projects/p1/locations/-/instances"
        );
        assert_eq!(
            client.api_keys_url("p1"),
            "https://apikeys.googleapis.com/v1/projects/p1/apiKeys"
        );
    }
}
