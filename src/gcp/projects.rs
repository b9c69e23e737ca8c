//! GCP Projects
//!
//! Enumerates every project visible to the credential.

use super::client::GcpClient;
use crate::resource::{decode, fetch_all};
use anyhow::{Context, Result};
use serde::Deserialize;

/// Project information
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_id: String,
}

/// List all accessible GCP projects, following every page
pub async fn list_projects(client: &GcpClient) -> Result<Vec<Project>> {
    let url = client.resourcemanager_url("projects");
    let items = fetch_all(client, &url, "projects")
        .await
        .context("Failed to list projects")?;

    items.iter().map(|item| decode(item, "project")).collect()
}

/// Get project IDs as a simple list
pub async fn list_project_ids(client: &GcpClient) -> Result<Vec<String>> {
    let projects = list_projects(client).await?;
    Ok(projects.into_iter().map(|p| p.project_id).collect())
}
