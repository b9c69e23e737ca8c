//! Zone and region enumeration for a project

use super::fetcher::fetch_all;
use crate::gcp::client::GcpClient;
use anyhow::{Context, Result};
use serde_json::Value;

/// All zone names of a project, sorted ascending
pub async fn list_zones(client: &GcpClient, project: &str) -> Result<Vec<String>> {
    let url = client.compute_url(project, "zones");
    let items = fetch_all(client, &url, "items")
        .await
        .with_context(|| format!("Failed to list zones of {}", project))?;
    sorted_names(&items, "zone")
}

/// All region names of a project, sorted ascending
pub async fn list_regions(client: &GcpClient, project: &str) -> Result<Vec<String>> {
    let url = client.compute_url(project, "regions");
    let items = fetch_all(client, &url, "items")
        .await
        .with_context(|| format!("Failed to list regions of {}", project))?;
    sorted_names(&items, "region")
}

/// Collect the `name` of every item and sort them so listing order is
/// stable across runs whatever order the pages arrived in.
pub fn sorted_names(items: &[Value], kind: &str) -> Result<Vec<String>> {
    let mut names = items
        .iter()
        .map(|item| {
            item.get("name")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .with_context(|| format!("{} entry without a name", kind))
        })
        .collect::<Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}
