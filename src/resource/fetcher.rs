//! Resource Fetcher
//!
//! Generic paginated listing shared by every reporter. GCP list calls
//! return one page of items under a response key plus an optional
//! `nextPageToken`; the next page is requested with `pageToken`.

use crate::gcp::client::GcpClient;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Result of paginated fetch
#[derive(Debug, Default)]
pub struct PaginatedResult {
    pub items: Vec<Value>,
    pub next_token: Option<String>,
}

impl PaginatedResult {
    /// Split a raw list response into its items and continuation token.
    /// A response without `items_key` is an empty page, not an error.
    pub fn from_response(response: &Value, items_key: &str) -> Self {
        let items = response
            .get(items_key)
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        let next_token = response
            .get("nextPageToken")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        Self { items, next_token }
    }
}

/// Fetch all resources (auto-paginate)
pub async fn fetch_all(client: &GcpClient, url: &str, items_key: &str) -> Result<Vec<Value>> {
    let mut all_items = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let result = fetch_page(client, url, items_key, page_token.as_deref()).await?;
        all_items.extend(result.items);

        if result.next_token.is_none() {
            break;
        }
        page_token = result.next_token;
    }

    tracing::debug!("{} {} item(s) from {}", all_items.len(), items_key, url);

    Ok(all_items)
}

/// Fetch one page of resources
pub async fn fetch_page(
    client: &GcpClient,
    url: &str,
    items_key: &str,
    page_token: Option<&str>,
) -> Result<PaginatedResult> {
    let query: Vec<(&str, &str)> = page_token.map(|t| ("pageToken", t)).into_iter().collect();

    let response = client.get(url, &query).await?;

    Ok(PaginatedResult::from_response(&response, items_key))
}

/// Deserialize one listed item into its typed shape.
/// Missing required fields surface as an error naming the resource kind.
pub fn decode<T: DeserializeOwned>(item: &Value, kind: &str) -> Result<T> {
    T::deserialize(item).with_context(|| {
        let name = item.get("name").and_then(|v| v.as_str()).unwrap_or("<unnamed>");
        format!("Malformed {} record '{}'", kind, name)
    })
}

/// Extract short name from GCP resource URL
/// e.g., "https://www.googleapis.com/compute/v1/projects/my-project/zones/us-central1-a" -> "us-central1-a"
pub fn extract_short_name(url: &str) -> String {
    url.rsplit('/').next().unwrap_or(url).to_string()
}
