//! API keys section
//!
//! There is no typed client for API keys, so the REST endpoint is called
//! directly with the access token as a query parameter. A response that
//! carries an `error` object (typically 403 when the API is disabled or
//! not permitted) means there is nothing to report for the project.

use super::Printer;
use crate::gcp::client::GcpClient;
use crate::resource::{decode, PaginatedResult};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::io::Write;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiKey {
    key_id: String,
    display_name: String,
    current_key: String,
    create_time: String,
}

pub async fn report<W: Write>(
    client: &GcpClient,
    project: &str,
    printer: &mut Printer<W>,
) -> Result<()> {
    printer.section("API Keys")?;

    let url = client.api_keys_url(project);
    let mut page_token: Option<String> = None;

    loop {
        let query: Vec<(&str, &str)> =
            page_token.as_deref().map(|t| ("pageToken", t)).into_iter().collect();
        let body = client
            .get_with_query_token(&url, &query)
            .await
            .context("Failed to list API keys")?;

        if let Some(error) = body.get("error") {
            tracing::debug!(
                "API keys unavailable for {}: {}",
                project,
                error.get("message").and_then(|m| m.as_str()).unwrap_or("no message")
            );
            return Ok(());
        }

        let page = PaginatedResult::from_response(&body, "keys");
        for item in &page.items {
            printer.row(&api_key_row(item)?)?;
        }

        match page.next_token {
            Some(token) => page_token = Some(token),
            None => return Ok(()),
        }
    }
}

/// key id, display name, key string, creation time
pub fn api_key_row(item: &Value) -> Result<Vec<String>> {
    let key: ApiKey = decode(item, "API key")?;
    Ok(vec![key.key_id, key.display_name, key.current_key, key.create_time])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_key_row() {
        let item = json!({
            "name": "projects/123/apiKeys/abc",
            "keyId": "abc",
            "displayName": "Maps key",
            "currentKey": "AIzaSyExample",
            "createTime": "2020-05-01T10:00:00.000Z"
        });
        assert_eq!(
            api_key_row(&item).unwrap(),
            vec!["abc", "Maps key", "AIzaSyExample", "2020-05-01T10:00:00.000Z"]
        );
    }

    #[test]
    fn test_key_without_value_is_an_error() {
        let item = json!({"keyId": "abc", "displayName": "x", "createTime": "t"});
        assert!(api_key_row(&item).is_err());
    }
}
