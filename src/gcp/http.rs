//! HTTP utilities for GCP REST API calls

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for GCP API calls
#[derive(Clone)]
pub struct GcpHttpClient {
    client: Client,
}

impl GcpHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("gcp-inventory/{}", crate::VERSION))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// GET a GCP API with a bearer token. Non-2xx responses are errors.
    pub async fn get(&self, url: &str, token: &str, query: &[(&str, &str)]) -> Result<Value> {
        tracing::debug!("GET {}", url);

        let request = self.client.get(url).bearer_auth(token).query(query);
        let (status, body) = send(request).await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(anyhow::anyhow!("API request failed: {}", status));
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }

    /// GET without an Authorization header and parse the body whatever the status.
    /// Callers pass credentials in `query` and inspect the body for an `error` object.
    pub async fn get_any_status(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        // Security: the query may carry an access token, so only the path is logged
        tracing::debug!("GET {} (query credential)", url);

        let (status, body) = send(self.client.get(url).query(query)).await?;

        if !status.is_success() {
            tracing::debug!("API returned {} - {}", status, sanitize_for_log(&body));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse response JSON (HTTP {})", status))
    }
}

async fn send(request: RequestBuilder) -> Result<(StatusCode, String)> {
    // Security: the URL may carry an access token, so it is stripped from transport errors
    let response = request
        .send()
        .await
        .map_err(|e| e.without_url())
        .context("Failed to send request")?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| e.without_url())
        .context("Failed to read response body")?;

    Ok((status, body))
}

/// Format a GCP API error for display
/// Security: Sanitizes error messages to avoid leaking sensitive API details
pub fn format_gcp_error(error: &anyhow::Error) -> String {
    let error_str = format!("{:#}", error);

    if error_str.contains("403") {
        return "Permission denied. Check your GCP IAM permissions or enable the API for this project.".to_string();
    }
    if error_str.contains("401") {
        return "Authentication failed. Run 'gcloud auth login'.".to_string();
    }
    if error_str.contains("404") {
        return "Resource not found.".to_string();
    }
    if error_str.contains("429") {
        return "Rate limit exceeded. Please try again later.".to_string();
    }
    if error_str.contains("400") {
        return "Invalid request. Check your parameters.".to_string();
    }
    if error_str.contains("500") || error_str.contains("503") {
        return "GCP service temporarily unavailable. Please try again.".to_string();
    }

    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(120)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
