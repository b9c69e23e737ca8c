//! GCP Authentication
//!
//! Bearer tokens come from an [`AccessTokenSource`]: the gcloud CLI,
//! Application Default Credentials, or a fixed token. [`GcpCredentials`]
//! caches whatever the source returns and asks it again once the cached
//! token is close to expiry, so long runs over many projects keep working.

use crate::config::{Config, TokenSourceKind};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::sync::RwLock;

/// Default scopes for GCP API access
pub const DEFAULT_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

/// Token expiry buffer - refresh tokens this much before they actually expire
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Default token TTL if we can't determine expiry (conservative: 30 minutes)
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Anything that can hand out a bearer token
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    /// Fetch a fresh access token
    async fn access_token(&self) -> Result<String>;

    /// Short name used in log lines
    fn name(&self) -> &'static str;
}

/// Token from `gcloud auth print-access-token`
#[derive(Debug, Clone)]
pub struct GcloudCli {
    program: String,
}

impl GcloudCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl AccessTokenSource for GcloudCli {
    async fn access_token(&self) -> Result<String> {
        tracing::debug!("Running '{} auth print-access-token'", self.program);

        let output = Command::new(&self.program)
            .args(["auth", "print-access-token"])
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| {
                format!(
                    "Failed to run '{}'. Is the Google Cloud SDK installed?",
                    self.program
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "'{} auth print-access-token' failed ({}): {}. Run 'gcloud auth login'",
                self.program,
                output.status,
                stderr.trim()
            );
        }

        let token = String::from_utf8(output.stdout)
            .context("gcloud printed a token that is not valid UTF-8")?
            .trim()
            .to_string();

        if token.is_empty() {
            bail!("'{} auth print-access-token' printed no token", self.program);
        }

        Ok(token)
    }

    fn name(&self) -> &'static str {
        "gcloud"
    }
}

/// Token from Application Default Credentials
pub struct ApplicationDefault {
    provider: Arc<dyn gcp_auth::TokenProvider>,
}

impl ApplicationDefault {
    pub async fn new() -> Result<Self> {
        let provider = gcp_auth::provider().await.context(
            "Failed to initialize GCP authentication. Run 'gcloud auth application-default login'",
        )?;

        Ok(Self { provider })
    }
}

#[async_trait]
impl AccessTokenSource for ApplicationDefault {
    async fn access_token(&self) -> Result<String> {
        let token = self
            .provider
            .token(DEFAULT_SCOPES)
            .await
            .context("Failed to get access token")?;

        Ok(token.as_str().to_string())
    }

    fn name(&self) -> &'static str {
        "application-default"
    }
}

/// A fixed token, e.g. one exported in `GCP_INVENTORY_ACCESS_TOKEN`
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl AccessTokenSource for StaticToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Pick the token source described by the configuration.
/// An access token in the environment wins over everything else.
pub async fn token_source(config: &Config) -> Result<Arc<dyn AccessTokenSource>> {
    if let Some(token) = Config::access_token_from_env() {
        return Ok(Arc::new(StaticToken::new(token)));
    }

    Ok(match config.token_source {
        TokenSourceKind::Gcloud => Arc::new(GcloudCli::new(config.gcloud_path.clone())),
        TokenSourceKind::ApplicationDefault => Arc::new(ApplicationDefault::new().await?),
    })
}

/// GCP credentials holder with token caching
#[derive(Clone)]
pub struct GcpCredentials {
    source: Arc<dyn AccessTokenSource>,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
    ttl: Duration,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

impl GcpCredentials {
    pub fn new(source: Arc<dyn AccessTokenSource>) -> Self {
        Self::with_ttl(source, DEFAULT_TOKEN_TTL)
    }

    /// Credentials whose cached token is trusted for `ttl` (minus the expiry buffer)
    pub fn with_ttl(source: Arc<dyn AccessTokenSource>, ttl: Duration) -> Self {
        Self {
            source,
            token_cache: Arc::new(RwLock::new(None)),
            ttl,
        }
    }

    /// Get an access token for API calls
    /// Security: Checks token expiry before returning cached token
    pub async fn get_token(&self) -> Result<String> {
        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached token expired, fetching new token");
            }
        }

        let token = self
            .source
            .access_token()
            .await
            .with_context(|| format!("Failed to get access token from {}", self.source.name()))?;

        let lifetime = self.ttl.saturating_sub(TOKEN_EXPIRY_BUFFER);
        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: token.clone(),
                expires_at: Instant::now() + lifetime,
            });
        }

        tracing::debug!(
            "New {} token cached, expires in ~{} minutes",
            self.source.name(),
            lifetime.as_secs() / 60
        );

        Ok(token)
    }
}
