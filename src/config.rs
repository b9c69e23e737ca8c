//! Configuration Management
//!
//! Settings are read from `<config dir>/gcp-inventory/config.json` or from
//! the file given with `--config`. Every key is optional.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable holding a ready-made access token
pub const ACCESS_TOKEN_ENV: &str = "GCP_INVENTORY_ACCESS_TOKEN";

/// Where bearer tokens come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSourceKind {
    /// `gcloud auth print-access-token`
    #[default]
    Gcloud,
    /// Application Default Credentials
    ApplicationDefault,
}

/// How the `users` list of disks and addresses is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsersFormat {
    /// Only the last user's short name survives
    #[default]
    Last,
    /// Short names of every user, joined with `|`
    All,
}

/// What happens when a report section fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Stop the whole run
    Abort,
    /// Log the error, end the section and move on
    Continue,
}

/// Error policy per report section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorPolicies {
    pub compute: ErrorPolicy,
    pub sql: ErrorPolicy,
    pub cache: ErrorPolicy,
    pub api_keys: ErrorPolicy,
}

impl Default for ErrorPolicies {
    fn default() -> Self {
        Self {
            compute: ErrorPolicy::Abort,
            sql: ErrorPolicy::Abort,
            cache: ErrorPolicy::Continue,
            api_keys: ErrorPolicy::Abort,
        }
    }
}

impl ErrorPolicies {
    /// Every section continues on error
    pub fn continue_all() -> Self {
        Self {
            compute: ErrorPolicy::Continue,
            sql: ErrorPolicy::Continue,
            cache: ErrorPolicy::Continue,
            api_keys: ErrorPolicy::Continue,
        }
    }
}

/// Base URLs of the REST APIs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub resource_manager: String,
    pub compute: String,
    pub sql_admin: String,
    pub redis: String,
    pub api_keys: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            resource_manager: "https://cloudresourcemanager.googleapis.com".to_string(),
            compute: "https://compute.googleapis.com".to_string(),
            sql_admin: "https://sqladmin.googleapis.com".to_string(),
            redis: "https://redis.googleapis.com".to_string(),
            api_keys: "https://apikeys.googleapis.com".to_string(),
        }
    }
}

impl Endpoints {
    /// Every endpoint pointing at the same base URL
    pub fn all_at(base: &str) -> Self {
        Self {
            resource_manager: base.to_string(),
            compute: base.to_string(),
            sql_admin: base.to_string(),
            redis: base.to_string(),
            api_keys: base.to_string(),
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("resource_manager", &self.resource_manager),
            ("compute", &self.compute),
            ("sql_admin", &self.sql_admin),
            ("redis", &self.redis),
            ("api_keys", &self.api_keys),
        ] {
            Url::parse(value).with_context(|| format!("Invalid endpoint '{}': {}", name, value))?;
        }
        Ok(())
    }
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub token_source: TokenSourceKind,
    /// gcloud binary used by the `gcloud` token source
    pub gcloud_path: String,
    pub users_format: UsersFormat,
    pub error_policy: ErrorPolicies,
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_source: TokenSourceKind::default(),
            gcloud_path: "gcloud".to_string(),
            users_format: UsersFormat::default(),
            error_policy: ErrorPolicies::default(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gcp-inventory").join("config.json"))
    }

    /// Load configuration. An explicit path must exist and parse; the
    /// default location falls back to defaults when missing or broken.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::load_from(path)?,
            None => Self::load_default(),
        };
        config.endpoints.validate()?;
        Ok(config)
    }

    fn load_default() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config file {:?}: {:#}", path, e);
                Self::default()
            }
        }
    }

    /// Read and parse a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Access token supplied through the environment, if any
    pub fn access_token_from_env() -> Option<String> {
        std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_keep_cache_lenient() {
        let config = Config::default();
        assert_eq!(config.error_policy.compute, ErrorPolicy::Abort);
        assert_eq!(config.error_policy.sql, ErrorPolicy::Abort);
        assert_eq!(config.error_policy.cache, ErrorPolicy::Continue);
        assert_eq!(config.error_policy.api_keys, ErrorPolicy::Abort);
        assert_eq!(config.users_format, UsersFormat::Last);
        assert_eq!(config.token_source, TokenSourceKind::Gcloud);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"users_format": "all", "error_policy": {{"sql": "continue"}}}}"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.users_format, UsersFormat::All);
        assert_eq!(config.error_policy.sql, ErrorPolicy::Continue);
        assert_eq!(config.error_policy.compute, ErrorPolicy::Abort);
        assert_eq!(config.gcloud_path, "gcloud");
        assert_eq!(config.endpoints, Endpoints::default());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.json")));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"endpoints": {{"compute": "not a url"}}}}"#).unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("compute"));
    }

    #[test]
    fn test_token_source_names() {
        let config: Config =
            serde_json::from_str(r#"{"token_source": "application_default"}"#).unwrap();
        assert_eq!(config.token_source, TokenSourceKind::ApplicationDefault);
    }
}
