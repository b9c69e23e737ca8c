//! GCP API interaction module
//!
//! This module provides the plumbing for talking to Google Cloud Platform
//! REST APIs: authentication, the HTTP client, and project enumeration.
//!
//! # Module Structure
//!
//! - [`auth`] - Token sources (gcloud CLI, ADC, static) and the token cache
//! - [`client`] - Main GCP client and per-API URL builders
//! - [`http`] - HTTP utilities for REST API calls
//! - [`projects`] - Project listing
//!
//! # Example
//!
//! ```ignore
//! use gcp_inventory::gcp::{auth::GcloudCli, client::GcpClient};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = GcpClient::new(Arc::new(GcloudCli::new("gcloud")), Endpoints::default())?;
//!     let zones = client.get(&client.compute_url("my-project", "zones"), &[]).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod projects;
