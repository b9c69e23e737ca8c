//! Resource abstraction layer
//!
//! Every reporter lists resources the same way: build a list URL, follow
//! `nextPageToken` until the last page, then turn each JSON item into a
//! typed record. This module holds that shared machinery.
//!
//! # Architecture
//!
//! - [`fetcher`] - Paginated listing and typed decoding of items
//! - [`locations`] - Sorted zone and region names for a project
//!
//! # Example
//!
//! ```ignore
//! use gcp_inventory::resource::fetch_all;
//!
//! async fn list_vms(client: &GcpClient) -> anyhow::Result<Vec<serde_json::Value>> {
//!     let url = client.compute_zonal_url("my-project", "us-central1-a", "instances");
//!     fetch_all(client, &url, "items").await
//! }
//! ```

mod fetcher;
mod locations;

pub use fetcher::{decode, extract_short_name, fetch_all, fetch_page, PaginatedResult};
pub use locations::{list_regions, list_zones, sorted_names};
