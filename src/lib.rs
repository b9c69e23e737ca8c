//! gcp-inventory
//!
//! Lists Compute Engine instances, disks and addresses, Cloud SQL
//! instances, Memorystore instances and API keys across every project a
//! credential can see, printing one comma-separated line per resource.

pub mod config;
pub mod gcp;
pub mod report;
pub mod resource;

/// Version injected at compile time via GCP_INVENTORY_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("GCP_INVENTORY_VERSION") {
    Some(v) => v,
    None => "dev",
};
