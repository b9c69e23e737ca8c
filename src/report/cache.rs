//! Memorystore (Redis) section

use super::Printer;
use crate::gcp::client::GcpClient;
use crate::resource::{decode, fetch_all};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::io::Write;

/// Every field is optional; absent values print as empty or zero
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RedisInstance {
    location_id: String,
    display_name: String,
    state: String,
    redis_version: String,
    host: String,
    tier: String,
    memory_size_gb: i64,
}

pub async fn report<W: Write>(
    client: &GcpClient,
    project: &str,
    printer: &mut Printer<W>,
) -> Result<()> {
    printer.section("Memorystore")?;

    let url = client.redis_instances_url(project);
    let items = fetch_all(client, &url, "instances")
        .await
        .context("Failed to list Memorystore instances")?;

    for item in &items {
        printer.row(&cache_row(item)?)?;
    }

    Ok(())
}

/// location, display name, state, version, host, tier, memory size
pub fn cache_row(item: &Value) -> Result<Vec<String>> {
    let instance: RedisInstance = decode(item, "Memorystore instance")?;
    Ok(vec![
        instance.location_id,
        instance.display_name,
        instance.state,
        instance.redis_version,
        instance.host,
        instance.tier,
        instance.memory_size_gb.to_string(),
    ])
}
