//! Compute Engine section: instances and disks per zone, addresses per region

use super::Printer;
use crate::config::UsersFormat;
use crate::gcp::client::GcpClient;
use crate::resource::{decode, extract_short_name, fetch_all, list_regions, list_zones};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::io::Write;

/// Printed when an instance has no external address
pub const NO_EXTERNAL_IP: &str = "none";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Instance {
    zone: String,
    name: String,
    status: String,
    machine_type: String,
    network_interfaces: Vec<NetworkInterface>,
}

#[derive(Debug, Deserialize)]
struct NetworkInterface {
    #[serde(rename = "networkIP")]
    network_ip: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Disk {
    zone: String,
    name: String,
    status: String,
    size_gb: String,
    #[serde(default)]
    users: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Address {
    region: String,
    name: String,
    status: String,
    address: String,
    network_tier: String,
    address_type: String,
    #[serde(default)]
    users: Vec<String>,
}

pub async fn report<W: Write>(
    client: &GcpClient,
    project: &str,
    users_format: UsersFormat,
    printer: &mut Printer<W>,
) -> Result<()> {
    printer.section("Compute Engine")?;

    printer.subsection("Instances")?;
    let zones = list_zones(client, project).await?;
    for zone in &zones {
        let url = client.compute_zonal_url(project, zone, "instances");
        let items = fetch_all(client, &url, "items")
            .await
            .with_context(|| format!("Failed to list instances in {}", zone))?;
        for item in &items {
            printer.row(&instance_row(item)?)?;
        }
    }

    printer.subsection("Disks")?;
    for zone in &zones {
        let url = client.compute_zonal_url(project, zone, "disks");
        let items = fetch_all(client, &url, "items")
            .await
            .with_context(|| format!("Failed to list disks in {}", zone))?;
        for item in &items {
            printer.row(&disk_row(item, users_format)?)?;
        }
    }

    printer.subsection("Addresses")?;
    for region in list_regions(client, project).await? {
        let url = client.compute_regional_url(project, &region, "addresses");
        let items = fetch_all(client, &url, "items")
            .await
            .with_context(|| format!("Failed to list addresses in {}", region))?;
        for item in &items {
            printer.row(&address_row(item, users_format)?)?;
        }
    }

    Ok(())
}

/// zone, name, status, machine type, internal IP, external IP
pub fn instance_row(item: &Value) -> Result<Vec<String>> {
    let instance: Instance = decode(item, "instance")?;
    let network_ip = instance
        .network_interfaces
        .into_iter()
        .next()
        .map(|nic| nic.network_ip)
        .with_context(|| format!("Instance '{}' has no network interface", instance.name))?;

    Ok(vec![
        extract_short_name(&instance.zone),
        instance.name,
        instance.status,
        extract_short_name(&instance.machine_type),
        network_ip,
        external_ip(item),
    ])
}

/// NAT IP of the first access config of the first interface, or [`NO_EXTERNAL_IP`]
pub fn external_ip(instance: &Value) -> String {
    instance
        .get("networkInterfaces")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("accessConfigs"))
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("natIP"))
        .and_then(|v| v.as_str())
        .unwrap_or(NO_EXTERNAL_IP)
        .to_string()
}

/// zone, name, status, size in GB, users
pub fn disk_row(item: &Value, users_format: UsersFormat) -> Result<Vec<String>> {
    let disk: Disk = decode(item, "disk")?;
    Ok(vec![
        extract_short_name(&disk.zone),
        disk.name,
        disk.status,
        disk.size_gb,
        users_summary(&disk.users, users_format),
    ])
}

/// region, name, status, address, network tier, address type, users
pub fn address_row(item: &Value, users_format: UsersFormat) -> Result<Vec<String>> {
    let address: Address = decode(item, "address")?;
    Ok(vec![
        extract_short_name(&address.region),
        address.name,
        address.status,
        address.address,
        address.network_tier,
        address.address_type,
        users_summary(&address.users, users_format),
    ])
}

/// Render the resources using a disk or address.
///
/// `Last` joins the URLs with `|` and keeps what follows the final `/`,
/// so only the last user's short name survives when there are several.
pub fn users_summary(users: &[String], format: UsersFormat) -> String {
    match format {
        UsersFormat::Last => extract_short_name(&users.join("|")),
        UsersFormat::All => users
            .iter()
            .map(|u| extract_short_name(u))
            .collect::<Vec<_>>()
            .join("|"),
    }
}
