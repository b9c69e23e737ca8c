//! Cloud SQL section

use super::Printer;
use crate::gcp::client::GcpClient;
use crate::resource::{decode, fetch_all};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::io::Write;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SqlInstance {
    region: String,
    gce_zone: String,
    name: String,
    state: String,
    database_version: String,
    settings: Settings,
    #[serde(default)]
    ip_addresses: Vec<IpMapping>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Settings {
    tier: String,
    availability_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpMapping {
    ip_address: String,
}

pub async fn report<W: Write>(
    client: &GcpClient,
    project: &str,
    printer: &mut Printer<W>,
) -> Result<()> {
    printer.section("SQL Engine")?;

    let url = client.sql_url(project, "instances");
    let items = fetch_all(client, &url, "items")
        .await
        .context("Failed to list SQL instances")?;

    for item in &items {
        printer.row(&sql_row(item)?)?;
    }

    Ok(())
}

/// region, zone, name, state, version, tier, availability, first IP, second IP.
/// Instances are expected to carry at least two addresses; fewer is an error.
pub fn sql_row(item: &Value) -> Result<Vec<String>> {
    let instance: SqlInstance = decode(item, "SQL instance")?;

    if instance.ip_addresses.len() < 2 {
        bail!(
            "SQL instance '{}' has {} IP address(es), expected at least 2",
            instance.name,
            instance.ip_addresses.len()
        );
    }

    Ok(vec![
        instance.region,
        instance.gce_zone,
        instance.name,
        instance.state,
        instance.database_version,
        instance.settings.tier,
        instance.settings.availability_type,
        instance.ip_addresses[0].ip_address.clone(),
        instance.ip_addresses[1].ip_address.clone(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sql_instance(ips: Value) -> Value {
        json!({
            "region": "us-central1",
            "gceZone": "us-central1-f",
            "name": "db-main",
            "state": "RUNNABLE",
            "databaseVersion": "POSTGRES_15",
            "settings": {"tier": "db-custom-2-7680", "availabilityType": "REGIONAL"},
            "ipAddresses": ips
        })
    }

    #[test]
    fn test_two_addresses_in_index_order() {
        let item = sql_instance(json!([
            {"type": "PRIMARY", "ipAddress": "34.10.0.1"},
            {"type": "OUTGOING", "ipAddress": "34.10.0.2"}
        ]));
        assert_eq!(
            sql_row(&item).unwrap(),
            vec![
                "us-central1",
                "us-central1-f",
                "db-main",
                "RUNNABLE",
                "POSTGRES_15",
                "db-custom-2-7680",
                "REGIONAL",
                "34.10.0.1",
                "34.10.0.2"
            ]
        );
    }

    #[test]
    fn test_extra_addresses_are_ignored() {
        let item = sql_instance(json!([
            {"ipAddress": "a"},
            {"ipAddress": "b"},
            {"ipAddress": "c"}
        ]));
        let row = sql_row(&item).unwrap();
        assert_eq!(&row[7..], &["a", "b"]);
    }

    #[test]
    fn test_single_address_is_an_error() {
        let item = sql_instance(json!([{"ipAddress": "10.0.0.3"}]));
        let err = sql_row(&item).unwrap_err();
        assert!(err.to_string().contains("1 IP address(es)"));
    }

    #[test]
    fn test_missing_settings_is_an_error() {
        let mut item = sql_instance(json!([{"ipAddress": "a"}, {"ipAddress": "b"}]));
        item.as_object_mut().unwrap().remove("settings");
        assert!(sql_row(&item).is_err());
    }
}
