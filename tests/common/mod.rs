//! Shared helpers for the wiremock-backed tests

#![allow(dead_code)]

use gcp_inventory::config::Endpoints;
use gcp_inventory::gcp::auth::StaticToken;
use gcp_inventory::gcp::client::GcpClient;
use gcp_inventory::report::{self, Printer, ProjectSelection, ReportSettings, ReportSummary};
use serde_json::Value;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-token";

/// A client whose every API points at the mock server
pub fn client_for(server: &MockServer) -> GcpClient {
    GcpClient::new(
        Arc::new(StaticToken::new(TOKEN)),
        Endpoints::all_at(&server.uri()),
    )
    .expect("client should build")
}

/// Answer GETs on `route` with `status` and a JSON body
pub async fn mount(server: &MockServer, route: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Run the report and return stdout as a string alongside the result
pub async fn run_report(
    client: &GcpClient,
    settings: &ReportSettings,
    selection: &ProjectSelection,
) -> (String, anyhow::Result<ReportSummary>) {
    let mut printer = Printer::new(Vec::new());
    let result = report::run(client, settings, selection, &mut printer).await;
    let output = String::from_utf8(printer.into_inner()).expect("report is UTF-8");
    (output, result)
}
