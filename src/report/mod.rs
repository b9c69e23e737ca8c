//! Inventory report
//!
//! For every project the four sections run in a fixed order: Compute
//! Engine, Cloud SQL, Memorystore, API keys. Lines are printed as soon as
//! each listing returns. A failing section either ends the run or is
//! logged and skipped, depending on its [`ErrorPolicy`].
//!
//! - [`compute`] - instances, disks and addresses per zone/region
//! - [`sql`] - Cloud SQL instances
//! - [`cache`] - Memorystore for Redis instances
//! - [`api_keys`] - API keys via the REST endpoint
//! - [`printer`] - banner and row formatting

pub mod api_keys;
pub mod cache;
pub mod compute;
pub mod printer;
pub mod sql;

pub use printer::Printer;

use crate::config::{Config, ErrorPolicies, ErrorPolicy, UsersFormat};
use crate::gcp::client::{format_gcp_error, GcpClient};
use crate::gcp::projects;
use anyhow::Result;
use std::fmt;
use std::io::Write;

/// One report section of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Compute,
    Sql,
    Cache,
    ApiKeys,
}

impl Section {
    pub fn policy(self, policies: &ErrorPolicies) -> ErrorPolicy {
        match self {
            Section::Compute => policies.compute,
            Section::Sql => policies.sql,
            Section::Cache => policies.cache,
            Section::ApiKeys => policies.api_keys,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Compute => "compute",
            Section::Sql => "sql",
            Section::Cache => "cache",
            Section::ApiKeys => "api-keys",
        };
        f.write_str(name)
    }
}

/// Which projects to report on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProjectSelection {
    /// Everything the credential can see
    #[default]
    All,
    /// A single project; enumeration is skipped
    Only(String),
}

/// Knobs that shape the report
#[derive(Debug, Clone, Default)]
pub struct ReportSettings {
    pub users_format: UsersFormat,
    pub error_policy: ErrorPolicies,
}

impl From<&Config> for ReportSettings {
    fn from(config: &Config) -> Self {
        Self {
            users_format: config.users_format,
            error_policy: config.error_policy,
        }
    }
}

/// What a finished run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub projects: usize,
    /// Sections that failed under the `continue` policy
    pub skipped_sections: usize,
}

/// Print the full report for the selected projects, ending with the END banner
pub async fn run<W: Write>(
    client: &GcpClient,
    settings: &ReportSettings,
    selection: &ProjectSelection,
    printer: &mut Printer<W>,
) -> Result<ReportSummary> {
    let project_ids = match selection {
        ProjectSelection::All => projects::list_project_ids(client).await?,
        ProjectSelection::Only(id) => vec![id.clone()],
    };
    tracing::info!("Reporting on {} project(s)", project_ids.len());

    let mut summary = ReportSummary::default();

    for project in &project_ids {
        printer.project(project)?;
        report_project(client, settings, project, printer, &mut summary).await?;
        summary.projects += 1;
    }

    printer.end()?;
    Ok(summary)
}

async fn report_project<W: Write>(
    client: &GcpClient,
    settings: &ReportSettings,
    project: &str,
    printer: &mut Printer<W>,
    summary: &mut ReportSummary,
) -> Result<()> {
    tracing::debug!("Project {}", project);

    let result = compute::report(client, project, settings.users_format, printer).await;
    settle(Section::Compute, project, settings, result, summary)?;

    let result = sql::report(client, project, printer).await;
    settle(Section::Sql, project, settings, result, summary)?;

    let result = cache::report(client, project, printer).await;
    settle(Section::Cache, project, settings, result, summary)?;

    let result = api_keys::report(client, project, printer).await;
    settle(Section::ApiKeys, project, settings, result, summary)?;

    Ok(())
}

/// Apply the section's error policy to its outcome
fn settle(
    section: Section,
    project: &str,
    settings: &ReportSettings,
    result: Result<()>,
    summary: &mut ReportSummary,
) -> Result<()> {
    let Err(err) = result else {
        return Ok(());
    };

    match section.policy(&settings.error_policy) {
        ErrorPolicy::Abort => {
            Err(err.context(format!("{} report failed for project {}", section, project)))
        }
        ErrorPolicy::Continue => {
            tracing::warn!(
                "Skipping rest of {} report for {}: {} ({:#})",
                section,
                project,
                format_gcp_error(&err),
                err
            );
            summary.skipped_sections += 1;
            Ok(())
        }
    }
}
