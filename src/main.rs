use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gcp_inventory::config::{Config, ErrorPolicies};
use gcp_inventory::gcp::{auth, client::GcpClient};
use gcp_inventory::report::{self, Printer, ProjectSelection, ReportSettings};
use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Inventory of GCP resources across every accessible project
#[derive(Parser, Debug)]
#[command(name = "gcp-inventory", version = gcp_inventory::VERSION, about, long_about = None)]
struct Args {
    /// Report on this project only instead of every visible project
    #[arg(short, long)]
    project: Option<String>,

    /// Config file (default: <config dir>/gcp-inventory/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log and skip failing sections instead of stopping the run
    #[arg(long)]
    continue_on_error: bool,

    /// Log level for debugging (logs go to a file, never stdout)
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gcp-inventory {} started with log level: {:?}", gcp_inventory::VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("gcp-inventory").join("gcp-inventory.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".gcp-inventory").join("gcp-inventory.log");
    }
    PathBuf::from("gcp-inventory.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;
    let run_id = uuid::Uuid::new_v4();
    tracing::info!("Run {}", run_id);

    let config = Config::load(args.config.as_deref())?;

    let mut settings = ReportSettings::from(&config);
    if args.continue_on_error {
        settings.error_policy = ErrorPolicies::continue_all();
    }

    let source = auth::token_source(&config).await?;
    let client = GcpClient::new(source, config.endpoints.clone())?;

    // Fail before printing anything if no token can be had
    client
        .get_token()
        .await
        .context("Could not obtain an access token")?;

    let selection = match args.project {
        Some(project) => ProjectSelection::Only(project),
        None => ProjectSelection::All,
    };

    let stdout = io::stdout();
    let mut printer = Printer::new(stdout.lock());

    let summary = report::run(&client, &settings, &selection, &mut printer).await?;

    tracing::info!(
        "Run {} finished: {} project(s), {} section(s) skipped",
        run_id,
        summary.projects,
        summary.skipped_sections
    );

    Ok(())
}
