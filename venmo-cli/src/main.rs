use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use venmo_core::{
    CORRECTED_HEADER, CsvSink, Cutoff, ExportDriver, LEGACY_HEADER, TimestampParser,
};
use venmo_feed::FeedClient;

mod config;

/// Logs go to stderr as JSON when this is set.
const LOG_JSON_ENV: &str = "VENMO_EXPORT_LOG_JSON";

#[derive(Parser)]
#[command(
    name = "venmo-export",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VENMO_EXPORT_BUILD_SHA"), ")"),
    about = "Export account transactions to CSV on stdout, newest first, down to a cutoff date"
)]
struct Cli {
    /// Account external ID
    external_id: String,

    /// Stop at the first transaction older than this date (YYYY-MM-DD)
    end_date: String,

    /// Session cookie string copied from a logged-in browser
    cookie: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    init_logging();

    let zone = cfg.zone()?;
    let cutoff = Cutoff::parse(&cli.end_date, zone)?;
    debug!(
        build = env!("VENMO_EXPORT_BUILD_SHA"),
        %zone,
        cutoff = %cutoff.instant(),
        "Starting export"
    );

    let header = if cfg.export.corrected_header {
        CORRECTED_HEADER
    } else {
        LEGACY_HEADER
    };
    let stdout = std::io::stdout().lock();
    let mut sink = CsvSink::new(stdout, header)?;

    let mut client = FeedClient::new(&cfg.feed_config(), &cli.external_id, &cli.cookie)
        .context("set up feed client")?;

    let driver = ExportDriver::new(TimestampParser::new(zone), cutoff);
    let summary = driver.run(&mut client, &mut sink).await?;
    sink.into_inner()?;

    info!(
        pages = summary.pages,
        rows = summary.rows,
        skipped = summary.skipped,
        stop = ?summary.stop,
        "Export finished"
    );
    Ok(())
}

/// Diagnostics always go to stderr; stdout carries only CSV.
fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("venmo_core=info,venmo_feed=info,venmo_export=info"));

    if std::env::var(LOG_JSON_ENV).is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}
