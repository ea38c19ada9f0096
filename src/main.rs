//! Archive Harvester main entry point
//!
//! This is the command-line interface for the resumable archive harvester.

use anyhow::Context;
use archive_harvester::config::{load_config_or_default, validate, Config};
use archive_harvester::crawler::{run_crawl, watch_interrupts, StopSignal};
use archive_harvester::output::{export_csv, load_statistics, print_report, print_statistics};
use archive_harvester::storage::open_storage;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Archive Harvester: a resumable crawler for paginated document archives
///
/// Walks numbered search-result pages, extracts every listed document and
/// stores it in SQLite. Pages already completed are skipped, so an
/// interrupted run picks up where it left off.
#[derive(Parser, Debug)]
#[command(name = "archive-harvester")]
#[command(version)]
#[command(about = "Resumable harvester for paginated document archives", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used without one)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SQLite database path (overrides the config file)
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// First results page to crawl (0-based)
    #[arg(long, value_name = "N")]
    start_page: Option<u32>,

    /// Last results page to crawl (inclusive)
    #[arg(long, value_name = "N")]
    end_page: Option<u32>,

    /// CSV export path (overrides the config file)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "export")]
    stats: bool,

    /// Export the database to CSV and exit
    #[arg(long, conflicts_with = "stats")]
    export: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    // Handle different modes
    if cli.stats {
        handle_stats(&config)
    } else if cli.export {
        handle_export(&config)
    } else {
        handle_crawl(&config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("archive_harvester=info,warn"),
            1 => EnvFilter::new("archive_harvester=debug,info"),
            2 => EnvFilter::new("archive_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let mut config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(db) = &cli.db {
        config.output.database_path = db.display().to_string();
    }
    if let Some(output) = &cli.output {
        config.output.export_path = output.display().to_string();
    }
    if let Some(start) = cli.start_page {
        config.crawler.start_page = start;
    }
    if let Some(end) = cli.end_page {
        config.crawler.end_page = end;
    }

    validate(&config).context("Invalid command-line overrides")?;
    Ok(config)
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))
        .with_context(|| format!("Failed to open database {}", config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export mode: writes the document table to CSV
fn handle_export(config: &Config) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.output.database_path))
        .with_context(|| format!("Failed to open database {}", config.output.database_path))?;

    let rows = export_csv(&storage, Path::new(&config.output.export_path))
        .with_context(|| format!("Failed to export to {}", config.output.export_path))?;

    if rows == 0 {
        println!("No documents in {}; nothing exported", config.output.database_path);
    } else {
        println!("✓ Exported {} documents to: {}", rows, config.output.export_path);
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Harvesting {} pages {}..={} into {}",
        config.archive.base_url,
        config.crawler.start_page,
        config.crawler.end_page,
        config.output.database_path
    );

    let stop = StopSignal::new();
    let ctrl_c_stop = stop.clone();
    tokio::spawn(async move {
        if watch_interrupts(&ctrl_c_stop, tokio::signal::ctrl_c).await {
            tracing::error!("Interrupted again, exiting without waiting for the current item");
            std::process::exit(130);
        }
    });

    let report = run_crawl(config, &stop).await.context("Crawl failed")?;
    print_report(&report);

    Ok(())
}
