//! Shelfscan main entry point
//!
//! This is the command-line interface for the Shelfscan catalogue crawler.

use anyhow::{bail, Context};
use clap::Parser;
use shelfscan::config::{load_config_with_hash, Config};
use shelfscan::crawler::Pipeline;
use shelfscan::output::{print_report, write_markdown_report};
use shelfscan::storage::{open_sinks, RecordSink, SqliteSink};
use shelfscan::RunContext;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shelfscan: a catalogue crawler for bookshop-style sites
///
/// Shelfscan reads a site's category navigation, collects every category
/// listing concurrently and harvests each item's detail page into records
/// written to SQLite and/or JSON.
#[derive(Parser, Debug)]
#[command(name = "shelfscan")]
#[command(version = "1.0.0")]
#[command(about = "A catalogue crawler for bookshop-style sites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the resolved run context without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show the latest stored run from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(&config, &config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelfscan=info,warn"),
            1 => EnvFilter::new("shelfscan=debug,info"),
            2 => EnvFilter::new("shelfscan=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the run context
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let context = RunContext::from_config(config).context("failed to build run context")?;

    println!("=== Shelfscan Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", context.base_url);
    println!("  Catalogue URL: {}", context.catalogue_url);
    println!("  Excluded category: {}", context.excluded_category);

    println!("\nFetch:");
    println!("  Liveness timeout: {:?}", context.timeouts.liveness);
    println!("  Discovery timeout: {:?}", context.timeouts.discovery);
    println!("  Listing timeout: {:?}", context.timeouts.listing);
    println!("  Detail timeout: {:?}", context.timeouts.detail);
    match context.max_concurrent_listings {
        Some(limit) => println!("  Max concurrent listings: {}", limit),
        None => println!("  Max concurrent listings: unbounded"),
    }
    println!(
        "  Max concurrent details: {}",
        context.max_concurrent_details
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    print_optional_path("Database", config.output.database_path.as_deref());
    print_optional_path("JSON", config.output.json_path.as_deref());
    print_optional_path("Summary", config.output.summary_path.as_deref());

    println!("\nSchemas:");
    for schema in [
        &context.schemas.categories,
        &context.schemas.listing,
        &context.schemas.detail,
    ] {
        let fields: Vec<&str> = schema.field_names().collect();
        println!("  {}: {}", schema.name(), fields.join(", "));
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

fn print_optional_path(label: &str, path: Option<&str>) {
    println!("  {}: {}", label, path.unwrap_or("(not set)"));
}

/// Handles the --stats mode: shows the latest stored run
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let Some(database_path) = config.output.database_path.as_deref() else {
        bail!("--stats requires output.database-path to be set");
    };

    println!("Database: {}\n", database_path);

    let sink = SqliteSink::new(Path::new(database_path), "")
        .with_context(|| format!("failed to open {}", database_path))?;

    match sink.latest_run()? {
        Some(run) => {
            println!("=== Latest Run ===\n");
            println!("  Run ID: {}", run.id);
            println!("  Started: {}", run.started_at);
            println!("  Finished: {}", run.finished_at);
            if let Some(duration) = run.duration_seconds() {
                println!("  Duration: {}s", duration);
            }
            println!("  Config hash: {}", run.config_hash);
            println!("  Records: {}", run.record_count);
            println!("\nTotal stored records: {}", sink.count_records()?);
        }
        None => println!("No runs stored yet"),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    let mut sinks =
        open_sinks(&config.output, config_hash).context("failed to open output sinks")?;
    tracing::info!("Writing records to {}", sinks.describe());

    let mut pipeline = Pipeline::new(config).context("failed to build pipeline")?;
    tracing::info!("Starting crawl of {}", pipeline.context().base_url);

    let report = match pipeline.run(&mut sinks).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    print_report(&report);

    if let Some(summary_path) = config.output.summary_path.as_deref() {
        write_markdown_report(&report, config_hash, Path::new(summary_path))
            .with_context(|| format!("failed to write summary to {}", summary_path))?;
        tracing::info!("Summary written to {}", summary_path);
    }

    Ok(())
}
