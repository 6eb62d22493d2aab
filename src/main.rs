//! prodact main entry point
//!
//! This is the command-line interface for the prodact catalogue builder.

use anyhow::Context;
use clap::Parser;
use prodact::config::{load_config_with_hash, validate, Config, OutputFormat};
use prodact::output::{catalogue_path, print_summary};
use prodact::scraper::build_catalogue;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// prodact: builds a product catalogue from an online grocery store
///
/// prodact pages through the store's search API with a polite rate limit
/// and writes every product it finds to a timestamped file.
#[derive(Parser, Debug)]
#[command(name = "prodact")]
#[command(version)]
#[command(about = "Builds a product catalogue from an online grocery store", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Store to scrape
    #[arg(long)]
    store: Option<String>,

    /// Search query; empty scrapes every product
    #[arg(long)]
    query: Option<String>,

    /// Pause between page fetches in milliseconds (0 disables it)
    #[arg(long, value_name = "MS")]
    rate_limit_ms: Option<u64>,

    /// Only write products that are currently available
    #[arg(long)]
    only_available: bool,

    /// Row format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Directory for the catalogue file
    #[arg(long, value_name = "DIR", conflicts_with = "stdout")]
    output_dir: Option<String>,

    /// Write rows to standard output instead of a file
    #[arg(long)]
    stdout: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the resolved configuration without scraping
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config)?;
        return Ok(());
    }

    tracing::info!(
        "🧡 starting prodact with a rate limit of {}ms...",
        config.scraper.rate_limit_ms
    );

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, stopping after the current page");
            ctrl_c.cancel();
        }
    });

    let (sink, destination): (Box<dyn Write>, String) = if cli.stdout {
        (Box::new(std::io::stdout()), "stdout".to_string())
    } else {
        let directory = PathBuf::from(&config.output.directory);
        std::fs::create_dir_all(&directory)
            .with_context(|| format!("cannot create output directory {}", directory.display()))?;
        let path = catalogue_path(&directory, config.output.format, chrono::Local::now());
        let file = File::create(&path)
            .with_context(|| format!("cannot create catalogue file {}", path.display()))?;
        (Box::new(file), path.display().to_string())
    };

    tracing::info!("writing product catalogue to {}", destination);
    let (summary, _) = build_catalogue(&config, BufWriter::new(sink), cancel)
        .await
        .context("scrape failed")?;

    if !cli.quiet && !cli.stdout {
        print_summary(&summary);
    }

    tracing::info!("✨ my job is done, exiting cleanly...");
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("prodact=info,warn"),
            1 => EnvFilter::new("prodact=debug,info"),
            2 => EnvFilter::new("prodact=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so `--stdout` output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file, if any, and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(store) = &cli.store {
        config.scraper.store = store.clone();
    }
    if let Some(query) = &cli.query {
        config.scraper.query = query.clone();
    }
    if let Some(rate_limit_ms) = cli.rate_limit_ms {
        config.scraper.rate_limit_ms = rate_limit_ms;
    }
    if cli.only_available {
        config.output.only_available = true;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output.directory = output_dir.clone();
    }

    // Overrides can introduce an unsupported store; catch it before any work starts
    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be scraped
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== prodact Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Store: {}", config.scraper.store()?);
    println!("  Base URL: {}", config.scraper.base_url()?);
    println!("  Query: {:?}", config.scraper.query);
    println!("  Rate limit: {}ms", config.scraper.rate_limit_ms);
    println!("  Channel capacity: {}", config.scraper.channel_capacity);
    println!("  User agent: {}", config.scraper.user_agent);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Format: {:?}", config.output.format);
    println!("  Only available: {}", config.output.only_available);

    println!("\n✓ Configuration is valid");
    Ok(())
}
