//! Autospot crawler main entry point
//!
//! This is the command-line interface for the catalog crawler. Run without
//! arguments it crawls the default catalog into `data/`.

use anyhow::Context;
use autospot_crawler::config::{load_config_with_hash, Backend, Config};
use autospot_crawler::crawler::crawl;
use autospot_crawler::output::print_report;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Autospot crawler: brand → model → price catalog scraper
///
/// Crawls the catalog index, every brand listing and every model price page,
/// writing brands.json, models/<brand>.json and prices/<brand>_<model>.json.
#[derive(Parser, Debug)]
#[command(name = "autospot-crawler")]
#[command(version)]
#[command(about = "Three-level catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults (hash: default)");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let report = match crawl(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if !cli.quiet {
        print_report(&report);
    }

    match report.into_result() {
        Ok(_) => {
            tracing::info!("Crawl completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("autospot_crawler=info,warn"),
            1 => EnvFilter::new("autospot_crawler=debug,info"),
            2 => EnvFilter::new("autospot_crawler=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Autospot Crawler Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);

    println!("\nCrawler Configuration:");
    match config.crawler.max_concurrent_fetches {
        0 => println!("  Max concurrent fetches: unbounded"),
        n => println!("  Max concurrent fetches: {}", n),
    }
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout);
    println!(
        "  Halt on stage failure: {}",
        config.crawler.halt_on_stage_failure
    );

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    match config.output.backend {
        Backend::Files => println!("  Files under: {}", config.output.data_dir),
        Backend::Sqlite => println!("  SQLite database: {}", config.output.database_path),
    }

    println!("\n✓ Configuration is valid");
}
