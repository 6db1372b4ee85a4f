//! Sitemap-SEO main entry point
//!
//! This is the command-line interface for the Sitemap-SEO scraper.

use clap::Parser;
use sitemap_seo::config::{load_config_with_hash, validate, Config};
use sitemap_seo::crawler::Crawler;
use sitemap_seo::output::{generate_markdown_report, print_records};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Sitemap-SEO: a sitemap-driven page metadata scraper
///
/// Sitemap-SEO walks a root sitemap and every sitemap it references, then
/// fetches each page found and prints its status code, title, first heading
/// and meta description.
#[derive(Parser, Debug)]
#[command(name = "sitemap-seo")]
#[command(version = "1.0.0")]
#[command(about = "A sitemap-driven page metadata scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", required_unless_present = "url")]
    config: Option<PathBuf>,

    /// Root sitemap URL (overrides the configuration file)
    #[arg(short, long)]
    url: Option<String>,

    /// Maximum concurrent page fetches (overrides the configuration file)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "discover_only")]
    dry_run: bool,

    /// Print discovered page URLs without scraping them
    #[arg(long, conflicts_with = "dry_run")]
    discover_only: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = match build_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.discover_only {
        handle_discover_only(config).await?;
    } else {
        handle_crawl(config, config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_seo=info,warn"),
            1 => EnvFilter::new("sitemap_seo=debug,info"),
            2 => EnvFilter::new("sitemap_seo=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration file if given, then applies command-line overrides
fn build_config(cli: &Cli) -> Result<(Config, Option<String>), Box<dyn std::error::Error>> {
    let (mut config, hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => match &cli.url {
            Some(url) => (Config::new(url.clone()), None),
            None => return Err("either a CONFIG file or --url is required".into()),
        },
    };

    if let Some(url) = &cli.url {
        config.sitemap.root_url = url.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.scraper.concurrency = concurrency;
    }

    validate(&config)?;
    Ok((config, hash))
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sitemap-SEO Dry Run ===\n");

    println!("Sitemap:");
    println!("  Root URL: {}", config.sitemap.root_url);
    println!(
        "  Skip revisited sitemaps: {}",
        config.sitemap.skip_revisited_sitemaps
    );

    println!("\nScraper:");
    println!("  Concurrency: {}", config.scraper.concurrency);
    println!("  Request timeout: {}s", config.scraper.request_timeout_secs);

    println!("\nUser Agents ({}):", config.user_agent.pool.len());
    for agent in &config.user_agent.pool {
        println!("  - {}", agent);
    }
    match config.user_agent.seed {
        Some(seed) => println!("  Seed: {}", seed),
        None => println!("  Seed: random"),
    }

    if let Some(path) = &config.output.report_path {
        println!("\nOutput:");
        println!("  Report: {}", path);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --discover-only mode: prints page URLs from the sitemap tree
async fn handle_discover_only(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let crawler = Crawler::new(config)?;
    for url in crawler.discover().await {
        println!("{}", url);
    }
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    config_hash: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Root sitemap: {}, concurrency: {}",
        config.sitemap.root_url,
        config.scraper.concurrency
    );

    let report_path = config.output.report_path.clone();
    let crawler = Crawler::new(config)?;
    let report = crawler.run().await;

    print_records(&report.records)?;

    if let Some(path) = report_path {
        generate_markdown_report(&report, config_hash.as_deref(), Path::new(&path))?;
        tracing::info!("Report written to: {}", path);
    }

    Ok(())
}
