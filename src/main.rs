//! Listing-Pager main entry point
//!
//! This is the command-line interface for the Listing-Pager listing scraper.

use anyhow::{bail, Context};
use clap::Parser;
use listing_pager::config::{load_config_with_hash, Config, ListingEntry};
use listing_pager::output::{write_markdown_report, ListingReport};
use listing_pager::storage::{open_store, FingerprintStore, MemoryFingerprintStore};
use listing_pager::{HtmlExtractor, PageCrawler};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Listing-Pager: a pagination-aware listing scraper
///
/// Listing-Pager walks paginated listing pages (career pages, catalogues)
/// page after page, collects every item link it finds and reports which
/// items are new since the last run.
#[derive(Parser, Debug)]
#[command(name = "listing-pager")]
#[command(version)]
#[command(about = "A pagination-aware listing scraper", long_about = None)]
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

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Report every item as new, ignoring the fingerprint database
    #[arg(long)]
    fresh: bool,

    /// Override the configured page limit
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=100))]
    page_limit: Option<u32>,

    /// Only crawl the listing with this name
    #[arg(long, value_name = "NAME")]
    only: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(page_limit) = cli.page_limit {
        config.crawler.page_limit = page_limit;
    }

    let listings = select_listings(&config, cli.only.as_deref())?;

    if cli.dry_run {
        handle_dry_run(&config, &listings, cli.fresh);
        return Ok(());
    }

    handle_crawl(&config, &listings, cli.fresh).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listing_pager=info,warn"),
            1 => EnvFilter::new("listing_pager=debug,info"),
            2 => EnvFilter::new("listing_pager=trace,debug"),
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

/// Applies `--only`, matching listing names case-insensitively
fn select_listings(config: &Config, only: Option<&str>) -> anyhow::Result<Vec<ListingEntry>> {
    let Some(name) = only else {
        return Ok(config.listings.clone());
    };

    let selected: Vec<ListingEntry> = config
        .listings
        .iter()
        .filter(|l| l.name.eq_ignore_ascii_case(name.trim()))
        .cloned()
        .collect();

    if selected.is_empty() {
        bail!("No listing named '{}' in configuration", name);
    }
    Ok(selected)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, listings: &[ListingEntry], fresh: bool) {
    println!("=== Listing-Pager Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Page limit: {}", config.crawler.page_limit);
    println!(
        "  Extraction timeout: {}ms",
        config.crawler.extraction_timeout
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nExtractor:");
    println!("  Item selector: {}", config.extractor.item_selector);
    println!("  Next selector: {}", config.extractor.next_selector);
    println!(
        "  Excluded keywords: {}",
        config.extractor.exclude_keywords.join(", ")
    );
    println!("  Same host only: {}", config.extractor.same_host_only);

    println!("\nOutput:");
    match (&config.output.database_path, fresh) {
        (_, true) => println!("  Database: none (--fresh)"),
        (Some(path), false) => println!("  Database: {}", path),
        (None, false) => println!("  Database: none"),
    }
    println!("  Summary: {}", config.output.summary_path);

    println!("\nListings ({}):", listings.len());
    for listing in listings {
        println!("  - {}: {}", listing.name, listing.start_url);
    }

    println!("\n✓ Configuration is valid");
}

/// Crawls every selected listing and writes the report
async fn handle_crawl(
    config: &Config,
    listings: &[ListingEntry],
    fresh: bool,
) -> anyhow::Result<()> {
    let mut store = open_fingerprint_store(config, fresh)?;

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let crawler = PageCrawler::from_config(&config.crawler).with_cancellation(cancel.clone());
    let mut reports = Vec::with_capacity(listings.len());

    for listing in listings {
        if cancel.is_cancelled() {
            tracing::warn!("Interrupted; skipping remaining listings");
            break;
        }

        tracing::info!("Crawling {} ({})", listing.name, listing.start_url);
        let mut extractor =
            HtmlExtractor::from_config(config).context("Failed to build extractor")?;

        let result = match crawler.crawl(&listing.start_url, &mut extractor).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Skipping {}: {}", listing.name, e);
                continue;
            }
        };

        if result.terminated_reason().is_failure() {
            tracing::warn!(
                "{}: stopped early ({}), kept {} items",
                listing.name,
                result.terminated_reason(),
                result.items().len()
            );
        }
        let report = ListingReport::from_store(listing.name.clone(), result, store.as_mut());
        tracing::info!(
            "{}: {} items, {} new, {} pages ({})",
            listing.name,
            report.result.items().len(),
            report.new_items.len(),
            report.result.pages_extracted(),
            report.result.terminated_reason()
        );

        reports.push(report);
    }

    let summary_path = Path::new(&config.output.summary_path);
    write_markdown_report(&reports, summary_path)
        .with_context(|| format!("Failed to write report {}", summary_path.display()))?;
    tracing::info!("Report written to {}", summary_path.display());

    if let Ok(count) = store.count() {
        tracing::debug!("Fingerprint store holds {} items", count);
    }

    Ok(())
}

fn open_fingerprint_store(config: &Config, fresh: bool) -> anyhow::Result<Box<dyn FingerprintStore>> {
    match (&config.output.database_path, fresh) {
        (Some(path), false) => {
            tracing::info!("Using fingerprint database {}", path);
            let store = open_store(Path::new(path))
                .with_context(|| format!("Failed to open database {}", path))?;
            Ok(Box::new(store))
        }
        (_, true) => {
            tracing::info!("Fresh run: every item is reported as new");
            Ok(Box::new(MemoryFingerprintStore::new()))
        }
        (None, false) => Ok(Box::new(MemoryFingerprintStore::new())),
    }
}

/// Cancels `token` on Ctrl-C; the running crawl stops at its next page
fn spawn_interrupt_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing with partial results");
            token.cancel();
        }
    });
}
