//! Newsreel main entry point
//!
//! This is the command-line interface for the Newsreel search-results
//! crawler.

use anyhow::Context;
use clap::Parser;
use newsreel::browser::StaticSession;
use newsreel::config::{load_config, Config};
use newsreel::crawler::{process_item, ItemSummary};
use newsreel::items::{ItemQueue, WorkItem};
use newsreel::output::CsvSink;
use newsreel::store::FsImageStore;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Newsreel: a news search-results crawler
///
/// Newsreel runs one site search per work item, keeps the articles published
/// within the most recent N months, stores their thumbnails, and appends the
/// records to per-item CSV files.
#[derive(Parser, Debug)]
#[command(name = "newsreel")]
#[command(version)]
#[command(about = "A news search-results crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Path to the JSON work-items file
    #[arg(short, long, value_name = "ITEMS", default_value = "work-items.json")]
    items: PathBuf,

    /// Validate config and list work items without crawling
    #[arg(long)]
    dry_run: bool,

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

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("loading configuration {}", cli.config.display()))?;

    let mut queue = ItemQueue::load(&cli.items)
        .with_context(|| format!("loading work items {}", cli.items.display()))?;
    tracing::info!("Loaded {} work items", queue.len());

    if cli.dry_run {
        handle_dry_run(&config, &queue);
        return Ok(());
    }

    std::fs::create_dir_all(&config.output.rows_dir)
        .with_context(|| format!("creating output directory {}", config.output.rows_dir))?;

    run_items(&config, &mut queue).await;

    let report_path = Path::new(&config.output.rows_dir).join("items-report.json");
    queue
        .write_report(&report_path)
        .context("writing item report")?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("newsreel=info,warn"),
            1 => EnvFilter::new("newsreel=debug,info"),
            2 => EnvFilter::new("newsreel=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &Config, queue: &ItemQueue) {
    println!("=== Newsreel Dry Run ===\n");

    println!("Crawler:");
    println!("  Results timeout: {}s", config.crawler.results_timeout_secs);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nSearch:");
    println!(
        "  Newest-first ordering: {}={}",
        config.search.sort_param, config.search.newest_value
    );

    println!("\nOutput:");
    println!("  Rows: {}", config.output.rows_dir);
    println!("  Images: {}", config.output.image_dir);

    println!("\nWork items ({}):", queue.len());
    for id in 0..queue.len() {
        if let Some(item) = queue.get(id) {
            let category = if item.category.is_empty() {
                "-".to_string()
            } else {
                item.category.clone()
            };
            println!(
                "  {}. {} \"{}\" ({} months, category: {})",
                id + 1,
                item.url,
                item.search_term,
                item.num_months,
                category
            );
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would process {} work items", queue.len());
}

/// Processes every queued item, marking each done or failed
///
/// A failed item never takes the rest of the queue down with it.
async fn run_items(config: &Config, queue: &mut ItemQueue) {
    let images = FsImageStore::new(&config.output.image_dir);

    for id in 0..queue.len() {
        let Some(item) = queue.get(id).cloned() else {
            continue;
        };

        match run_one(config, &images, &item, id).await {
            Ok(summary) => {
                tracing::info!(
                    item = id,
                    pages = summary.pages_visited,
                    rows = summary.rows_emitted,
                    dropped = summary.rows_dropped,
                    "work item complete"
                );
                let _ = queue.mark_done(id);
            }
            Err(error) => {
                tracing::error!(item = id, %error, "work item failed");
                let _ = queue.mark_failed(id, &error.to_string());
            }
        }
    }
}

/// Runs a single work item in a fresh session
async fn run_one(
    config: &Config,
    images: &FsImageStore,
    item: &WorkItem,
    id: usize,
) -> newsreel::Result<ItemSummary> {
    let mut browser = StaticSession::new(config.crawler.request_timeout())?;

    let rows_path = Path::new(&config.output.rows_dir).join(format!("news-{}.csv", id + 1));
    let mut sink = CsvSink::create(&rows_path)?;

    process_item(&mut browser, images, &mut sink, item, config).await
}
