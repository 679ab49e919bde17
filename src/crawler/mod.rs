//! Crawl pipeline for one work item
//!
//! This module contains the core crawling logic:
//! - Date-window resolution for the acceptance threshold
//! - Search execution with a URL fallback
//! - Best-effort category narrowing and forced newest-first ordering
//! - Per-article extraction with text-heuristic classification
//! - The pagination state machine and its termination logic

mod controller;
mod extractor;
mod search;
mod window;

pub use controller::{Controller, CrawlPhase, CrawlState, ItemSummary};
pub use extractor::{image_filename, mentions_money, ArticleRecord, ExtractError, Extractor};
pub use search::{apply_category_filter, force_newest_sort, run_search};
pub use window::resolve_target_date;

use crate::browser::Browser;
use crate::config::Config;
use crate::items::WorkItem;
use crate::output::RowSink;
use crate::store::ImageStore;
use crate::Result;
use chrono::{NaiveDateTime, Utc};

/// Processes one work item end-to-end against an already-created session
///
/// The session must not have been used for another item. Search, the
/// optional category filter, forced ordering, and pagination all run against
/// it sequentially.
pub async fn process_item(
    browser: &mut dyn Browser,
    images: &dyn ImageStore,
    sink: &mut dyn RowSink,
    item: &WorkItem,
    config: &Config,
) -> Result<ItemSummary> {
    process_item_at(browser, images, sink, item, config, Utc::now().naive_utc()).await
}

/// Same as [`process_item`] with an explicit reference instant, so tests can
/// pin the date window
pub async fn process_item_at(
    browser: &mut dyn Browser,
    images: &dyn ImageStore,
    sink: &mut dyn RowSink,
    item: &WorkItem,
    config: &Config,
    now: NaiveDateTime,
) -> Result<ItemSummary> {
    let target_date = window::resolve_target_date(item.num_months, now);
    tracing::info!(
        url = %item.url,
        term = %item.search_term,
        %target_date,
        "processing work item"
    );

    browser.navigate(&item.url).await?;
    search::run_search(
        browser,
        &item.url,
        &item.search_term,
        config.crawler.results_timeout(),
    )
    .await?;

    if !item.category.is_empty() {
        search::apply_category_filter(browser, &item.category).await;
    }

    search::force_newest_sort(browser, &config.search).await?;

    let client = reqwest::Client::builder()
        .timeout(config.crawler.request_timeout())
        .build()?;
    let extractor = Extractor::new(&item.search_term, client);

    Controller::new(browser, images, sink, extractor, target_date, now)
        .run()
        .await
}
