//! Pagination state machine
//!
//! One [`Controller`] per work item: it owns the [`CrawlState`], walks the
//! result pages, runs the extractor over every article node, applies the
//! date window, and decides when the feed is exhausted.

use crate::browser::{selectors, Browser, BrowserError, ClickOutcome};
use crate::crawler::extractor::Extractor;
use crate::output::{NewsRow, RowSink};
use crate::store::ImageStore;
use crate::Result;
use chrono::NaiveDateTime;

/// Phase of the pagination state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    /// Extracting articles from the current results page
    Scraping,
    /// Attempting to move to the next results page
    AdvancingPage,
    /// No more pages will be processed
    Terminated,
}

impl CrawlPhase {
    /// Returns true when no further pages will be processed
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

/// Mutable crawl-progress state, owned by the controller
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// Inclusive lower bound on accepted publish dates; fixed once resolved
    pub target_date: NaiveDateTime,
    /// Minimum publish date observed so far; governs termination
    pub oldest_seen: NaiveDateTime,
    /// Zero-based index of the current results page
    pub page_index: usize,
    pub phase: CrawlPhase,
}

impl CrawlState {
    /// Creates the state for one work item, with `oldest_seen` starting at
    /// the reference instant
    pub fn new(target_date: NaiveDateTime, now: NaiveDateTime) -> Self {
        Self {
            target_date,
            oldest_seen: now,
            page_index: 0,
            phase: CrawlPhase::Scraping,
        }
    }

    /// Folds one observed publish date into `oldest_seen`
    fn observe(&mut self, published_at: NaiveDateTime) {
        if published_at < self.oldest_seen {
            self.oldest_seen = published_at;
        }
    }

    /// True once the feed has moved past the acceptance window
    fn window_exhausted(&self) -> bool {
        self.oldest_seen < self.target_date
    }
}

/// What happened while processing one work item
#[derive(Debug, Clone)]
pub struct ItemSummary {
    /// Results pages that were scraped
    pub pages_visited: usize,
    /// Rows handed to the sink
    pub rows_emitted: usize,
    /// Articles dropped for falling outside the window
    pub rows_dropped: usize,
    /// Minimum publish date observed across all pages
    pub oldest_seen: NaiveDateTime,
}

/// Drives the pagination loop for one work item
pub struct Controller<'a> {
    browser: &'a mut dyn Browser,
    images: &'a dyn ImageStore,
    sink: &'a mut dyn RowSink,
    extractor: Extractor,
    state: CrawlState,
}

impl<'a> Controller<'a> {
    pub fn new(
        browser: &'a mut dyn Browser,
        images: &'a dyn ImageStore,
        sink: &'a mut dyn RowSink,
        extractor: Extractor,
        target_date: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            browser,
            images,
            sink,
            extractor,
            state: CrawlState::new(target_date, now),
        }
    }

    /// Runs the loop to termination
    ///
    /// Rows already appended for earlier pages survive a failure on a later
    /// page; the caller decides what to do with the error.
    pub async fn run(mut self) -> Result<ItemSummary> {
        let mut rows_emitted = 0;
        let mut rows_dropped = 0;

        loop {
            let (rows, dropped) = self.scrape_page().await?;
            self.sink.append_rows(&rows, self.state.page_index == 0)?;
            rows_emitted += rows.len();
            rows_dropped += dropped;

            if self.state.window_exhausted() {
                self.terminate("feed moved past the acceptance window");
            } else {
                self.advance().await?;
            }

            if self.state.phase.is_terminal() {
                break;
            }
        }

        Ok(ItemSummary {
            pages_visited: self.state.page_index + 1,
            rows_emitted,
            rows_dropped,
            oldest_seen: self.state.oldest_seen,
        })
    }

    /// Extracts every article on the current page, splitting them into
    /// emitted rows and out-of-window drops
    async fn scrape_page(&mut self) -> Result<(Vec<NewsRow>, usize)> {
        let results = self
            .browser
            .find_one(selectors::RESULTS_MENU, None)
            .await?
            .ok_or_else(|| BrowserError::ElementMissing {
                selector: selectors::RESULTS_MENU.to_string(),
            })?;
        let articles = self.browser.find_all(selectors::ARTICLE, Some(results)).await?;

        tracing::info!(
            page = self.state.page_index,
            articles = articles.len(),
            "scraping results page"
        );

        let mut rows = Vec::new();
        let mut dropped = 0;
        for node in articles {
            let record = self
                .extractor
                .extract(&mut *self.browser, self.images, node)
                .await?;
            self.state.observe(record.published_at);

            if record.published_at >= self.state.target_date {
                tracing::info!(title = %record.title, "article accepted");
                rows.push(NewsRow::from_record(&record));
            } else {
                tracing::warn!(
                    title = %record.title,
                    published_at = %record.published_at,
                    "article older than target date, dropped"
                );
                dropped += 1;
            }
        }

        Ok((rows, dropped))
    }

    /// Attempts to move to the next results page
    ///
    /// A missing control or a rejected click is the normal end-of-results
    /// signal, not a failure.
    async fn advance(&mut self) -> Result<()> {
        self.state.phase = CrawlPhase::AdvancingPage;

        let Some(next) = self.browser.find_one(selectors::NEXT_PAGE, None).await? else {
            self.terminate("no next-page control");
            return Ok(());
        };

        match self.browser.click(next).await? {
            ClickOutcome::Clicked => {
                self.state.page_index += 1;
                self.state.phase = CrawlPhase::Scraping;
            }
            outcome => {
                self.terminate(&format!("next-page control rejected the click ({outcome:?})"));
            }
        }

        Ok(())
    }

    fn terminate(&mut self, reason: &str) {
        tracing::info!(page = self.state.page_index, %reason, "ending scrape");
        self.state.phase = CrawlPhase::Terminated;
    }
}
