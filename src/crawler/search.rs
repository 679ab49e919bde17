//! Search execution, category narrowing, and forced result ordering

use crate::browser::{selectors, Browser, NodeRef, WaitOutcome};
use crate::config::SearchConfig;
use crate::{NewsreelError, Result};
use std::time::Duration;
use url::Url;

/// Runs the site search for `term`
///
/// Tries the interactive overlay first; when any piece of that affordance is
/// missing or unusable, falls back to the URL-based search endpoint. Either
/// way, blocks until the results container shows up; a timeout there fails
/// the whole item.
pub async fn run_search(
    browser: &mut dyn Browser,
    base_url: &str,
    term: &str,
    results_timeout: Duration,
) -> Result<()> {
    if !search_via_overlay(browser, term).await? {
        tracing::warn!("search affordance not found, falling back to URL search");
        browser.navigate(&fallback_search_url(base_url, term)).await?;
    }

    match browser
        .wait_until_present(selectors::RESULTS_MENU, results_timeout)
        .await?
    {
        WaitOutcome::Present => Ok(()),
        WaitOutcome::TimedOut => Err(NewsreelError::ResultsTimeout {
            url: browser.current_url().unwrap_or_default(),
        }),
    }
}

/// Attempts the interactive overlay path; `Ok(false)` means a required
/// element was missing and the caller should fall back
async fn search_via_overlay(browser: &mut dyn Browser, term: &str) -> Result<bool> {
    let Some(body) = browser.find_one(selectors::PAGE_BODY, None).await? else {
        return Ok(false);
    };
    let Some(button) = browser.find_one(selectors::SEARCH_BUTTON, Some(body)).await? else {
        return Ok(false);
    };
    if browser.click(button).await?.is_rejected() {
        return Ok(false);
    }

    let Some(overlay) = browser.find_one(selectors::SEARCH_OVERLAY, None).await? else {
        return Ok(false);
    };
    let Some(input) = browser.find_one(selectors::SEARCH_INPUT, Some(overlay)).await? else {
        return Ok(false);
    };
    browser.type_text(input, term).await?;

    let Some(submit) = browser.find_one(selectors::SEARCH_SUBMIT, Some(overlay)).await? else {
        return Ok(false);
    };
    if browser.click(submit).await?.is_rejected() {
        return Ok(false);
    }

    Ok(true)
}

/// The URL-based search endpoint for `term`
fn fallback_search_url(base_url: &str, term: &str) -> String {
    format!(
        "{}/search?q={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(term)
    )
}

/// Best-effort category narrowing; never fails the crawl
pub async fn apply_category_filter(browser: &mut dyn Browser, category: &str) {
    if let Err(error) = try_category_filter(browser, category).await {
        tracing::warn!(%category, %error, "category selection failed, continuing unfiltered");
    }
}

async fn try_category_filter(browser: &mut dyn Browser, category: &str) -> Result<()> {
    tracing::info!(%category, "selecting category");

    let Some(content) = browser.find_one(selectors::PAGE_CONTENT, None).await? else {
        tracing::warn!("page content not found, skipping category filter");
        return Ok(());
    };
    let Some(toggler) = browser
        .find_one(selectors::CATEGORY_TOGGLER, Some(content))
        .await?
    else {
        tracing::warn!("category list not found, skipping category filter");
        return Ok(());
    };

    match find_label(browser, toggler, selectors::SEE_ALL_LABEL).await? {
        Some(see_all) => {
            browser.click(see_all).await?;
        }
        None => tracing::debug!("no expansion control, category list already open"),
    }

    match find_label(browser, toggler, category).await? {
        Some(node) => {
            browser.click(node).await?;
        }
        None => tracing::warn!(%category, "category not found"),
    }

    Ok(())
}

/// Finds the first label under `scope` whose text contains `label`
async fn find_label(
    browser: &mut dyn Browser,
    scope: NodeRef,
    label: &str,
) -> Result<Option<NodeRef>> {
    for node in browser.find_all(selectors::CATEGORY_LABEL, Some(scope)).await? {
        if browser.text(node).await?.contains(label) {
            return Ok(Some(node));
        }
    }
    Ok(None)
}

/// Forces newest-first ordering by rewriting the sort parameter in the
/// current location and re-navigating
///
/// The interactive sort control participates in an asynchronous content
/// replacement that cannot be reliably awaited, so ordering is pinned at the
/// URL level instead.
pub async fn force_newest_sort(browser: &mut dyn Browser, search: &SearchConfig) -> Result<()> {
    tracing::info!("sorting by newest");
    let current = browser.current_url()?;
    let sorted = rewrite_sort_param(&current, &search.sort_param, &search.newest_value)?;
    browser.navigate(&sorted).await?;
    Ok(())
}

/// Sets (or appends) `param=value` in the query string of `location`
fn rewrite_sort_param(
    location: &str,
    param: &str,
    value: &str,
) -> std::result::Result<String, url::ParseError> {
    let mut url = Url::parse(location)?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != param)
        .map(|(key, val)| (key.into_owned(), val.into_owned()))
        .collect();

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        pairs.extend_pairs(kept);
        pairs.append_pair(param, value);
    }

    Ok(url.to_string())
}
