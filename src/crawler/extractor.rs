//! Per-article field extraction and text-heuristic classification

use crate::browser::{selectors, Browser, NodeRef};
use crate::store::ImageStore;
use chrono::{DateTime, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Errors raised while extracting one article node
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Article is missing its {field} element")]
    ElementMissing { field: &'static str },

    #[error("Unparseable timestamp attribute: '{raw}'")]
    BadTimestamp { raw: String },

    #[error("Browser session error: {0}")]
    Browser(#[from] crate::browser::BrowserError),
}

/// One extracted article
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    pub title: String,
    /// Detail-page link, empty when the card carries none
    pub url: String,
    /// Teaser text, empty when the card carries none
    pub description: String,
    pub published_at: NaiveDateTime,
    /// Image-store reference, empty when the card has no thumbnail
    pub image_ref: String,
    pub mentions_money: bool,
    pub search_term_count: usize,
}

// A money mention is either a currency-style numeric token or a bare number
// followed by a spelled-out currency
static CURRENCY_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$?[0-9][0-9,.]*").unwrap());
static SPELLED_CURRENCY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[0-9]+\s*(dollars|usd)").unwrap());

/// True when the text carries a money amount
pub fn mentions_money(text: &str) -> bool {
    CURRENCY_TOKEN.is_match(text) || SPELLED_CURRENCY.is_match(text)
}

/// Derives a filesystem-safe `.jpg` name from an article title
///
/// Spaces become underscores, everything outside `[A-Za-z0-9_]` is stripped,
/// and the result is lowercased.
pub fn image_filename(title: &str) -> String {
    let mut name: String = title
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    name.make_ascii_lowercase();
    name.push_str(".jpg");
    name
}

/// Parses an epoch-millisecond attribute value
fn parse_epoch_millis(raw: &str) -> Option<NaiveDateTime> {
    let millis: i64 = raw.trim().parse().ok()?;
    DateTime::from_timestamp_millis(millis).map(|stamp| stamp.naive_utc())
}

/// Extracts [`ArticleRecord`]s for one work item's search term
pub struct Extractor {
    term_pattern: Regex,
    client: reqwest::Client,
}

impl Extractor {
    /// Creates an extractor for `search_term`
    pub fn new(search_term: &str, client: reqwest::Client) -> Self {
        // Escaping makes the term a literal, so the pattern always compiles
        let term_pattern = RegexBuilder::new(&regex::escape(search_term))
            .case_insensitive(true)
            .build()
            .unwrap();

        Self {
            term_pattern,
            client,
        }
    }

    /// Converts one raw article node into an [`ArticleRecord`]
    ///
    /// Title and timestamp are required; description, detail link, and
    /// thumbnail degrade to empty values when absent.
    pub async fn extract(
        &self,
        browser: &mut dyn Browser,
        images: &dyn ImageStore,
        article: NodeRef,
    ) -> Result<ArticleRecord, ExtractError> {
        let content = browser
            .find_one(selectors::CONTENT, Some(article))
            .await?
            .ok_or(ExtractError::ElementMissing { field: "content" })?;

        let title_container = browser
            .find_one(selectors::TITLE_CONTAINER, Some(content))
            .await?
            .ok_or(ExtractError::ElementMissing { field: "title" })?;
        let heading = browser
            .find_one(selectors::TITLE_HEADING, Some(title_container))
            .await?
            .ok_or(ExtractError::ElementMissing { field: "title" })?;
        let title = browser.text(heading).await?;

        let description = match browser
            .find_one(selectors::DESCRIPTION, Some(content))
            .await?
        {
            Some(node) => browser.text(node).await?,
            None => String::new(),
        };

        let stamp = browser
            .find_one(selectors::TIMESTAMP, Some(content))
            .await?
            .ok_or(ExtractError::ElementMissing { field: "timestamp" })?;
        let raw_stamp = browser
            .attribute(stamp, selectors::TIMESTAMP_ATTR)
            .await?
            .unwrap_or_default();
        let published_at =
            parse_epoch_millis(&raw_stamp).ok_or(ExtractError::BadTimestamp { raw: raw_stamp })?;

        let haystack = format!("{title}{description}");
        let mentions_money = mentions_money(&haystack);
        let search_term_count = self.term_pattern.find_iter(&haystack).count();

        let media = browser.find_one(selectors::MEDIA, Some(article)).await?;

        let mut url = String::new();
        if let Some(media) = media {
            if let Some(link) = browser.find_one(selectors::DETAIL_LINK, Some(media)).await? {
                url = browser.attribute(link, "href").await?.unwrap_or_default();
            }
        }
        if url.is_empty() {
            if let Some(link) = browser
                .find_one(selectors::DETAIL_LINK, Some(title_container))
                .await?
            {
                url = browser.attribute(link, "href").await?.unwrap_or_default();
            }
        }

        let image_ref = match media {
            Some(media) => {
                match browser.find_one(selectors::MEDIA_IMAGE, Some(media)).await? {
                    Some(img) => {
                        let src = browser.attribute(img, "src").await?.unwrap_or_default();
                        if src.is_empty() {
                            String::new()
                        } else {
                            self.store_thumbnail(images, &src, &image_filename(&title))
                                .await
                        }
                    }
                    None => String::new(),
                }
            }
            None => String::new(),
        };

        Ok(ArticleRecord {
            title,
            url,
            description,
            published_at,
            image_ref,
            mentions_money,
            search_term_count,
        })
    }

    /// Downloads the thumbnail and hands it to the image store
    ///
    /// A failure on either leg is logged and yields an empty reference; the
    /// article itself is never lost over its thumbnail.
    async fn store_thumbnail(&self, images: &dyn ImageStore, src: &str, key: &str) -> String {
        let bytes = match crate::store::fetch_image_bytes(&self.client, src).await {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!(%src, %error, "thumbnail download failed, emitting empty reference");
                return String::new();
            }
        };

        match images.store(&bytes, key).await {
            Ok(reference) => {
                tracing::info!(%key, "thumbnail stored");
                reference
            }
            Err(error) => {
                tracing::warn!(%key, %error, "thumbnail upload failed, emitting empty reference");
                String::new()
            }
        }
    }
}
