//! The emitted record schema

use crate::crawler::ArticleRecord;
use serde::Serialize;

/// Format of the `date` column
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row handed to the sink, in the downstream storage schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsRow {
    pub title: String,
    pub url: String,
    pub description: String,
    /// Publish timestamp formatted as `YYYY-MM-DD HH:MM:SS`
    pub date: String,
    /// Image-store reference, empty when the article had no thumbnail
    pub image: String,
    pub amount_of_money: bool,
    pub count_search_phrase: usize,
}

impl NewsRow {
    /// Builds a row from an extracted article
    pub fn from_record(record: &ArticleRecord) -> Self {
        Self {
            title: record.title.clone(),
            url: record.url.clone(),
            description: record.description.clone(),
            date: record.published_at.format(DATE_FORMAT).to_string(),
            image: record.image_ref.clone(),
            amount_of_money: record.mentions_money,
            count_search_phrase: record.search_term_count,
        }
    }
}
