//! Newsreel: a news search-results crawler
//!
//! This crate drives a news site's search feed for a search term, keeps the
//! articles published within the most recent N months, and emits structured
//! records for downstream storage. The browser, the image store, and the row
//! sink are capability traits so the pipeline can run against a real site,
//! a plain-HTML session, or scripted test doubles.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod items;
pub mod output;
pub mod store;

use thiserror::Error;

/// Main error type for Newsreel operations
#[derive(Debug, Error)]
pub enum NewsreelError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser session error: {0}")]
    Browser(#[from] browser::BrowserError),

    #[error("Extraction error: {0}")]
    Extract(#[from] crawler::ExtractError),

    #[error("Timed out waiting for search results at {url}")]
    ResultsTimeout { url: String },

    #[error("Row sink error: {0}")]
    Sink(#[from] output::SinkError),

    #[error("Image store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("Work item error: {0}")]
    Items(#[from] items::ItemError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Newsreel operations
pub type Result<T> = std::result::Result<T, NewsreelError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use browser::{Browser, ClickOutcome, NodeRef, WaitOutcome};
pub use config::Config;
pub use crawler::{process_item, process_item_at, ArticleRecord, CrawlPhase, ItemSummary};
pub use items::{ItemQueue, WorkItem};
pub use output::{NewsRow, RowSink};
pub use store::ImageStore;
