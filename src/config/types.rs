use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Newsreel
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub search: SearchConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seconds to wait for the results container after submitting a search
    #[serde(rename = "results-timeout-secs")]
    pub results_timeout_secs: u64,

    /// Per-request timeout for page and image fetches (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl CrawlerConfig {
    /// Bound on the post-search wait for the results container
    pub fn results_timeout(&self) -> Duration {
        Duration::from_secs(self.results_timeout_secs)
    }

    /// Bound on individual HTTP requests
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Search behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Query parameter controlling result ordering
    #[serde(rename = "sort-param")]
    pub sort_param: String,

    /// Value of the sort parameter that forces newest-first ordering
    #[serde(rename = "newest-value")]
    pub newest_value: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory where per-item CSV files and the item report are written
    #[serde(rename = "rows-dir")]
    pub rows_dir: String,

    /// Directory where downloaded article thumbnails are stored
    #[serde(rename = "image-dir")]
    pub image_dir: String,
}
