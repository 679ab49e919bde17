#![allow(dead_code)]

//! Scripted test doubles for the capability contracts
//!
//! The fake browser replays a fixed sequence of result pages so the crawl
//! flow can be exercised without a site: articles are plain data, finds
//! dispatch on the published selector constants, and the next-page control
//! advances through the scripted pages.

use async_trait::async_trait;
use chrono::NaiveDate;
use newsreel::browser::{
    selectors, Browser, BrowserError, BrowserResult, ClickOutcome, NodeRef, WaitOutcome,
};
use newsreel::config::{Config, CrawlerConfig, OutputConfig, SearchConfig};
use newsreel::output::{NewsRow, RowSink, SinkResult};
use newsreel::store::{ImageStore, StoreResult};
use std::sync::Mutex;
use std::time::Duration;

/// Fixed reference instant used by the flow tests: 2024-06-15 12:00:00
pub fn test_now() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Epoch milliseconds for noon UTC on the given date
pub fn noon_millis(year: i32, month: u32, day: u32) -> i64 {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp_millis()
}

/// A config with short timeouts and throwaway output paths
pub fn test_config() -> Config {
    Config {
        crawler: CrawlerConfig {
            results_timeout_secs: 2,
            request_timeout_secs: 2,
        },
        search: SearchConfig {
            sort_param: "s".to_string(),
            newest_value: "1".to_string(),
        },
        output: OutputConfig {
            rows_dir: ".".to_string(),
            image_dir: ".".to_string(),
        },
    }
}

/// One scripted article card
#[derive(Debug, Clone, Default)]
pub struct FakeArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Raw value of the timestamp attribute; `None` models a missing value
    pub timestamp: Option<String>,
    pub media_href: Option<String>,
    pub title_href: Option<String>,
    pub image_src: Option<String>,
}

impl FakeArticle {
    pub fn new(title: &str, timestamp_millis: i64) -> Self {
        Self {
            title: Some(title.to_string()),
            timestamp: Some(timestamp_millis.to_string()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_title_href(mut self, href: &str) -> Self {
        self.title_href = Some(href.to_string());
        self
    }

    pub fn with_media_href(mut self, href: &str) -> Self {
        self.media_href = Some(href.to_string());
        self
    }

    pub fn with_image(mut self, src: &str) -> Self {
        self.image_src = Some(src.to_string());
        self
    }

    pub fn without_title(mut self) -> Self {
        self.title = None;
        self
    }

    pub fn without_timestamp(mut self) -> Self {
        self.timestamp = None;
        self
    }

    fn has_media(&self) -> bool {
        self.media_href.is_some() || self.image_src.is_some()
    }
}

/// One scripted results page
#[derive(Debug, Clone)]
pub struct FakePage {
    pub articles: Vec<FakeArticle>,
    /// Whether the next-page control is rendered on this page
    pub has_next: bool,
}

/// What a handed-out node handle points at
#[derive(Debug, Clone)]
enum FakeNode {
    PageBody,
    PageContent,
    ResultsMenu,
    SearchButton,
    SearchOverlay,
    SearchInput,
    SearchSubmit,
    CategoryToggler,
    CategoryLabel(String),
    Article(usize),
    Content(usize),
    TitleContainer(usize),
    Heading(usize),
    Description(usize),
    Timestamp(usize),
    Media(usize),
    Image(usize),
    MediaLink(usize),
    TitleLink(usize),
    NextPage,
}

/// Browser double replaying scripted pages
pub struct FakeBrowser {
    pages: Vec<FakePage>,
    current_page: usize,
    current_url: String,
    /// Whether the interactive search affordance exists
    pub has_search_overlay: bool,
    /// Whether the results container ever shows up
    pub results_present: bool,
    /// Category labels offered by the toggler; `None` removes the toggler
    pub categories: Option<Vec<String>>,
    /// Every URL passed to `navigate`, in order
    pub nav_log: Vec<String>,
    /// Everything typed into the search input
    pub typed: Vec<String>,
    /// Category label that ended up clicked
    pub selected_category: Option<String>,
    /// How many times the next-page control was activated
    pub next_click_attempts: usize,
    nodes: Vec<FakeNode>,
}

impl FakeBrowser {
    pub fn new(pages: Vec<FakePage>) -> Self {
        Self {
            pages,
            current_page: 0,
            current_url: String::new(),
            has_search_overlay: false,
            results_present: true,
            categories: None,
            nav_log: Vec::new(),
            typed: Vec::new(),
            selected_category: None,
            next_click_attempts: 0,
            nodes: Vec::new(),
        }
    }

    fn page(&self) -> &FakePage {
        &self.pages[self.current_page]
    }

    fn article(&self, index: usize) -> &FakeArticle {
        &self.page().articles[index]
    }

    fn register(&mut self, node: FakeNode) -> NodeRef {
        self.nodes.push(node);
        NodeRef(self.nodes.len() as u64 - 1)
    }

    fn node(&self, handle: NodeRef) -> BrowserResult<FakeNode> {
        self.nodes
            .get(handle.0 as usize)
            .cloned()
            .ok_or(BrowserError::StaleNode(handle))
    }

    fn lookup(&self, selector: &str, scope: Option<NodeRef>) -> BrowserResult<Option<FakeNode>> {
        let scope_node = match scope {
            Some(handle) => Some(self.node(handle)?),
            None => None,
        };

        let found = match selector {
            s if s == selectors::PAGE_BODY => Some(FakeNode::PageBody),
            s if s == selectors::PAGE_CONTENT => Some(FakeNode::PageContent),
            s if s == selectors::RESULTS_MENU => Some(FakeNode::ResultsMenu),
            s if s == selectors::SEARCH_BUTTON => {
                self.has_search_overlay.then_some(FakeNode::SearchButton)
            }
            s if s == selectors::SEARCH_OVERLAY => {
                self.has_search_overlay.then_some(FakeNode::SearchOverlay)
            }
            s if s == selectors::SEARCH_INPUT => {
                self.has_search_overlay.then_some(FakeNode::SearchInput)
            }
            s if s == selectors::SEARCH_SUBMIT => {
                self.has_search_overlay.then_some(FakeNode::SearchSubmit)
            }
            s if s == selectors::CATEGORY_TOGGLER => self
                .categories
                .is_some()
                .then_some(FakeNode::CategoryToggler),
            s if s == selectors::NEXT_PAGE => self.page().has_next.then_some(FakeNode::NextPage),
            s if s == selectors::CONTENT => match scope_node {
                Some(FakeNode::Article(i)) => Some(FakeNode::Content(i)),
                _ => None,
            },
            s if s == selectors::TITLE_CONTAINER => match scope_node {
                Some(FakeNode::Content(i)) => Some(FakeNode::TitleContainer(i)),
                _ => None,
            },
            s if s == selectors::TITLE_HEADING => match scope_node {
                Some(FakeNode::TitleContainer(i)) => {
                    self.article(i).title.is_some().then_some(FakeNode::Heading(i))
                }
                _ => None,
            },
            s if s == selectors::DESCRIPTION => match scope_node {
                Some(FakeNode::Content(i)) => self
                    .article(i)
                    .description
                    .is_some()
                    .then_some(FakeNode::Description(i)),
                _ => None,
            },
            s if s == selectors::TIMESTAMP => match scope_node {
                Some(FakeNode::Content(i)) => Some(FakeNode::Timestamp(i)),
                _ => None,
            },
            s if s == selectors::MEDIA => match scope_node {
                Some(FakeNode::Article(i)) => {
                    self.article(i).has_media().then_some(FakeNode::Media(i))
                }
                _ => None,
            },
            s if s == selectors::MEDIA_IMAGE => match scope_node {
                Some(FakeNode::Media(i)) => {
                    self.article(i).image_src.is_some().then_some(FakeNode::Image(i))
                }
                _ => None,
            },
            s if s == selectors::DETAIL_LINK => match scope_node {
                Some(FakeNode::Media(i)) => self
                    .article(i)
                    .media_href
                    .is_some()
                    .then_some(FakeNode::MediaLink(i)),
                Some(FakeNode::TitleContainer(i)) => self
                    .article(i)
                    .title_href
                    .is_some()
                    .then_some(FakeNode::TitleLink(i)),
                _ => None,
            },
            _ => None,
        };

        Ok(found)
    }
}

#[async_trait(?Send)]
impl Browser for FakeBrowser {
    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        self.nav_log.push(url.to_string());
        self.current_url = url.to_string();
        self.nodes.clear();
        Ok(())
    }

    fn current_url(&self) -> BrowserResult<String> {
        Ok(self.current_url.clone())
    }

    async fn find_one(
        &mut self,
        selector: &str,
        scope: Option<NodeRef>,
    ) -> BrowserResult<Option<NodeRef>> {
        match self.lookup(selector, scope)? {
            Some(node) => Ok(Some(self.register(node))),
            None => Ok(None),
        }
    }

    async fn find_all(
        &mut self,
        selector: &str,
        scope: Option<NodeRef>,
    ) -> BrowserResult<Vec<NodeRef>> {
        if selector == selectors::ARTICLE {
            let count = self.page().articles.len();
            return Ok((0..count).map(|i| self.register(FakeNode::Article(i))).collect());
        }

        if selector == selectors::CATEGORY_LABEL {
            let mut labels = vec![selectors::SEE_ALL_LABEL.to_string()];
            labels.extend(self.categories.clone().unwrap_or_default());
            return Ok(labels
                .into_iter()
                .map(|label| self.register(FakeNode::CategoryLabel(label)))
                .collect());
        }

        match self.lookup(selector, scope)? {
            Some(node) => Ok(vec![self.register(node)]),
            None => Ok(Vec::new()),
        }
    }

    async fn click(&mut self, node: NodeRef) -> BrowserResult<ClickOutcome> {
        match self.node(node)? {
            FakeNode::SearchButton | FakeNode::SearchSubmit => Ok(ClickOutcome::Clicked),
            FakeNode::CategoryLabel(label) => {
                if label != selectors::SEE_ALL_LABEL {
                    self.selected_category = Some(label);
                }
                Ok(ClickOutcome::Clicked)
            }
            FakeNode::NextPage => {
                self.next_click_attempts += 1;
                if self.current_page + 1 < self.pages.len() {
                    self.current_page += 1;
                    self.nodes.clear();
                    Ok(ClickOutcome::Clicked)
                } else {
                    Ok(ClickOutcome::Intercepted)
                }
            }
            _ => Ok(ClickOutcome::NotEnabled),
        }
    }

    async fn type_text(&mut self, _node: NodeRef, text: &str) -> BrowserResult<()> {
        self.typed.push(text.to_string());
        Ok(())
    }

    async fn wait_until_present(
        &mut self,
        selector: &str,
        _timeout: Duration,
    ) -> BrowserResult<WaitOutcome> {
        if selector == selectors::RESULTS_MENU && !self.results_present {
            return Ok(WaitOutcome::TimedOut);
        }
        Ok(WaitOutcome::Present)
    }

    async fn attribute(&mut self, node: NodeRef, name: &str) -> BrowserResult<Option<String>> {
        let value = match self.node(node)? {
            FakeNode::Timestamp(i) if name == selectors::TIMESTAMP_ATTR => {
                self.article(i).timestamp.clone()
            }
            FakeNode::Image(i) if name == "src" => self.article(i).image_src.clone(),
            FakeNode::MediaLink(i) if name == "href" => self.article(i).media_href.clone(),
            FakeNode::TitleLink(i) if name == "href" => self.article(i).title_href.clone(),
            _ => None,
        };
        Ok(value)
    }

    async fn text(&mut self, node: NodeRef) -> BrowserResult<String> {
        let text = match self.node(node)? {
            FakeNode::Heading(i) => self.article(i).title.clone().unwrap_or_default(),
            FakeNode::Description(i) => self.article(i).description.clone().unwrap_or_default(),
            FakeNode::CategoryLabel(label) => label,
            _ => String::new(),
        };
        Ok(text)
    }
}

/// Sink double recording every batch with its header flag
#[derive(Default)]
pub struct MemorySink {
    pub batches: Vec<(Vec<NewsRow>, bool)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All rows across batches, in emit order
    pub fn rows(&self) -> Vec<&NewsRow> {
        self.batches.iter().flat_map(|(rows, _)| rows).collect()
    }
}

impl RowSink for MemorySink {
    fn append_rows(&mut self, rows: &[NewsRow], with_header: bool) -> SinkResult<()> {
        self.batches.push((rows.to_vec(), with_header));
        Ok(())
    }
}

/// Image-store double recording stored keys
#[derive(Default)]
pub struct MemoryImageStore {
    pub keys: Mutex<Vec<String>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn store(&self, _bytes: &[u8], key: &str) -> StoreResult<String> {
        self.keys.lock().unwrap().push(key.to_string());
        Ok(format!("mem://{key}"))
    }
}
