//! A [`Browser`] implementation over plain HTTP and static HTML
//!
//! No JavaScript runs here. `navigate` fetches and parses the page, finds
//! run CSS selectors against the parsed document, `click` follows the
//! nearest link, typing is accepted and ignored, and waiting collapses to an
//! immediate presence check. Affordances that only exist after script
//! execution (the search overlay) report missing, which routes the crawler
//! onto its URL fallback paths.

use crate::browser::{Browser, BrowserError, BrowserResult, ClickOutcome, NodeRef, WaitOutcome};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// How a handed-out node is located again inside the current document
///
/// The document is immutable between navigations, so a (selector, parent,
/// index) chain re-resolves to the same element for the lifetime of a page.
#[derive(Debug, Clone)]
struct NodeRecord {
    selector: String,
    parent: Option<u64>,
    index: usize,
}

/// Static-HTML browser session backed by an HTTP client
pub struct StaticSession {
    client: reqwest::Client,
    document: Option<Html>,
    current_url: Option<String>,
    nodes: HashMap<u64, NodeRecord>,
    next_id: u64,
}

impl StaticSession {
    /// Creates a session with the given per-request timeout
    pub fn new(request_timeout: Duration) -> BrowserResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            document: None,
            current_url: None,
            nodes: HashMap::new(),
            next_id: 0,
        })
    }

    fn compile(selector: &str) -> BrowserResult<Selector> {
        Selector::parse(selector).map_err(|e| BrowserError::InvalidSelector {
            selector: selector.to_string(),
            message: e.to_string(),
        })
    }

    fn document(&self) -> BrowserResult<&Html> {
        self.document.as_ref().ok_or(BrowserError::NoPage)
    }

    /// Re-locates a handed-out node in the current document
    fn resolve<'a>(&self, document: &'a Html, id: u64) -> BrowserResult<ElementRef<'a>> {
        let record = self
            .nodes
            .get(&id)
            .ok_or(BrowserError::StaleNode(NodeRef(id)))?;
        let selector = Self::compile(&record.selector)?;

        let found = match record.parent {
            None => document.select(&selector).nth(record.index),
            Some(parent) => {
                let scope = self.resolve(document, parent)?;
                scope.select(&selector).nth(record.index)
            }
        };

        found.ok_or(BrowserError::StaleNode(NodeRef(id)))
    }

    fn register(&mut self, selector: &str, parent: Option<NodeRef>, index: usize) -> NodeRef {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            NodeRecord {
                selector: selector.to_string(),
                parent: parent.map(|node| node.0),
                index,
            },
        );
        NodeRef(id)
    }

    fn count_matches(&self, selector: &str, scope: Option<NodeRef>) -> BrowserResult<usize> {
        let compiled = Self::compile(selector)?;
        let document = self.document()?;
        let count = match scope {
            None => document.select(&compiled).count(),
            Some(parent) => self
                .resolve(document, parent.0)?
                .select(&compiled)
                .count(),
        };
        Ok(count)
    }

    fn absolutize(&self, href: &str) -> BrowserResult<String> {
        let current = self.current_url()?;
        let base = Url::parse(&current).map_err(|e| BrowserError::Navigation {
            url: current.clone(),
            message: e.to_string(),
        })?;
        let joined = base.join(href).map_err(|e| BrowserError::Navigation {
            url: href.to_string(),
            message: e.to_string(),
        })?;
        Ok(joined.to_string())
    }

    #[cfg(test)]
    fn set_document(&mut self, html: &str, url: &str) {
        self.document = Some(Html::parse_document(html));
        self.current_url = Some(url.to_string());
        self.nodes.clear();
    }
}

/// The element's own href, or the first descendant anchor's
fn element_href(element: &ElementRef<'_>) -> Option<String> {
    if element.value().name() == "a" {
        if let Some(href) = element.value().attr("href") {
            return Some(href.to_string());
        }
    }

    let anchor = Selector::parse("a").ok()?;
    element
        .select(&anchor)
        .find_map(|a| a.value().attr("href").map(str::to_string))
}

#[async_trait(?Send)]
impl Browser for StaticSession {
    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        tracing::debug!(%url, "navigating");
        let response = self.client.get(url).send().await?.error_for_status()?;
        let final_url = response.url().to_string();
        let body = response.text().await?;

        self.document = Some(Html::parse_document(&body));
        self.current_url = Some(final_url);
        // Handles from the previous page are gone for good
        self.nodes.clear();
        Ok(())
    }

    fn current_url(&self) -> BrowserResult<String> {
        self.current_url.clone().ok_or(BrowserError::NoPage)
    }

    async fn find_one(
        &mut self,
        selector: &str,
        scope: Option<NodeRef>,
    ) -> BrowserResult<Option<NodeRef>> {
        if self.count_matches(selector, scope)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.register(selector, scope, 0)))
    }

    async fn find_all(
        &mut self,
        selector: &str,
        scope: Option<NodeRef>,
    ) -> BrowserResult<Vec<NodeRef>> {
        let count = self.count_matches(selector, scope)?;
        Ok((0..count)
            .map(|index| self.register(selector, scope, index))
            .collect())
    }

    async fn click(&mut self, node: NodeRef) -> BrowserResult<ClickOutcome> {
        let href = {
            let document = self.document()?;
            let element = self.resolve(document, node.0)?;
            element_href(&element)
        };

        match href {
            Some(href) => {
                let target = self.absolutize(&href)?;
                self.navigate(&target).await?;
                Ok(ClickOutcome::Clicked)
            }
            // Nothing to follow without a script runtime
            None => Ok(ClickOutcome::NotEnabled),
        }
    }

    async fn type_text(&mut self, _node: NodeRef, text: &str) -> BrowserResult<()> {
        tracing::debug!(%text, "static session ignores keystrokes");
        Ok(())
    }

    async fn wait_until_present(
        &mut self,
        selector: &str,
        _timeout: Duration,
    ) -> BrowserResult<WaitOutcome> {
        // The document never changes between navigations, so the wait
        // collapses to an immediate presence check
        if self.count_matches(selector, None)? > 0 {
            Ok(WaitOutcome::Present)
        } else {
            Ok(WaitOutcome::TimedOut)
        }
    }

    async fn attribute(&mut self, node: NodeRef, name: &str) -> BrowserResult<Option<String>> {
        let document = self.document()?;
        let element = self.resolve(document, node.0)?;
        Ok(element.value().attr(name).map(str::to_string))
    }

    async fn text(&mut self, node: NodeRef) -> BrowserResult<String> {
        let document = self.document()?;
        let element = self.resolve(document, node.0)?;
        Ok(element.text().collect::<String>().trim().to_string())
    }
}
