//! Browser capability contract
//!
//! The crawler never talks to a page directly; it drives this trait.
//! `NodeRef` is an opaque handle whose meaning belongs to the session that
//! produced it, which lets the bundled static session map handles onto a
//! parsed document and lets tests replay fixed node sequences.
//!
//! Absence is an explicit outcome (`None` from a find, `TimedOut` from a
//! wait, `Intercepted`/`NotEnabled` from a click), not an error. Errors are
//! reserved for session-level failures.

pub mod selectors;
mod static_session;

pub use static_session::StaticSession;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a browser session
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("No element matched selector '{selector}'")]
    ElementMissing { selector: String },

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Stale node handle {0:?}")]
    StaleNode(NodeRef),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("No page loaded")]
    NoPage,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for browser operations
pub type BrowserResult<T> = std::result::Result<T, BrowserError>;

/// Opaque handle to a DOM node owned by the session that produced it
///
/// Handles are invalidated by navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(pub u64);

/// Outcome of activating an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The activation went through
    Clicked,
    /// Another element swallowed the click
    Intercepted,
    /// The element cannot be activated
    NotEnabled,
}

impl ClickOutcome {
    /// Returns true when the activation did not go through
    pub fn is_rejected(&self) -> bool {
        !matches!(self, Self::Clicked)
    }
}

/// Outcome of waiting for an element to appear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Present,
    TimedOut,
}

/// Capability contract for driving one page session
///
/// Every method is a bounded suspension point. A session is owned by exactly
/// one crawl at a time and never shared, so implementations may hold
/// thread-local document state (the futures are not required to be `Send`).
#[async_trait(?Send)]
pub trait Browser {
    /// Loads `url` and makes it the current page
    async fn navigate(&mut self, url: &str) -> BrowserResult<()>;

    /// Returns the current location
    fn current_url(&self) -> BrowserResult<String>;

    /// Finds the first node matching `selector`, optionally scoped to a node
    async fn find_one(
        &mut self,
        selector: &str,
        scope: Option<NodeRef>,
    ) -> BrowserResult<Option<NodeRef>>;

    /// Finds every node matching `selector`, optionally scoped to a node
    async fn find_all(
        &mut self,
        selector: &str,
        scope: Option<NodeRef>,
    ) -> BrowserResult<Vec<NodeRef>>;

    /// Activates a node
    async fn click(&mut self, node: NodeRef) -> BrowserResult<ClickOutcome>;

    /// Sends keystrokes to a node
    async fn type_text(&mut self, node: NodeRef, text: &str) -> BrowserResult<()>;

    /// Blocks until `selector` matches something, bounded by `timeout`
    async fn wait_until_present(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> BrowserResult<WaitOutcome>;

    /// Reads an attribute value; `None` when the attribute is absent
    async fn attribute(&mut self, node: NodeRef, name: &str) -> BrowserResult<Option<String>>;

    /// Reads the visible text of a node
    async fn text(&mut self, node: NodeRef) -> BrowserResult<String>;
}
