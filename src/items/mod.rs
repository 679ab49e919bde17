//! Work-item input and completion signaling
//!
//! Crawl requests arrive as a JSON array of payloads. Every consumed item
//! must end up explicitly marked done or failed, and the queue can write a
//! status report so a dispatcher sees what happened to each item.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while reading or updating the work-item queue
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Failed to read work items file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse work items: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown work item id: {0}")]
    UnknownItem(usize),
}

/// Result type for work-item operations
pub type ItemResult<T> = std::result::Result<T, ItemError>;

/// One unit of crawl work
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkItem {
    /// Base URL of the news site
    pub url: String,

    /// Term submitted to the site search
    pub search_term: String,

    /// Acceptance window in months (1, 2 or 3)
    pub num_months: i64,

    /// Optional category label; empty means no narrowing
    #[serde(default)]
    pub category: String,
}

/// Processing status of a queued item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Not yet processed
    Pending,
    /// Processed to completion
    Done,
    /// Abandoned after an unrecoverable failure
    Failed,
}

impl ItemStatus {
    /// Returns the report string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One queue entry: the item plus its processing outcome
#[derive(Debug, Clone, Serialize)]
pub struct QueueEntry {
    pub item: WorkItem,
    pub status: ItemStatus,
    /// Failure reason, present only for failed items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// File-backed work-item queue
///
/// Loads a JSON array of [`WorkItem`] payloads and tracks a status per item.
/// Items are addressed by their zero-based position in the input file.
#[derive(Debug)]
pub struct ItemQueue {
    entries: Vec<QueueEntry>,
}

impl ItemQueue {
    /// Loads a queue from a JSON work-items file
    pub fn load(path: &Path) -> ItemResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let items: Vec<WorkItem> = serde_json::from_str(&content)?;
        Ok(Self::from_items(items))
    }

    /// Builds a queue from already-parsed items
    pub fn from_items(items: Vec<WorkItem>) -> Self {
        let entries = items
            .into_iter()
            .map(|item| QueueEntry {
                item,
                status: ItemStatus::Pending,
                error: None,
            })
            .collect();
        Self { entries }
    }

    /// Number of items in the queue
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the queue holds no items
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gets an item by id
    pub fn get(&self, id: usize) -> Option<&WorkItem> {
        self.entries.get(id).map(|entry| &entry.item)
    }

    /// Returns the status of an item
    pub fn status(&self, id: usize) -> Option<ItemStatus> {
        self.entries.get(id).map(|entry| entry.status)
    }

    /// Marks an item as processed to completion
    pub fn mark_done(&mut self, id: usize) -> ItemResult<()> {
        let entry = self
            .entries
            .get_mut(id)
            .ok_or(ItemError::UnknownItem(id))?;
        entry.status = ItemStatus::Done;
        entry.error = None;
        Ok(())
    }

    /// Marks an item as abandoned, recording the failure reason
    pub fn mark_failed(&mut self, id: usize, reason: &str) -> ItemResult<()> {
        let entry = self
            .entries
            .get_mut(id)
            .ok_or(ItemError::UnknownItem(id))?;
        entry.status = ItemStatus::Failed;
        entry.error = Some(reason.to_string());
        Ok(())
    }

    /// Writes a JSON status report for every item
    pub fn write_report(&self, path: &Path) -> ItemResult<()> {
        let report = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, report)?;
        tracing::info!(path = %path.display(), items = self.entries.len(), "item report written");
        Ok(())
    }
}
