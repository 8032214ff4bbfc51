use serde::{Deserialize, Serialize};

use super::Entry;

/// An item waiting to be inserted for a given feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub feed_id: i64,
    pub title: String,
    pub link: String,
    pub summary: Option<String>,
    pub published_at: Option<String>,
}

impl NewItem {
    pub fn from_entry(feed_id: i64, entry: &Entry) -> Self {
        Self {
            feed_id,
            title: entry.title.clone(),
            link: entry.link.clone(),
            summary: entry.summary.clone(),
            published_at: entry.published.clone(),
        }
    }
}

/// The row shape returned by item listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub id: i64,
    pub feed_id: i64,
    pub title: String,
    pub link: String,
    pub published_at: Option<String>,
}

/// Outcome of inserting one item. A duplicate `(feed_id, title)` pair is
/// an ordinary result during re-sync, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertResult {
    Created(i64),
    Duplicate,
}

impl InsertResult {
    pub fn is_created(&self) -> bool {
        matches!(self, InsertResult::Created(_))
    }
}
