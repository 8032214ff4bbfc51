use chrono::{DateTime, Utc};

use super::{Feed, InsertResult};
use crate::errors::KeeperError;

/// What happened to a single feed during a sync pass.
#[derive(Debug)]
pub struct FeedSyncOutcome {
    pub feed_id: i64,
    pub url: String,
    pub created: usize,
    pub duplicates: usize,
    pub error: Option<KeeperError>,
}

impl FeedSyncOutcome {
    pub fn new(feed: &Feed) -> Self {
        Self {
            feed_id: feed.id,
            url: feed.url.clone(),
            created: 0,
            duplicates: 0,
            error: None,
        }
    }

    pub fn failed(feed: &Feed, error: KeeperError) -> Self {
        Self {
            error: Some(error),
            ..Self::new(feed)
        }
    }

    pub fn record(&mut self, result: InsertResult) {
        match result {
            InsertResult::Created(_) => self.created += 1,
            InsertResult::Duplicate => self.duplicates += 1,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub feeds: Vec<FeedSyncOutcome>,
}

impl SyncReport {
    pub fn new(started_at: DateTime<Utc>, mut feeds: Vec<FeedSyncOutcome>) -> Self {
        feeds.sort_by_key(|o| o.feed_id);
        Self {
            started_at,
            finished_at: Utc::now(),
            feeds,
        }
    }

    pub fn total_created(&self) -> usize {
        self.feeds.iter().map(|o| o.created).sum()
    }

    pub fn total_duplicates(&self) -> usize {
        self.feeds.iter().map(|o| o.duplicates).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FeedSyncOutcome> {
        self.feeds.iter().filter(|o| !o.is_ok())
    }

    pub fn outcome(&self, feed_id: i64) -> Option<&FeedSyncOutcome> {
        self.feeds.iter().find(|o| o.feed_id == feed_id)
    }
}
