use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use chrono::Utc;

use crate::domain::{Feed, FeedSyncOutcome, SyncReport};
use crate::errors::{KeeperError, KeeperResult};
use crate::sources::FeedSource;
use crate::storage::traits::{FeedRepository, ItemRepository};

/// Fetches every subscribed feed and merges new entries into the item store.
pub struct SyncService<F: FeedRepository, I: ItemRepository, S: FeedSource> {
    feed_repository: F,
    item_repository: I,
    source: S,
    workers: usize,
}

impl<F: FeedRepository, I: ItemRepository, S: FeedSource> SyncService<F, I, S> {
    pub fn new(feed_repository: F, item_repository: I, source: S) -> Self {
        Self {
            feed_repository,
            item_repository,
            source,
            workers: 1,
        }
    }

    /// Fetch up to `workers` feeds at once. Zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Sync every subscribed feed.
    ///
    /// Fetch and parse failures are recorded on the feed's outcome and the
    /// pass continues. Store failures abort the pass.
    pub fn sync_all(&self) -> KeeperResult<SyncReport> {
        let started_at = Utc::now();
        let feeds = self.feed_repository.get_all()?;

        let outcomes = if self.workers > 1 && feeds.len() > 1 {
            self.sync_parallel(&feeds)?
        } else {
            feeds
                .iter()
                .map(|feed| self.sync_feed(feed))
                .collect::<KeeperResult<Vec<_>>>()?
        };

        let report = SyncReport::new(started_at, outcomes);
        tracing::info!(
            feeds = report.feeds.len(),
            created = report.total_created(),
            duplicates = report.total_duplicates(),
            failed = report.failures().count(),
            "Sync finished"
        );

        Ok(report)
    }

    /// Sync a single feed, e.g. right after subscribing to it.
    pub fn sync_feed(&self, feed: &Feed) -> KeeperResult<FeedSyncOutcome> {
        let entries = match self.source.fetch_entries(&feed.url) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Error fetching {}: {}", feed.url, e);
                return Ok(FeedSyncOutcome::failed(feed, e));
            }
        };

        match self.item_repository.insert_batch(feed.id, &entries) {
            Ok(results) => {
                let mut outcome = FeedSyncOutcome::new(feed);
                for result in results {
                    outcome.record(result);
                }
                tracing::debug!(
                    "{}: {} new, {} already stored",
                    feed.url,
                    outcome.created,
                    outcome.duplicates
                );
                Ok(outcome)
            }
            // Unsubscribed while its entries were in flight.
            Err(e @ KeeperError::NotFound(_)) => {
                tracing::warn!("Feed {} removed during sync", feed.url);
                Ok(FeedSyncOutcome::failed(feed, e))
            }
            Err(e) => Err(e),
        }
    }

    fn sync_parallel(&self, feeds: &[Feed]) -> KeeperResult<Vec<FeedSyncOutcome>> {
        let next = AtomicUsize::new(0);
        let worker_count = self.workers.min(feeds.len());

        thread::scope(|scope| {
            let next = &next;
            let handles: Vec<_> = (0..worker_count)
                .map(|_| {
                    scope.spawn(move || -> KeeperResult<Vec<FeedSyncOutcome>> {
                        let mut outcomes = Vec::new();
                        while let Some(feed) = feeds.get(next.fetch_add(1, Ordering::Relaxed)) {
                            outcomes.push(self.sync_feed(feed)?);
                        }
                        Ok(outcomes)
                    })
                })
                .collect();

            let mut outcomes = Vec::with_capacity(feeds.len());
            let mut first_error = None;
            for handle in handles {
                match handle.join().unwrap_or_else(|p| std::panic::resume_unwind(p)) {
                    Ok(batch) => outcomes.extend(batch),
                    Err(e) => {
                        first_error.get_or_insert(e);
                    }
                }
            }

            match first_error {
                Some(e) => Err(e),
                None => Ok(outcomes),
            }
        })
    }
}
