use crate::domain::Feed;
use crate::errors::{KeeperError, KeeperResult};
use crate::storage::traits::FeedRepository;

pub struct FeedService<R: FeedRepository> {
    repository: R,
}

impl<R: FeedRepository> FeedService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Subscribe to a feed URL.
    /// Fails with `DuplicateSubscription` when the URL is already stored.
    pub fn add(&self, url: &str) -> KeeperResult<Feed> {
        let url = url.trim();
        if url.is_empty() {
            return Err(KeeperError::InvalidInput("Feed URL is empty".to_string()));
        }

        let id = self.repository.add(url)?;
        tracing::info!(feed_id = id, url, "Subscribed to feed");

        Ok(self
            .repository
            .get_by_id(id)?
            .unwrap_or_else(|| Feed::new(id, url.to_string())))
    }

    /// Unsubscribe and drop every item the feed owns.
    /// Fails with `NotFound` when no such feed exists.
    pub fn remove(&self, id: i64) -> KeeperResult<()> {
        self.repository.remove(id)?;
        tracing::info!(feed_id = id, "Removed feed");
        Ok(())
    }

    /// List all feeds
    pub fn list(&self) -> KeeperResult<Vec<Feed>> {
        self.repository.get_all()
    }

    /// Get a feed by ID
    pub fn get(&self, id: i64) -> KeeperResult<Option<Feed>> {
        self.repository.get_by_id(id)
    }
}
