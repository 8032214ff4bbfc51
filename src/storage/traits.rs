use crate::domain::{Entry, Feed, Headline, InsertResult, NewItem};
use crate::errors::KeeperResult;

#[cfg_attr(test, mockall::automock)]
pub trait FeedRepository: Send + Sync {
    fn add(&self, url: &str) -> KeeperResult<i64>;
    fn remove(&self, id: i64) -> KeeperResult<()>;
    fn get_all(&self) -> KeeperResult<Vec<Feed>>;
    fn get_by_id(&self, id: i64) -> KeeperResult<Option<Feed>>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ItemRepository: Send + Sync {
    fn insert(&self, item: &NewItem) -> KeeperResult<InsertResult>;
    fn insert_batch(&self, feed_id: i64, entries: &[Entry]) -> KeeperResult<Vec<InsertResult>>;
    fn list(&self) -> KeeperResult<Vec<Headline>>;
    fn get_description(&self, id: i64) -> KeeperResult<Option<String>>;
    fn delete_for_feed(&self, feed_id: i64) -> KeeperResult<usize>;
    fn count(&self) -> KeeperResult<usize>;
}
