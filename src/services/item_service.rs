use crate::domain::Headline;
use crate::errors::KeeperResult;
use crate::storage::traits::ItemRepository;

/// Read-only queries over stored items.
pub struct ItemService<I: ItemRepository> {
    repository: I,
}

impl<I: ItemRepository> ItemService<I> {
    pub fn new(repository: I) -> Self {
        Self { repository }
    }

    /// Newest first; undated items come last in insertion order.
    pub fn list(&self) -> KeeperResult<Vec<Headline>> {
        self.repository.list()
    }

    pub fn description(&self, item_id: i64) -> KeeperResult<Option<String>> {
        self.repository.get_description(item_id)
    }

    /// Number of stored items across all feeds.
    pub fn count(&self) -> KeeperResult<usize> {
        self.repository.count()
    }
}
