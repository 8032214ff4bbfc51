pub mod traits;
pub mod sqlite;

pub use traits::{FeedRepository, ItemRepository};
pub use sqlite::{SqliteStorage, SqliteFeedRepository, SqliteItemRepository};
