mod connection;
mod feed_repository;
mod item_repository;

pub use connection::SqliteStorage;
pub use feed_repository::SqliteFeedRepository;
pub use item_repository::SqliteItemRepository;
