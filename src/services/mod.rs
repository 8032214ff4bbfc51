pub mod feed_service;
pub mod item_service;
pub mod import_export_service;
pub mod sync_service;

pub use feed_service::FeedService;
pub use item_service::ItemService;
pub use import_export_service::{ImportExportService, ImportResult};
pub use sync_service::SyncService;
