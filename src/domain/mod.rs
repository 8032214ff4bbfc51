pub mod feed;
pub mod entry;
pub mod item;
pub mod sync_report;

pub use feed::Feed;
pub use entry::Entry;
pub use item::{Headline, InsertResult, NewItem};
pub use sync_report::{FeedSyncOutcome, SyncReport};
